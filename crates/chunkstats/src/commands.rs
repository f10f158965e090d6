use std::io::Write;

use anyhow::Result;
use chunkstats_core::formatting::{format_number, render_bar, render_snapshot, to_json};
use chunkstats_core::settings::{HistogramArgs, StatsArgs};
use chunkstats_data::filter::{collect_feature, ValueFilter};
use chunkstats_data::histogram::Histogram;
use chunkstats_data::ChunkedStatsReader;

/// Width of the widest histogram bar in text output.
const BAR_WIDTH: usize = 40;

// ── stats ──────────────────────────────────────────────────────────────────────

/// Print the statistics of every chunk, in order, as they are read.
///
/// JSON output is one object per line (`chunk`, `offset`, `rows`, `stats`).
/// Returns the number of chunks written.
pub fn run_stats(args: &StatsArgs, out: &mut impl Write) -> Result<usize> {
    let reader = ChunkedStatsReader::new(&args.path, args.chunk_size)?;
    let json = args.format == "json";

    let mut chunks = 0;
    for item in reader {
        let (window, snapshot) = item?;
        if json {
            let line = serde_json::json!({
                "chunk": window.index,
                "offset": window.offset,
                "rows": window.len(),
                "stats": snapshot.columns,
            });
            writeln!(out, "{}", line)?;
        } else {
            if chunks > 0 {
                writeln!(out)?;
            }
            write!(out, "{}", render_snapshot(&snapshot, window.offset, window.len()))?;
        }
        chunks += 1;
    }

    tracing::info!("Summarised {} chunks of {}", chunks, args.path.display());
    Ok(chunks)
}

// ── histogram ──────────────────────────────────────────────────────────────────

/// Filter the source, bin the feature column and print the histogram.
pub fn run_histogram(args: &HistogramArgs, out: &mut impl Write) -> Result<Histogram> {
    let reader = ChunkedStatsReader::new(&args.path, args.chunk_size)?;
    let filter = args
        .filter_column
        .as_ref()
        .map(|column| ValueFilter::new(column.clone(), args.values.clone()));

    let values = collect_feature(reader, filter.as_ref(), &args.feature)?;
    let histogram = Histogram::from_values(args.feature.clone(), &values, args.bins)?;

    if args.format == "json" {
        writeln!(out, "{}", to_json(&histogram)?)?;
    } else {
        write!(out, "{}", render_histogram(&histogram))?;
    }
    Ok(histogram)
}

/// Text rendering: a title line, then one `lo - hi | count bar` line per bin.
pub fn render_histogram(histogram: &Histogram) -> String {
    let mut text = format!(
        "Distribution of {} ({} values)\n",
        histogram.feature,
        format_number(histogram.total() as f64, 0)
    );
    let max = histogram.max_count();
    for (lo, hi, count) in histogram.iter_bins() {
        text.push_str(&format!(
            "{:>10} - {:>10} | {:>6} {}\n",
            format_number(lo, 2),
            format_number(hi, 2),
            count,
            render_bar(count, max, BAR_WIDTH)
        ));
    }
    text
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chunkstats_core::error::ChunkStatsError;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_wine_csv(dir: &Path) -> PathBuf {
        let path = dir.join("winequality-red.csv");
        let mut content = String::from("fixed acidity,alcohol,quality\n");
        for i in 0..30 {
            content.push_str(&format!(
                "{:.1},{:.1},{}\n",
                7.0 + (i % 5) as f64 * 0.1,
                9.0 + (i % 10) as f64 * 0.3,
                3 + i % 6
            ));
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn stats_args(path: PathBuf, chunk_size: i64, format: &str) -> StatsArgs {
        StatsArgs {
            path,
            chunk_size,
            format: format.to_string(),
        }
    }

    fn histogram_args(path: PathBuf) -> HistogramArgs {
        HistogramArgs {
            path,
            feature: "alcohol".to_string(),
            filter_column: Some("quality".to_string()),
            values: vec![5.0, 6.0],
            bins: 4,
            chunk_size: 7,
            format: "text".to_string(),
        }
    }

    // ── run_stats ─────────────────────────────────────────────────────────────

    #[test]
    fn test_run_stats_text() {
        let dir = TempDir::new().unwrap();
        let args = stats_args(write_wine_csv(dir.path()), 12, "text");
        let mut out = Vec::new();

        let chunks = run_stats(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(chunks, 3);
        assert!(text.contains("Chunk 0 (rows 0-11, 12 rows)"));
        assert!(text.contains("Chunk 2 (rows 24-29, 6 rows)"));
        assert!(text.contains("alcohol"));
    }

    #[test]
    fn test_run_stats_json_lines() {
        let dir = TempDir::new().unwrap();
        let args = stats_args(write_wine_csv(dir.path()), 10, "json");
        let mut out = Vec::new();

        run_stats(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1]["chunk"], 1);
        assert_eq!(lines[1]["offset"], 10);
        assert_eq!(lines[1]["rows"], 10);
        assert_eq!(lines[1]["stats"][2]["name"], "quality");
        assert_eq!(lines[1]["stats"][2]["count"], 10);
    }

    #[test]
    fn test_run_stats_invalid_chunk_size() {
        let dir = TempDir::new().unwrap();
        let args = stats_args(write_wine_csv(dir.path()), 0, "text");
        let err = run_stats(&args, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChunkStatsError>(),
            Some(ChunkStatsError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_run_stats_missing_file() {
        let args = stats_args(PathBuf::from("/tmp/does-not-exist-chunkstats.csv"), 5, "text");
        let err = run_stats(&args, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChunkStatsError>(),
            Some(ChunkStatsError::SourceUnavailable { .. })
        ));
    }

    // ── run_histogram ─────────────────────────────────────────────────────────

    #[test]
    fn test_run_histogram_filters_rows() {
        let dir = TempDir::new().unwrap();
        let args = histogram_args(write_wine_csv(dir.path()));
        let mut out = Vec::new();

        let histogram = run_histogram(&args, &mut out).unwrap();
        // quality cycles 3..=8, so 5 and 6 each appear 5 times in 30 rows.
        assert_eq!(histogram.total(), 10);
        assert_eq!(histogram.bins(), 4);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Distribution of alcohol (10 values)"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_run_histogram_json() {
        let dir = TempDir::new().unwrap();
        let mut args = histogram_args(write_wine_csv(dir.path()));
        args.format = "json".to_string();
        let mut out = Vec::new();

        run_histogram(&args, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["feature"], "alcohol");
        assert_eq!(value["counts"].as_array().unwrap().len(), 4);
        assert_eq!(value["edges"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_run_histogram_no_matching_rows() {
        let dir = TempDir::new().unwrap();
        let mut args = histogram_args(write_wine_csv(dir.path()));
        args.values = vec![10.0];
        let err = run_histogram(&args, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChunkStatsError>(),
            Some(ChunkStatsError::NoMatchingRows(_))
        ));
    }

    #[test]
    fn test_run_histogram_unknown_feature() {
        let dir = TempDir::new().unwrap();
        let mut args = histogram_args(write_wine_csv(dir.path()));
        args.feature = "sulphates".to_string();
        let err = run_histogram(&args, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("sulphates"));
    }

    // ── render_histogram ──────────────────────────────────────────────────────

    #[test]
    fn test_render_histogram_bars() {
        let histogram = Histogram::from_values("x", &[0.0, 0.0, 1.0, 2.0], 2).unwrap();
        let text = render_histogram(&histogram);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Distribution of x (4 values)");
        assert!(lines[1].contains("0.00 -"));
        // Tallest bin gets the full bar width.
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH);
    }
}

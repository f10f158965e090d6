//! Row selection by numeric column value, and feature extraction across a
//! whole chunk stream.

use chunkstats_core::error::{ChunkStatsError, Result};
use chunkstats_core::models::{ColumnKind, StatsSnapshot, Window};
use tracing::debug;

// ── ValueFilter ───────────────────────────────────────────────────────────────

/// Keeps the rows whose value in `column` is one of `values`.
#[derive(Debug, Clone)]
pub struct ValueFilter {
    column: String,
    values: Vec<f64>,
}

impl ValueFilter {
    pub fn new(column: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            column: column.into(),
            values,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Return a copy of `window` holding only the matching rows.
    ///
    /// Index, offset and column kinds are kept from the source window.
    pub fn apply(&self, window: &Window) -> Result<Window> {
        let idx = window
            .column_index(&self.column)
            .ok_or_else(|| ChunkStatsError::UnknownColumn(self.column.clone()))?;

        let rows = window
            .rows
            .iter()
            .filter(|row| {
                row.get(idx)
                    .and_then(|cell| cell.as_f64())
                    .is_some_and(|v| self.values.contains(&v))
            })
            .cloned()
            .collect();

        Ok(Window {
            index: window.index,
            offset: window.offset,
            columns: window.columns.clone(),
            rows,
        })
    }
}

// ── Feature extraction ────────────────────────────────────────────────────────

/// Walk every window of `windows`, apply `filter` when given, and collect the
/// non-missing values of the numeric column `feature`.
///
/// Fails with [`ChunkStatsError::NoMatchingRows`] when no row survives the
/// filter anywhere in the source.
pub fn collect_feature<I>(windows: I, filter: Option<&ValueFilter>, feature: &str) -> Result<Vec<f64>>
where
    I: IntoIterator<Item = Result<(Window, StatsSnapshot)>>,
{
    let mut values = Vec::new();
    let mut matched_rows = 0usize;

    for item in windows {
        let (window, _) = item?;
        let window = match filter {
            Some(f) => f.apply(&window)?,
            None => window,
        };

        let idx = window
            .column_index(feature)
            .ok_or_else(|| ChunkStatsError::UnknownColumn(feature.to_string()))?;
        if window.is_empty() {
            continue;
        }
        if window.columns[idx].kind == ColumnKind::Text {
            return Err(ChunkStatsError::NonNumericColumn(feature.to_string()));
        }

        matched_rows += window.len();
        values.extend(window.numeric_values(idx));
    }

    debug!(
        "Collected {} values of '{}' from {} matching rows",
        values.len(),
        feature,
        matched_rows
    );

    if matched_rows == 0 {
        let column = filter.map(|f| f.column()).unwrap_or(feature);
        return Err(ChunkStatsError::NoMatchingRows(column.to_string()));
    }
    Ok(values)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chunkstats_core::calculations::summarize_window;
    use chunkstats_core::models::{Cell, Column};

    fn wine_window(index: usize, rows: &[(i64, f64, &str)]) -> Window {
        Window {
            index,
            offset: index * 10,
            columns: vec![
                Column {
                    name: "quality".to_string(),
                    kind: ColumnKind::Integer,
                },
                Column {
                    name: "alcohol".to_string(),
                    kind: ColumnKind::Float,
                },
                Column {
                    name: "colour".to_string(),
                    kind: ColumnKind::Text,
                },
            ],
            rows: rows
                .iter()
                .map(|(q, a, c)| vec![Cell::Integer(*q), Cell::Float(*a), Cell::Text(c.to_string())])
                .collect(),
        }
    }

    fn stream(windows: Vec<Window>) -> Vec<Result<(Window, StatsSnapshot)>> {
        windows
            .into_iter()
            .map(|w| {
                let s = summarize_window(&w);
                Ok((w, s))
            })
            .collect()
    }

    // ── ValueFilter ───────────────────────────────────────────────────────────

    #[test]
    fn test_filter_keeps_matching_rows() {
        let window = wine_window(0, &[(5, 9.4, "red"), (6, 9.8, "red"), (7, 10.0, "red")]);
        let filter = ValueFilter::new("quality", vec![5.0, 7.0]);

        let filtered = filter.apply(&window).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.rows[0][0], Cell::Integer(5));
        assert_eq!(filtered.rows[1][0], Cell::Integer(7));
        assert_eq!(filtered.columns, window.columns);
    }

    #[test]
    fn test_filter_unknown_column() {
        let window = wine_window(0, &[(5, 9.4, "red")]);
        let filter = ValueFilter::new("sweetness", vec![1.0]);
        let err = filter.apply(&window).unwrap_err();
        assert!(matches!(err, ChunkStatsError::UnknownColumn(c) if c == "sweetness"));
    }

    #[test]
    fn test_filter_on_text_column_matches_nothing() {
        let window = wine_window(0, &[(5, 9.4, "red")]);
        let filter = ValueFilter::new("colour", vec![5.0]);
        assert!(filter.apply(&window).unwrap().is_empty());
    }

    // ── collect_feature ───────────────────────────────────────────────────────

    #[test]
    fn test_collect_feature_across_windows() {
        let windows = stream(vec![
            wine_window(0, &[(5, 9.4, "red"), (6, 9.8, "red")]),
            wine_window(1, &[(5, 10.5, "red"), (8, 12.0, "red")]),
        ]);
        let filter = ValueFilter::new("quality", vec![5.0]);

        let values = collect_feature(windows, Some(&filter), "alcohol").unwrap();
        assert_eq!(values, vec![9.4, 10.5]);
    }

    #[test]
    fn test_collect_feature_without_filter() {
        let windows = stream(vec![wine_window(0, &[(5, 9.4, "red"), (6, 9.8, "red")])]);
        let values = collect_feature(windows, None, "quality").unwrap();
        assert_eq!(values, vec![5.0, 6.0]);
    }

    #[test]
    fn test_collect_feature_no_matching_rows() {
        let windows = stream(vec![wine_window(0, &[(5, 9.4, "red")])]);
        let filter = ValueFilter::new("quality", vec![3.0]);
        let err = collect_feature(windows, Some(&filter), "alcohol").unwrap_err();
        assert!(matches!(err, ChunkStatsError::NoMatchingRows(c) if c == "quality"));
    }

    #[test]
    fn test_collect_feature_unknown_feature() {
        let windows = stream(vec![wine_window(0, &[(5, 9.4, "red")])]);
        let err = collect_feature(windows, None, "density").unwrap_err();
        assert!(matches!(err, ChunkStatsError::UnknownColumn(c) if c == "density"));
    }

    #[test]
    fn test_collect_feature_text_feature() {
        let windows = stream(vec![wine_window(0, &[(5, 9.4, "red")])]);
        let err = collect_feature(windows, None, "colour").unwrap_err();
        assert!(matches!(err, ChunkStatsError::NonNumericColumn(_)));
    }

    #[test]
    fn test_collect_feature_propagates_read_errors() {
        let windows: Vec<Result<(Window, StatsSnapshot)>> = vec![Err(
            ChunkStatsError::source_unavailable("/missing.csv", "not found"),
        )];
        let err = collect_feature(windows, None, "alcohol").unwrap_err();
        assert!(matches!(err, ChunkStatsError::SourceUnavailable { .. }));
    }
}

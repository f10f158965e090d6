use serde::Serialize;

use crate::error::Result;
use crate::models::StatsSnapshot;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places. Non-finite values are rendered as `NaN`, `inf` or `-inf`.
///
/// # Examples
///
/// ```
/// use chunkstats_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// assert_eq!(format_number(f64::NAN, 2), "NaN");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let negative = value < 0.0;
    let abs_value = value.abs();

    // Half-ULP nudge so exact binary midpoints round away from zero.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        // `frac_str` looks like "0.50"; keep ".50".
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Render a statistics snapshot as a fixed-width text table.
///
/// ```text
/// Chunk 0 (rows 0-99, 100 rows)
/// column             mean        std        min        max    count
/// Age               38.85      13.97      18.00      70.00      100
/// ```
pub fn render_snapshot(snapshot: &StatsSnapshot, offset: usize, rows: usize) -> String {
    let mut out = format!(
        "Chunk {} (rows {}-{}, {} rows)\n",
        snapshot.chunk,
        offset,
        (offset + rows).saturating_sub(1),
        rows
    );

    if snapshot.is_empty() {
        out.push_str("  (no numeric columns)\n");
        return out;
    }

    let name_width = snapshot
        .columns
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("column".len());

    out.push_str(&format!(
        "{:<nw$} {:>10} {:>10} {:>10} {:>10} {:>8}\n",
        "column",
        "mean",
        "std",
        "min",
        "max",
        "count",
        nw = name_width
    ));
    for column in &snapshot.columns {
        out.push_str(&format!(
            "{:<nw$} {:>10} {:>10} {:>10} {:>10} {:>8}\n",
            column.name,
            format_number(column.mean, 2),
            format_number(column.std, 2),
            format_number(column.min, 2),
            format_number(column.max, 2),
            column.count,
            nw = name_width
        ));
    }
    out
}

/// Horizontal bar of `width * count / max` block characters.
pub fn render_bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((count as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(len.min(width))
}

/// Pretty-printed JSON for any serialisable output value.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

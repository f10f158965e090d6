//! Conversion of raw CSV records into typed [`Window`]s.
//!
//! Column kinds are inferred from the records of the window alone: a column
//! is numeric when every non-missing field parses as a number.

use std::collections::HashMap;

use chunkstats_core::models::{is_missing, Cell, Column, ColumnKind, Window};
use csv::StringRecord;

/// Make header names unique the way pandas does: repeats of `a` become
/// `a.1`, `a.2`, skipping any name that is already taken.
pub fn dedupe_headers(names: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let mut name = name;
            let mut seen = counts.get(&name).copied().unwrap_or(0);
            while seen > 0 {
                counts.insert(name.clone(), seen + 1);
                name = format!("{}.{}", name, seen);
                seen = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), seen + 1);
            name
        })
        .collect()
}

/// Build a typed window from the raw records of one chunk.
pub fn build_window(
    index: usize,
    offset: usize,
    headers: &[String],
    records: &[StringRecord],
) -> Window {
    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| Column {
            name: name.clone(),
            kind: infer_column_kind(records, idx),
        })
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, column)| parse_cell(record.get(idx).unwrap_or(""), column.kind))
                .collect()
        })
        .collect();

    Window {
        index,
        offset,
        columns,
        rows,
    }
}

/// Infer the kind of column `idx` across `records`.
pub fn infer_column_kind(records: &[StringRecord], idx: usize) -> ColumnKind {
    let mut saw_value = false;
    let mut all_integer = true;

    for raw in records.iter().map(|r| r.get(idx).unwrap_or("")) {
        if is_missing(raw) {
            continue;
        }
        saw_value = true;
        let trimmed = raw.trim();
        if trimmed.parse::<i64>().is_ok() {
            continue;
        }
        if trimmed.parse::<f64>().is_ok() {
            all_integer = false;
            continue;
        }
        return ColumnKind::Text;
    }

    match (saw_value, all_integer) {
        (false, _) => ColumnKind::Empty,
        (true, true) => ColumnKind::Integer,
        (true, false) => ColumnKind::Float,
    }
}

/// Parse a raw field according to the kind inferred for its column.
fn parse_cell(raw: &str, kind: ColumnKind) -> Cell {
    if is_missing(raw) {
        return Cell::Missing;
    }
    let trimmed = raw.trim();
    match kind {
        ColumnKind::Integer => trimmed.parse().map(Cell::Integer).unwrap_or(Cell::Missing),
        ColumnKind::Float => trimmed.parse().map(Cell::Float).unwrap_or(Cell::Missing),
        ColumnKind::Text => Cell::Text(raw.to_string()),
        ColumnKind::Empty => Cell::Missing,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

use crate::models::{ColumnStats, StatsSnapshot, Window};

// ── RunningStats ──────────────────────────────────────────────────────────────

/// Single-pass mean / variance / min / max accumulator (Welford's algorithm).
///
/// Infinite values are counted and bound min/max but are kept out of the
/// running moments; they decide the mean directly.
#[derive(Debug, Clone)]
pub struct RunningStats {
    count: usize,
    finite_count: usize,
    pos_inf: usize,
    neg_inf: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            finite_count: 0,
            pos_inf: 0,
            neg_inf: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add a value. NaN is treated as missing and ignored.
    pub fn add(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }

        self.count += 1;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }

        if value == f64::INFINITY {
            self.pos_inf += 1;
            return;
        }
        if value == f64::NEG_INFINITY {
            self.neg_inf += 1;
            return;
        }

        self.finite_count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.finite_count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Number of non-missing values seen.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, NaN when empty.
    ///
    /// `inf` or `-inf` when only one sign of infinity was seen, NaN when both
    /// were. Otherwise clamped into `[min, max]` so rounding in the running
    /// update can never push it outside the observed range.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        match (self.pos_inf > 0, self.neg_inf > 0) {
            (true, true) => f64::NAN,
            (true, false) => f64::INFINITY,
            (false, true) => f64::NEG_INFINITY,
            (false, false) => self.mean.clamp(self.min, self.max),
        }
    }

    /// Sample standard deviation (N-1 denominator), NaN below two values or
    /// when any value is infinite.
    pub fn sample_stddev(&self) -> f64 {
        if self.count < 2 || self.pos_inf + self.neg_inf > 0 {
            f64::NAN
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }

    pub fn min(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.min
        }
    }

    pub fn max(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.max
        }
    }

    /// Freeze the accumulator into a named [`ColumnStats`].
    pub fn finish(&self, name: impl Into<String>) -> ColumnStats {
        ColumnStats {
            name: name.into(),
            mean: self.mean(),
            std: self.sample_stddev(),
            min: self.min(),
            max: self.max(),
            count: self.count,
        }
    }
}

// ── Window summaries ──────────────────────────────────────────────────────────

/// Compute the statistics snapshot of a window.
///
/// Only numeric columns (including all-missing ones) appear in the result;
/// text columns are skipped entirely. Nothing is carried over from earlier
/// windows.
pub fn summarize_window(window: &Window) -> StatsSnapshot {
    let columns = window
        .columns
        .iter()
        .enumerate()
        .filter(|(_, column)| column.kind.is_numeric())
        .map(|(idx, column)| {
            let mut stats = RunningStats::new();
            for value in window.column_cells(idx).filter_map(|cell| cell.as_f64()) {
                stats.add(value);
            }
            stats.finish(column.name.clone())
        })
        .collect();

    StatsSnapshot {
        chunk: window.index,
        columns,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

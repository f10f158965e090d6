//! Equal-width histogram binning.

use chunkstats_core::error::{ChunkStatsError, Result};
use serde::Serialize;

/// Default number of bins, matching the plots of the wine-quality API.
pub const DEFAULT_BINS: usize = 20;

/// Bin counts over `[edges[0], edges[bins]]`.
///
/// Every bin is half-open `[lo, hi)` except the last one, which also
/// includes its right edge so the maximum value is always counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub feature: String,
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their range.
    ///
    /// NaN values are skipped. When every value is equal the range is widened
    /// to `[v - 0.5, v + 0.5]`.
    pub fn from_values(feature: impl Into<String>, values: &[f64], bins: usize) -> Result<Self> {
        let feature = feature.into();
        if bins == 0 {
            return Err(ChunkStatsError::InvalidConfiguration(
                "histogram needs at least one bin".to_string(),
            ));
        }

        let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if finite.is_empty() {
            return Err(ChunkStatsError::NoMatchingRows(feature));
        }

        let (mut lo, mut hi) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        edges[bins] = hi;

        let mut histogram = Self {
            feature,
            edges,
            counts: vec![0usize; bins],
        };
        for v in finite {
            if let Some(bin) = histogram.bin_index(v) {
                histogram.counts[bin] += 1;
            }
        }
        Ok(histogram)
    }

    /// Bin that `value` falls into, or `None` outside `[edges[0], edges[bins]]`.
    ///
    /// The arithmetic guess is corrected against the stored edges, as
    /// `numpy.histogram` does, so `edges[i] <= value < edges[i + 1]` always
    /// holds for the returned bin (the last bin also takes its right edge).
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let bins = self.counts.len();
        let (lo, hi) = (self.edges[0], self.edges[bins]);
        if value.is_nan() || value < lo || value > hi {
            return None;
        }

        let width = (hi - lo) / bins as f64;
        let mut bin = (((value - lo) / width) as usize).min(bins - 1);
        if bin > 0 && value < self.edges[bin] {
            bin -= 1;
        } else if bin + 1 < bins && value >= self.edges[bin + 1] {
            bin += 1;
        }
        Some(bin)
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Number of values binned.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(lo, hi, count)` for every bin, left to right.
    pub fn iter_bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| (self.edges[i], self.edges[i + 1], count))
    }
}

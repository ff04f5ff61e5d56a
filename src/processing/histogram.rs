//! Equal-width histogram with a fitted normal-curve overlay.

use std::f64::consts::PI;

use serde::Serialize;

use crate::data::Dataset;
use crate::processing::statistics::DescriptiveStats;

pub const MIN_BINS: usize = 5;
pub const MAX_BINS: usize = 20;
pub const DEFAULT_BINS: usize = 10;

/// One histogram interval `[range_start, range_end)`; the last bin also
/// holds the maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub range_start: f64,
    pub range_end: f64,
    pub frequency: usize,
    /// Expected count under a normal fit, evaluated at the bin midpoint.
    /// `None` when the column has zero spread.
    pub normal_density: Option<f64>,
}

impl Bin {
    pub fn midpoint(&self) -> f64 {
        (self.range_start + self.range_end) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub stats: DescriptiveStats,
    pub bin_width: f64,
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn total_frequency(&self) -> usize {
        self.bins.iter().map(|b| b.frequency).sum()
    }
}

/// Clamp a requested bin count into `[MIN_BINS, MAX_BINS]`.
pub fn clamp_bin_count(requested: usize) -> usize {
    let clamped = requested.clamp(MIN_BINS, MAX_BINS);
    if clamped != requested {
        tracing::debug!("bin count {requested} clamped to {clamped}");
    }
    clamped
}

/// Bin `values` into `bin_count` equal-width intervals between min and max.
///
/// The bin count is clamped to `[MIN_BINS, MAX_BINS]`. A column where every
/// value is equal yields a single zero-width bin holding all values.
/// Returns `None` if no finite value is present.
pub fn histogram(values: &[f64], bin_count: usize) -> Option<Histogram> {
    let stats = DescriptiveStats::compute(values)?;
    let n = stats.count as f64;

    if stats.range() == 0.0 {
        tracing::debug!("zero-spread column, collapsing histogram to one bin");
        return Some(Histogram {
            bins: vec![Bin {
                range_start: stats.min,
                range_end: stats.max,
                frequency: stats.count,
                normal_density: None,
            }],
            bin_width: 0.0,
            stats,
        });
    }

    let bin_count = clamp_bin_count(bin_count);
    let bin_width = stats.range() / bin_count as f64;

    let mut frequencies = vec![0usize; bin_count];
    for v in values.iter().copied().filter(|v| v.is_finite()) {
        let idx = ((v - stats.min) / bin_width).floor() as usize;
        frequencies[idx.min(bin_count - 1)] += 1;
    }

    let bins = frequencies
        .into_iter()
        .enumerate()
        .map(|(i, frequency)| {
            let range_start = stats.min + i as f64 * bin_width;
            let range_end = range_start + bin_width;
            let mid = range_start + bin_width / 2.0;
            Bin {
                range_start,
                range_end,
                frequency,
                normal_density: expected_count(mid, &stats, n * bin_width),
            }
        })
        .collect();

    Some(Histogram {
        stats,
        bin_width,
        bins,
    })
}

/// Histogram of the numeric cells of `column`.
pub fn histogram_for_column(dataset: &Dataset, column: &str, bin_count: usize) -> Option<Histogram> {
    histogram(&dataset.numeric_column(column), bin_count)
}

/// Normal PDF at `x` scaled by `scale` (N x bin width) into a count.
fn expected_count(x: f64, stats: &DescriptiveStats, scale: f64) -> Option<f64> {
    let sd = stats.std_dev;
    if sd <= 0.0 {
        return None;
    }
    let z = (x - stats.mean) / sd;
    let pdf = (-0.5 * z * z).exp() / (sd * (2.0 * PI).sqrt());
    let expected = pdf * scale;
    expected.is_finite().then_some(expected)
}

//! Individuals control chart with fixed global limits.
//!
//! The limits are deliberately asymmetric: the upper limit sits at
//! `mean + 3σ / 1.5` and the lower at `mean - 3σ / 1.9`. This is not a
//! Shewhart ±3σ chart; the coefficients reproduce the workbench's existing
//! output and must not be symmetrised.

use serde::Serialize;

use crate::data::Dataset;
use crate::processing::statistics::DescriptiveStats;

pub const UPPER_DIVISOR: f64 = 1.5;
pub const LOWER_DIVISOR: f64 = 1.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlLimits {
    pub center_line: f64,
    pub upper_limit: f64,
    pub lower_limit: f64,
}

impl ControlLimits {
    pub fn from_moments(mean: f64, std_dev: f64) -> Self {
        Self {
            center_line: mean,
            upper_limit: mean + (3.0 * std_dev) / UPPER_DIVISOR,
            lower_limit: mean - (3.0 * std_dev) / LOWER_DIVISOR,
        }
    }

    pub fn from_stats(stats: &DescriptiveStats) -> Self {
        Self::from_moments(stats.mean, stats.std_dev)
    }

    pub fn is_out_of_control(&self, value: f64) -> bool {
        value > self.upper_limit || value < self.lower_limit
    }
}

/// An observation on the chart; `index` is 1-based over the numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub index: usize,
    pub value: f64,
    pub out_of_control: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlChart {
    pub limits: ControlLimits,
    pub points: Vec<ChartPoint>,
}

impl ControlChart {
    pub fn violations(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter().filter(|p| p.out_of_control)
    }
}

/// Limits over all finite `values`, or `None` if there are none.
pub fn control_limits(values: &[f64]) -> Option<ControlLimits> {
    DescriptiveStats::compute(values).map(|s| ControlLimits::from_stats(&s))
}

/// Limits plus the observation series in row order.
pub fn control_chart(values: &[f64]) -> Option<ControlChart> {
    let limits = control_limits(values)?;
    let points = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .enumerate()
        .map(|(i, value)| ChartPoint {
            index: i + 1,
            value,
            out_of_control: limits.is_out_of_control(value),
        })
        .collect();
    Some(ControlChart { limits, points })
}

pub fn control_chart_for_column(dataset: &Dataset, column: &str) -> Option<ControlChart> {
    control_chart(&dataset.numeric_column(column))
}

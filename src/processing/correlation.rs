//! Scatter-plot preparation and Pearson correlation.

use serde::Serialize;

use crate::data::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Qualitative reading of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationStrength {
    StrongPositive,
    ModeratePositive,
    Weak,
    ModerateNegative,
    StrongNegative,
}

impl CorrelationStrength {
    pub fn from_r(r: f64) -> Self {
        if r > 0.7 {
            CorrelationStrength::StrongPositive
        } else if r > 0.3 {
            CorrelationStrength::ModeratePositive
        } else if r >= -0.3 {
            CorrelationStrength::Weak
        } else if r >= -0.7 {
            CorrelationStrength::ModerateNegative
        } else {
            CorrelationStrength::StrongNegative
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorrelationStrength::StrongPositive => "Strong positive correlation",
            CorrelationStrength::ModeratePositive => "Moderate positive correlation",
            CorrelationStrength::Weak => "Weak or no correlation",
            CorrelationStrength::ModerateNegative => "Moderate negative correlation",
            CorrelationStrength::StrongNegative => "Strong negative correlation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    pub points: Vec<ScatterPoint>,
    /// Pearson's r, `None` when either axis has zero variance or fewer than
    /// two points survive pairing.
    pub r: Option<f64>,
}

impl Scatter {
    pub fn strength(&self) -> Option<CorrelationStrength> {
        self.r.map(CorrelationStrength::from_r)
    }
}

/// Pearson's r using the raw-sum formula
/// `(nΣxy - ΣxΣy) / sqrt((nΣx² - (Σx)²)(nΣy² - (Σy)²))`.
///
/// Returns `None` for mismatched lengths, fewer than two points, or a
/// non-positive denominator. The result is clamped to `[-1, 1]` to absorb
/// rounding in the raw sums.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;

    let (mut sx, mut sy, mut sxy, mut sx2, mut sy2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        sx += a;
        sy += b;
        sxy += a * b;
        sx2 += a * a;
        sy2 += b * b;
    }

    // Cancellation can leave a constant column with a tiny positive spread.
    let spread_x = n * sx2 - sx * sx;
    let spread_y = n * sy2 - sy * sy;
    if spread_x <= f64::EPSILON * n * sx2 || spread_y <= f64::EPSILON * n * sy2 {
        tracing::debug!("correlation undefined: zero variance");
        return None;
    }
    let denom = (spread_x * spread_y).sqrt();
    if !denom.is_finite() || denom <= 0.0 {
        tracing::debug!("correlation undefined: denominator {denom}");
        return None;
    }
    let r = (n * sxy - sx * sy) / denom;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Pair `x_column` with `y_column` row by row and correlate the pairs.
/// Rows where either cell is not numeric are dropped entirely.
pub fn scatter(dataset: &Dataset, x_column: &str, y_column: &str) -> Scatter {
    let points: Vec<ScatterPoint> = dataset
        .numeric_pairs(x_column, y_column)
        .into_iter()
        .map(|(x, y)| ScatterPoint { x, y })
        .collect();
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let r = pearson(&xs, &ys);
    Scatter { points, r }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn perfect_positive_and_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(pearson(&x, &[2.0, 4.0, 6.0, 8.0]), Some(1.0));
        assert_eq!(pearson(&x, &[8.0, 6.0, 4.0, 2.0]), Some(-1.0));
    }

    #[test]
    fn zero_variance_is_undefined() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
        assert_eq!(pearson(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[2.0, 2.0], &[1.0, 3.0]), None);
    }

    #[test]
    fn too_few_or_mismatched() {
        assert_eq!(pearson(&[], &[]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
    }

    #[test]
    fn strength_bands() {
        assert_eq!(CorrelationStrength::from_r(0.71), CorrelationStrength::StrongPositive);
        assert_eq!(CorrelationStrength::from_r(0.7), CorrelationStrength::ModeratePositive);
        assert_eq!(CorrelationStrength::from_r(0.3), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_r(-0.3), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_r(-0.31), CorrelationStrength::ModerateNegative);
        assert_eq!(CorrelationStrength::from_r(-0.7), CorrelationStrength::ModerateNegative);
        assert_eq!(CorrelationStrength::from_r(-0.9), CorrelationStrength::StrongNegative);
    }

    #[test]
    fn scatter_drops_partial_rows() {
        let ds = Dataset::from_rows(
            vec!["temp".to_string(), "defects".to_string()],
            vec![
                vec!["1", "2"],
                vec!["2", "x"],
                vec!["", "5"],
                vec!["3", "6"],
                vec!["4", "8"],
            ],
        );
        let s = scatter(&ds, "temp", "defects");
        assert_eq!(
            s.points,
            vec![
                ScatterPoint { x: 1.0, y: 2.0 },
                ScatterPoint { x: 3.0, y: 6.0 },
                ScatterPoint { x: 4.0, y: 8.0 },
            ]
        );
        assert!((s.r.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(s.strength(), Some(CorrelationStrength::StrongPositive));
    }

    #[test]
    fn scatter_without_pairs() {
        let ds = Dataset::from_rows(vec!["a".to_string(), "b".to_string()], vec![vec!["1", "z"]]);
        let s = scatter(&ds, "a", "b");
        assert!(s.points.is_empty());
        assert!(s.r.is_none());
        assert!(s.strength().is_none());
    }

    proptest! {
        #[test]
        fn r_is_bounded(
            data in proptest::collection::vec((-1e4_f64..1e4, -1e4_f64..1e4), 2..100)
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = data.into_iter().unzip();
            if let Some(r) = pearson(&x, &y) {
                prop_assert!((-1.0..=1.0).contains(&r), "r out of bounds: {}", r);
            }
        }
    }
}

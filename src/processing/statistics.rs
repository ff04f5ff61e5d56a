use serde::Serialize;

use crate::data::Dataset;

/// Descriptive statistics of one numeric column.
///
/// `std_dev` is the population standard deviation (divisor N). `count` is
/// the number of values that survived numeric filtering, not the raw row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Compute statistics from values, ignoring NaN and infinities.
    /// Returns `None` when no finite value remains.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        let n = count as f64;
        let mean = vals.iter().sum::<f64>() / n;
        let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        vals.sort_by(f64::total_cmp);
        let min = vals[0];
        let max = vals[count - 1];
        let median = if count % 2 == 0 {
            (vals[count / 2 - 1] + vals[count / 2]) / 2.0
        } else {
            vals[count / 2]
        };

        Some(Self {
            count,
            mean,
            variance,
            std_dev,
            median,
            min,
            max,
        })
    }

    /// Statistics of the numeric cells of `column`.
    pub fn from_column(dataset: &Dataset, column: &str) -> Option<Self> {
        Self::compute(&dataset.numeric_column(column))
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn median_even_and_odd() {
        let even = DescriptiveStats::compute(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!(approx(even.median, 2.5));
        let odd = DescriptiveStats::compute(&[3.0, 1.0, 2.0]).unwrap();
        assert!(approx(odd.median, 2.0));
    }

    #[test]
    fn population_std_dev() {
        // mean 5, squared deviations sum 32, N = 8
        let s = DescriptiveStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.count, 8);
        assert!(approx(s.mean, 5.0));
        assert!(approx(s.variance, 4.0));
        assert!(approx(s.std_dev, 2.0));
        assert!(approx(s.min, 2.0));
        assert!(approx(s.max, 9.0));
        assert!(approx(s.range(), 7.0));
    }

    #[test]
    fn single_value() {
        let s = DescriptiveStats::compute(&[42.0]).unwrap();
        assert_eq!(s.count, 1);
        assert!(approx(s.mean, 42.0));
        assert!(approx(s.std_dev, 0.0));
        assert!(approx(s.median, 42.0));
    }

    #[test]
    fn empty_has_no_result() {
        assert!(DescriptiveStats::compute(&[]).is_none());
        assert!(DescriptiveStats::compute(&[f64::NAN, f64::INFINITY]).is_none());
    }

    #[test]
    fn count_is_filtered_count() {
        let ds = Dataset::from_rows(
            vec!["v".to_string()],
            vec![vec!["1"], vec![""], vec!["x"], vec!["3"], vec!["5 kg"]],
        );
        let s = DescriptiveStats::from_column(&ds, "v").unwrap();
        assert_eq!(s.count, 3);
        assert!(approx(s.mean, 3.0));
        assert!(DescriptiveStats::from_column(&ds, "nope").is_none());
    }

    proptest! {
        #[test]
        fn std_dev_non_negative_and_bounds_hold(
            data in proptest::collection::vec(-1e6_f64..1e6, 1..200)
        ) {
            let s = DescriptiveStats::compute(&data).unwrap();
            prop_assert_eq!(s.count, data.len());
            prop_assert!(s.std_dev >= 0.0);
            prop_assert!(s.min <= s.median && s.median <= s.max);
            prop_assert!(s.min <= s.mean + 1e-6 && s.mean <= s.max + 1e-6);
        }

        #[test]
        fn compute_is_idempotent(data in proptest::collection::vec(-1e3_f64..1e3, 0..50)) {
            prop_assert_eq!(DescriptiveStats::compute(&data), DescriptiveStats::compute(&data));
        }
    }
}

//! DPMO, sigma level and yield conversions.
//!
//! All three conversions share the empirical approximation
//!
//! ```text
//! sigma = 0.8406 + sqrt(29.37 - 2.221 * ln(DPMO))
//! DPMO  = exp((29.37 - (sigma - 0.8406)^2) / 2.221)
//! ```
//!
//! which already includes the conventional 1.5σ long-term shift. It is not
//! the exact inverse normal CDF and drifts from tabulated values at the
//! extremes. The formula is only defined for `0 < DPMO <= e^(29.37/2.221)`
//! (about 551,000); outside that range the sigma level is not computable.

use serde::{Deserialize, Serialize};

const SIGMA_OFFSET: f64 = 0.8406;
const SIGMA_INTERCEPT: f64 = 29.37;
const SIGMA_SLOPE: f64 = 2.221;
const MILLION: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmaMetrics {
    pub dpmo: f64,
    pub sigma_level: f64,
    pub yield_percent: f64,
}

/// Sigma level for a DPMO value, `None` when the logarithm or the square
/// root is undefined.
pub fn dpmo_to_sigma(dpmo: f64) -> Option<f64> {
    if !dpmo.is_finite() || dpmo <= 0.0 {
        return None;
    }
    let radicand = SIGMA_INTERCEPT - SIGMA_SLOPE * dpmo.ln();
    if radicand < 0.0 {
        return None;
    }
    Some(SIGMA_OFFSET + radicand.sqrt())
}

pub fn sigma_to_dpmo(sigma_level: f64) -> Option<f64> {
    let dpmo = ((SIGMA_INTERCEPT - (sigma_level - SIGMA_OFFSET).powi(2)) / SIGMA_SLOPE).exp();
    dpmo.is_finite().then_some(dpmo)
}

pub fn dpmo_to_yield(dpmo: f64) -> f64 {
    (1.0 - dpmo / MILLION) * 100.0
}

pub fn yield_to_dpmo(yield_percent: f64) -> f64 {
    (1.0 - yield_percent / 100.0) * MILLION
}

/// A required calculator input: present, non-zero and finite.
fn required(v: f64) -> Option<f64> {
    (v.is_finite() && v != 0.0).then_some(v)
}

/// Metrics from a defect count.
///
/// Every input must be non-zero; zero defects therefore yields `None`
/// rather than an infinite sigma level.
pub fn from_defects(defects: f64, opportunities_per_unit: f64, units: f64) -> Option<SigmaMetrics> {
    let defects = required(defects)?;
    let opportunities = required(opportunities_per_unit)? * required(units)?;
    let rate = defects / opportunities;

    let dpmo = rate * MILLION;
    let Some(sigma_level) = dpmo_to_sigma(dpmo) else {
        tracing::debug!("sigma level not computable for dpmo {dpmo}");
        return None;
    };
    Some(SigmaMetrics {
        dpmo,
        sigma_level,
        yield_percent: (1.0 - rate) * 100.0,
    })
}

/// Metrics from a sigma level; the sigma level is echoed back unchanged.
pub fn from_sigma(sigma_level: f64) -> Option<SigmaMetrics> {
    let sigma_level = required(sigma_level)?;
    let dpmo = sigma_to_dpmo(sigma_level)?;
    Some(SigmaMetrics {
        dpmo,
        sigma_level,
        yield_percent: dpmo_to_yield(dpmo),
    })
}

/// Metrics from a yield percentage; the yield is echoed back unchanged.
pub fn from_yield(yield_percent: f64) -> Option<SigmaMetrics> {
    let yield_percent = required(yield_percent)?;
    let dpmo = yield_to_dpmo(yield_percent);
    let Some(sigma_level) = dpmo_to_sigma(dpmo) else {
        tracing::debug!("sigma level not computable for yield {yield_percent}%");
        return None;
    };
    Some(SigmaMetrics {
        dpmo,
        sigma_level,
        yield_percent,
    })
}

/// Which input the calculator form converts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalculatorMode {
    #[default]
    Defects,
    SigmaLevel,
    Yield,
}

/// The calculator form: every field the user can see, kept between
/// calculations.
///
/// Each calculation writes only the fields it computes. Converting from a
/// sigma level or a yield leaves `defects`, `opportunities` and `units` as
/// they were, so after switching modes they may describe an older
/// calculation. Call [`SigmaCalculator::reset`] for a clean form.
/// A failed calculation leaves every field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SigmaCalculator {
    pub mode: CalculatorMode,
    pub defects: Option<f64>,
    pub opportunities: Option<f64>,
    pub units: Option<f64>,
    pub dpmo: Option<f64>,
    pub sigma_level: Option<f64>,
    pub yield_percent: Option<f64>,
}

impl SigmaCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Self::default()
        };
    }

    pub fn calculate_from_defects(
        &mut self,
        defects: f64,
        opportunities: f64,
        units: f64,
    ) -> Option<SigmaMetrics> {
        let metrics = from_defects(defects, opportunities, units)?;
        self.mode = CalculatorMode::Defects;
        self.defects = Some(defects);
        self.opportunities = Some(opportunities);
        self.units = Some(units);
        self.store(&metrics);
        Some(metrics)
    }

    pub fn calculate_from_sigma(&mut self, sigma_level: f64) -> Option<SigmaMetrics> {
        let metrics = from_sigma(sigma_level)?;
        self.mode = CalculatorMode::SigmaLevel;
        self.store(&metrics);
        Some(metrics)
    }

    pub fn calculate_from_yield(&mut self, yield_percent: f64) -> Option<SigmaMetrics> {
        let metrics = from_yield(yield_percent)?;
        self.mode = CalculatorMode::Yield;
        self.store(&metrics);
        Some(metrics)
    }

    /// The metric fields, if all three are filled.
    pub fn metrics(&self) -> Option<SigmaMetrics> {
        Some(SigmaMetrics {
            dpmo: self.dpmo?,
            sigma_level: self.sigma_level?,
            yield_percent: self.yield_percent?,
        })
    }

    fn store(&mut self, metrics: &SigmaMetrics) {
        self.dpmo = Some(metrics.dpmo);
        self.sigma_level = Some(metrics.sigma_level);
        self.yield_percent = Some(metrics.yield_percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rel_close(a: f64, b: f64, tol: f64) -> bool {
        ((a - b) / b).abs() < tol
    }

    #[test]
    fn from_defects_known_case() {
        let m = from_defects(7.0, 10.0, 100.0).unwrap();
        assert!((m.dpmo - 7000.0).abs() < 1e-9);
        assert!((m.yield_percent - 99.3).abs() < 1e-9);
        let expected = 0.8406 + (29.37 - 2.221 * 7000f64.ln()).sqrt();
        assert!((m.sigma_level - expected).abs() < 1e-12);
        assert!((m.sigma_level - 3.956).abs() < 1e-2);
    }

    #[test]
    fn approximation_tracks_the_usual_table() {
        assert!((dpmo_to_sigma(3.4).unwrap() - 6.0).abs() < 0.01);
        assert!((dpmo_to_sigma(66_807.0).unwrap() - 3.0).abs() < 0.02);
    }

    #[test]
    fn missing_or_zero_inputs_are_invalid() {
        assert!(from_defects(0.0, 10.0, 100.0).is_none());
        assert!(from_defects(5.0, 0.0, 100.0).is_none());
        assert!(from_defects(5.0, 10.0, f64::NAN).is_none());
        assert!(from_sigma(0.0).is_none());
        assert!(from_yield(0.0).is_none());
    }

    #[test]
    fn undefined_logarithm_is_reported() {
        // negative count gives negative dpmo
        assert!(from_defects(-1.0, 1.0, 1.0).is_none());
        // 100% yield means zero dpmo
        assert!(from_yield(100.0).is_none());
        // more than ~551k dpmo puts the radicand below zero
        assert!(from_defects(9.0, 1.0, 10.0).is_none());
        assert!(dpmo_to_sigma(f64::INFINITY).is_none());
    }

    #[test]
    fn from_sigma_and_yield() {
        let m = from_sigma(4.5).unwrap();
        assert_eq!(m.sigma_level, 4.5);
        assert!((m.yield_percent - dpmo_to_yield(m.dpmo)).abs() < 1e-12);
        assert!(m.dpmo > 0.0 && m.dpmo < 10_000.0);

        let m = from_yield(99.0).unwrap();
        assert_eq!(m.yield_percent, 99.0);
        assert!((m.dpmo - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn dpmo_sigma_dpmo_round_trip() {
        for dpmo in [3.4, 233.0, 6_210.0, 66_807.0, 308_538.0] {
            let sigma = dpmo_to_sigma(dpmo).unwrap();
            let back = sigma_to_dpmo(sigma).unwrap();
            assert!(rel_close(back, dpmo, 1e-9), "{dpmo} -> {sigma} -> {back}");
        }
    }

    #[test]
    fn calculator_keeps_stale_inputs_across_modes() {
        let mut calc = SigmaCalculator::new();
        calc.calculate_from_defects(7.0, 10.0, 100.0).unwrap();
        assert_eq!(calc.defects, Some(7.0));

        let m = calc.calculate_from_yield(99.0).unwrap();
        assert_eq!(calc.mode, CalculatorMode::Yield);
        assert_eq!(calc.metrics(), Some(m));
        // defect inputs still describe the first calculation
        assert_eq!(calc.defects, Some(7.0));
        assert_eq!(calc.units, Some(100.0));
        assert!((calc.dpmo.unwrap() - 10_000.0).abs() < 1e-6);

        calc.reset();
        assert_eq!(calc.defects, None);
        assert_eq!(calc.metrics(), None);
        assert_eq!(calc.mode, CalculatorMode::Yield);
    }

    #[test]
    fn failed_calculation_leaves_form_untouched() {
        let mut calc = SigmaCalculator::new();
        calc.calculate_from_sigma(5.0).unwrap();
        let before = calc.clone();
        assert!(calc.calculate_from_yield(0.0).is_none());
        assert_eq!(calc, before);
    }

    proptest! {
        #[test]
        fn round_trip_within_domain(dpmo in 0.01_f64..500_000.0) {
            let sigma = dpmo_to_sigma(dpmo).unwrap();
            let back = sigma_to_dpmo(sigma).unwrap();
            prop_assert!(rel_close(back, dpmo, 1e-6), "{} -> {} -> {}", dpmo, sigma, back);
        }

        #[test]
        fn higher_sigma_fewer_defects(a in 0.9_f64..3.0, b in 3.5_f64..6.0) {
            prop_assert!(sigma_to_dpmo(a).unwrap() > sigma_to_dpmo(b).unwrap());
        }
    }
}

//! Linear trend fitting over year-to-date cumulative billings.

use serde::{Deserialize, Serialize};

use crate::aggregate::PeriodSeries;
use crate::error::{FakturaError, Result};

/// Fewer elapsed points than this and a fit is statistically meaningless.
const MIN_ELAPSED_PERIODS: usize = 3;

/// `amount(period) = intercept + slope * period`, period 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub intercept: f64,
    pub slope: f64,
}

impl TrendFit {
    pub fn value_at(&self, period: usize) -> f64 {
        self.intercept + self.slope * period as f64
    }

    /// The fitted line evaluated over `1..=total_periods`, for chart overlays.
    pub fn curve(&self, total_periods: usize) -> Vec<f64> {
        (1..=total_periods).map(|p| self.value_at(p)).collect()
    }
}

/// Ordinary least-squares fit of a cumulative series against its 1-based
/// period index, over the elapsed periods only.
///
/// Returns `Ok(None)` when fewer than [`MIN_ELAPSED_PERIODS`] periods have
/// elapsed. A degenerate period axis (zero variance) is reported as
/// [`FakturaError::InsufficientData`] instead of dividing by zero.
pub fn fit_cumulative(series: &PeriodSeries, elapsed_periods: usize) -> Result<Option<TrendFit>> {
    if elapsed_periods < MIN_ELAPSED_PERIODS {
        return Ok(None);
    }

    let n = elapsed_periods.min(series.len());
    let count = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    for period in 1..=n {
        let x = period as f64;
        let y = series.get(period) as f64;
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
    }

    let denom = count * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return Err(FakturaError::InsufficientData { points: n });
    }

    let slope = (count * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / count;
    Ok(Some(TrendFit { intercept, slope }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[i64]) -> PeriodSeries {
        let mut s = PeriodSeries::months();
        for (i, v) in values.iter().enumerate() {
            s.add(i + 1, *v).unwrap();
        }
        s
    }

    #[test]
    fn test_linear_series_recovers_slope() {
        // Cumulative curve 10, 20, 30, 40 over four elapsed months.
        let s = series(&[10, 20, 30, 40]);
        let fit = fit_cumulative(&s, 4).unwrap().unwrap();
        assert!(fit.intercept.abs() < 1e-9, "intercept {}", fit.intercept);
        assert!((fit.slope - 10.0).abs() < 1e-9, "slope {}", fit.slope);
        assert!((fit.value_at(12) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_elapsed_periods_yield_no_fit() {
        let s = series(&[10, 20]);
        assert!(fit_cumulative(&s, 2).unwrap().is_none());
        assert!(fit_cumulative(&s, 0).unwrap().is_none());
    }

    #[test]
    fn test_flat_series_fits_zero_slope() {
        let s = series(&[500, 500, 500, 500, 500]);
        let fit = fit_cumulative(&s, 5).unwrap().unwrap();
        assert!(fit.slope.abs() < 1e-9);
        assert!((fit.intercept - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_curve_spans_all_periods() {
        let s = series(&[10, 20, 30, 40]);
        let fit = fit_cumulative(&s, 4).unwrap().unwrap();
        let curve = fit.curve(12);
        assert_eq!(curve.len(), 12);
        assert!((curve[0] - 10.0).abs() < 1e-9);
        assert!((curve[11] - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_noisy_series_matches_closed_form() {
        let s = series(&[12, 19, 33, 38, 52]);
        let fit = fit_cumulative(&s, 5).unwrap().unwrap();
        // Closed-form OLS over (1,12)..(5,52): slope 9.9, intercept 1.1.
        assert!((fit.slope - 9.9).abs() < 1e-9);
        assert!((fit.intercept - 1.1).abs() < 1e-9);
    }
}

//! Ordinary least squares over `(index, value)`

/// Fewest points a forecast is attempted with
pub const MIN_POINTS: usize = 10;

/// Most recent points used for the fit
pub const FIT_WINDOW: usize = 20;

/// Default number of forecast steps
pub const DEFAULT_PERIODS: usize = 6;

/// Fitted line `value = slope * index + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    /// Number of points the line was fitted to
    pub points: usize,
}

impl LinearTrend {
    /// Fit a line to `values` indexed 0, 1, 2, ...
    ///
    /// Returns `None` for fewer than two points, when the slope denominator
    /// is zero, or when the result is not finite.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let n = values.len() as f64;
        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
        for (index, &value) in values.iter().enumerate() {
            let x = index as f64;
            sum_x += x;
            sum_y += value;
            sum_xy += x * value;
            sum_x2 += x * x;
        }

        let denominator = n * sum_x2 - sum_x * sum_x;
        if denominator == 0.0 {
            return None;
        }
        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        if !slope.is_finite() || !intercept.is_finite() {
            return None;
        }

        Some(Self {
            slope,
            intercept,
            points: values.len(),
        })
    }

    /// Value of the line at `index`
    pub fn at(&self, index: f64) -> f64 {
        self.slope * index + self.intercept
    }

    /// `periods` values continuing the line after the last fitted point
    pub fn extrapolate(&self, periods: usize) -> Vec<f64> {
        (0..periods)
            .map(|step| self.at((self.points + step) as f64))
            .collect()
    }
}

/// Forecast the next `periods` values of a series.
///
/// Uses the most recent [`FIT_WINDOW`] points. `None` when the series has
/// fewer than [`MIN_POINTS`] values or no line can be fitted.
pub fn predict(series: &[f64], periods: usize) -> Option<Vec<f64>> {
    if series.len() < MIN_POINTS {
        return None;
    }
    let window = &series[series.len().saturating_sub(FIT_WINDOW)..];
    LinearTrend::fit(window).map(|trend| trend.extrapolate(periods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_too_short() {
        let series: Vec<f64> = (0..9).map(|i| i as f64).collect();
        assert_eq!(predict(&series, DEFAULT_PERIODS), None);
    }

    #[test]
    fn test_identity_series_continues() {
        let series: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let forecast = predict(&series, DEFAULT_PERIODS).unwrap();
        assert_eq!(forecast.len(), 6);
        for (step, value) in forecast.iter().enumerate() {
            assert!((value - (20 + step) as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_uses_last_window_only() {
        // flat history followed by a clean ramp
        let mut series = vec![1_000.0; 30];
        series.extend((0..20).map(|i| 2.0 * i as f64));
        let forecast = predict(&series, 1).unwrap();
        assert!((forecast[0] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_series() {
        let forecast = predict(&[21.5; 12], 3).unwrap();
        assert!(forecast.iter().all(|v| (v - 21.5).abs() < 1e-9));
    }

    #[test]
    fn test_degenerate_fit() {
        assert_eq!(LinearTrend::fit(&[4.0]), None);
        assert_eq!(LinearTrend::fit(&[]), None);
        assert_eq!(LinearTrend::fit(&[1.0, f64::NAN, 3.0]), None);
    }

    proptest! {
        #[test]
        fn prop_linear_series_is_reproduced(
            slope in -50.0f64..50.0,
            intercept in -1_000.0f64..1_000.0,
            len in MIN_POINTS..40usize,
        ) {
            let series: Vec<f64> = (0..len).map(|i| slope * i as f64 + intercept).collect();
            let forecast = predict(&series, 3).unwrap();
            for (step, value) in forecast.iter().enumerate() {
                let expected = slope * (len + step) as f64 + intercept;
                prop_assert!((value - expected).abs() < 1e-6 * (1.0 + expected.abs()));
            }
        }

        #[test]
        fn prop_forecast_length(series in prop::collection::vec(-100.0f64..100.0, MIN_POINTS..60), periods in 0..12usize) {
            if let Some(forecast) = predict(&series, periods) {
                prop_assert_eq!(forecast.len(), periods);
            }
        }
    }
}

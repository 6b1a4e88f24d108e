//! # Yield Analytics
//!
//! One-feature least squares, the hold-out-last regression forecast, and
//! Pearson correlation over (NDVI max, yield) points.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Peak NDVI and yield for one district-year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    /// Harvest year.
    pub year: i32,
    /// Peak NDVI of the season.
    pub ndvi_max: f64,
    /// Observed yield.
    pub productive: f64,
}

/// `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Coefficient of x.
    pub slope: f64,
    /// Value at x = 0.
    pub intercept: f64,
}

impl LinearFit {
    /// Ordinary least squares on a single feature.
    ///
    /// With zero variance in `xs` the fit degenerates to the mean of `ys`.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, AnalyticsError> {
        if xs.len() != ys.len() {
            return Err(AnalyticsError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.is_empty() {
            return Err(AnalyticsError::NotEnoughPoints { needed: 1, got: 0 });
        }
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            sxy += (x - mean_x) * (y - mean_y);
            sxx += (x - mean_x) * (x - mean_x);
        }
        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    /// Evaluate the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// A prediction scored against the observed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Predicted yield.
    pub prediction: f64,
    /// Observed yield.
    pub actual: f64,
    /// Absolute error.
    pub error: f64,
    /// Absolute error as a percentage of `actual`; 0 when `actual` is 0.
    pub error_percent: f64,
}

impl Forecast {
    /// Score `prediction` against `actual`.
    pub fn score(prediction: f64, actual: f64) -> Self {
        let error = (prediction - actual).abs();
        let error_percent = if actual == 0.0 {
            0.0
        } else {
            error / actual * 100.0
        };
        Self {
            prediction,
            actual,
            error,
            error_percent,
        }
    }
}

/// Shorthand for [`Forecast::score`].
pub fn forecast_error(prediction: f64, actual: f64) -> Forecast {
    Forecast::score(prediction, actual)
}

/// Result of [`regression_forecast`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionForecast {
    /// Year of the held-out point.
    pub year: i32,
    /// Prediction for the held-out point.
    #[serde(flatten)]
    pub forecast: Forecast,
    /// Fitted slope.
    pub slope: f64,
    /// Fitted intercept.
    pub intercept: f64,
}

/// Fit NDVI max → yield on every point but the last and forecast the last.
pub fn regression_forecast(points: &[YearPoint]) -> Result<RegressionForecast, AnalyticsError> {
    let (target, train) = match points.split_last() {
        Some((last, rest)) if !rest.is_empty() => (last, rest),
        _ => {
            return Err(AnalyticsError::NotEnoughPoints {
                needed: 2,
                got: points.len(),
            })
        }
    };
    let xs: Vec<f64> = train.iter().map(|p| p.ndvi_max).collect();
    let ys: Vec<f64> = train.iter().map(|p| p.productive).collect();
    let fit = LinearFit::fit(&xs, &ys)?;
    Ok(RegressionForecast {
        year: target.year,
        forecast: Forecast::score(fit.predict(target.ndvi_max), target.productive),
        slope: fit.slope,
        intercept: fit.intercept,
    })
}

/// Pearson correlation coefficient, or `None` when it is undefined.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    r.is_finite().then_some(r.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn point(year: i32, ndvi_max: f64, productive: f64) -> YearPoint {
        YearPoint {
            year,
            ndvi_max,
            productive,
        }
    }

    #[test]
    fn fit_recovers_exact_line() {
        let fit = LinearFit::fit(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]).unwrap();
        assert!(approx(fit.slope, 2.0));
        assert!(approx(fit.intercept, 1.0));
        assert!(approx(fit.predict(10.0), 21.0));
    }

    #[test]
    fn fit_with_constant_x_uses_mean() {
        let fit = LinearFit::fit(&[0.5, 0.5, 0.5], &[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert!(approx(fit.intercept, 20.0));
    }

    #[test]
    fn fit_single_point() {
        let fit = LinearFit::fit(&[0.7], &[25.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert!(approx(fit.predict(0.1), 25.0));
    }

    #[test]
    fn fit_errors() {
        assert_eq!(
            LinearFit::fit(&[], &[]).unwrap_err(),
            AnalyticsError::NotEnoughPoints { needed: 1, got: 0 }
        );
        assert_eq!(
            LinearFit::fit(&[1.0], &[1.0, 2.0]).unwrap_err(),
            AnalyticsError::LengthMismatch { xs: 1, ys: 2 }
        );
    }

    #[test]
    fn forecast_error_percent() {
        let f = forecast_error(27.0, 30.0);
        assert!(approx(f.error, 3.0));
        assert!(approx(f.error_percent, 10.0));
        assert_eq!(forecast_error(5.0, 0.0).error_percent, 0.0);
    }

    #[test]
    fn regression_holds_out_last_point() {
        let points = [
            point(2018, 0.5, 20.0),
            point(2019, 0.6, 24.0),
            point(2020, 0.7, 28.0),
            point(2021, 0.8, 30.0),
        ];
        let r = regression_forecast(&points).unwrap();
        assert_eq!(r.year, 2021);
        assert!(approx(r.slope, 40.0));
        assert!(approx(r.intercept, 0.0));
        assert!(approx(r.forecast.prediction, 32.0));
        assert!(approx(r.forecast.error, 2.0));
        assert_eq!(r.forecast.actual, 30.0);
    }

    #[test]
    fn regression_needs_two_points() {
        assert_eq!(
            regression_forecast(&[point(2020, 0.5, 20.0)]).unwrap_err(),
            AnalyticsError::NotEnoughPoints { needed: 2, got: 1 }
        );
        assert!(regression_forecast(&[]).is_err());
    }

    #[test]
    fn regression_serializes_flat() {
        let r = regression_forecast(&[point(2019, 0.5, 20.0), point(2020, 0.5, 20.0)]).unwrap();
        let v = serde_json::to_value(r).unwrap();
        assert_eq!(v["prediction"], 20.0);
        assert_eq!(v["error_percent"], 0.0);
        assert_eq!(v["slope"], 0.0);
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        assert!(approx(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap(), 1.0));
        assert!(approx(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap(), -1.0));
    }

    #[test]
    fn pearson_undefined_cases() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 1.0], &[2.0, 3.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[2.0]), None);
    }
}

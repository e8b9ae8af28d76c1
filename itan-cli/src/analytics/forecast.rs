//! Weight forecast by least-squares regression on a day index

use chrono::NaiveDateTime;
use serde::Serialize;

/// Fitted line `weight = intercept + slope * day`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Ordinary least squares over `(x, y)` points.
    ///
    /// With a single distinct x the slope is zero and the line passes
    /// through the mean of y.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

        let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
        let sxy: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();

        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Longest horizon accepted, one year
pub const MAX_FORECAST_DAYS: u32 = 366;

/// One predicted day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub day: i64,
    pub predicted_weight: f64,
}

/// Forecast for the days following the last observation
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub fit: LinearFit,
    /// Observations used (rows with both a date and a weight)
    pub observations: usize,
    /// Earliest date, i.e. day 0
    pub origin: NaiveDateTime,
    pub points: Vec<ForecastPoint>,
}

/// Regress weight on whole days since the earliest date and predict the
/// `horizon` days after the latest day index
pub fn forecast(observations: &[(NaiveDateTime, f64)], horizon: u32) -> Option<Forecast> {
    let origin = observations.iter().map(|(d, _)| *d).min()?;
    let points: Vec<(f64, f64)> = observations
        .iter()
        .map(|(d, w)| ((*d - origin).num_days() as f64, *w))
        .collect();
    let fit = LinearFit::fit(&points)?;

    let last_day = observations
        .iter()
        .map(|(d, _)| (*d - origin).num_days())
        .max()
        .unwrap_or(0);

    let predictions = (last_day + 1..=last_day + horizon as i64)
        .map(|day| ForecastPoint {
            day,
            predicted_weight: fit.predict(day as f64),
        })
        .collect();

    Some(Forecast {
        fit,
        observations: observations.len(),
        origin,
        points: predictions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_fit_recovers_line() {
        let fit = LinearFit::fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_x_gives_flat_line_through_mean() {
        let fit = LinearFit::fit(&[(3.0, 2.0), (3.0, 4.0)]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.predict(10.0), 3.0);
    }

    #[test]
    fn test_forecast_starts_after_last_day() {
        let obs = vec![(day(1), 10.0), (day(3), 14.0), (day(2), 12.0)];
        let f = forecast(&obs, 30).unwrap();
        assert_eq!(f.origin, day(1));
        assert_eq!(f.points.len(), 30);
        assert_eq!(f.points[0].day, 3);
        assert_eq!(f.points[29].day, 32);
        assert!((f.points[0].predicted_weight - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_forecast_without_observations() {
        assert!(forecast(&[], 30).is_none());
    }
}

//! Ordinary least squares fit of value versus absolute time
//!
//! Fits `value ≈ slope * t + intercept` with `t` in milliseconds since the
//! Unix epoch, using the centered OLS form:
//!
//! ```text
//! slope = Σ(xᵢ − x̄)(yᵢ − ȳ) / Σ(xᵢ − x̄)²
//! intercept = ȳ − slope·x̄
//! ```
//!
//! Double precision throughout, summation in input order, no rounding of
//! intermediate sums. Identical input always yields identical coefficients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sample::SampleSet;
use crate::{Error, Result};

/// Fitted linear relationship between absolute time and observed value.
///
/// Serializes to the wire names of the prediction contract: `coef`, `bias`,
/// `start_date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    /// Slope in value units per millisecond.
    #[serde(rename = "coef")]
    slope: f64,
    /// Value-axis intercept at the epoch.
    #[serde(rename = "bias")]
    intercept: f64,
    /// Timestamp of the first sample in the fitting set. Carried for
    /// reporting only; it plays no part in the coefficients.
    #[serde(rename = "start_date")]
    reference_start: DateTime<Utc>,
}

impl TrendModel {
    /// Fit slope and intercept over a sample set.
    ///
    /// # Errors
    ///
    /// Returns `Error::DegenerateModel` if the set holds fewer than 2
    /// samples or all samples share one timestamp (zero time variance).
    pub fn fit(set: &SampleSet) -> Result<Self> {
        let n = set.len();
        if n < 2 {
            return Err(Error::DegenerateModel(format!(
                "cannot fit a line to {n} sample(s); need at least 2"
            )));
        }

        #[allow(clippy::cast_precision_loss)]
        let count = n as f64;
        let mut x_sum = 0.0;
        let mut y_sum = 0.0;
        for sample in set.samples() {
            x_sum += sample.time_ms();
            y_sum += sample.value();
        }
        let x_mean = x_sum / count;
        let y_mean = y_sum / count;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for sample in set.samples() {
            let dx = sample.time_ms() - x_mean;
            sxx += dx * dx;
            sxy += dx * (sample.value() - y_mean);
        }

        if sxx == 0.0 {
            return Err(Error::DegenerateModel(
                "zero time variance: all samples share one timestamp".to_string(),
            ));
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        debug!(slope, intercept, samples = n, "fitted trend model");

        Ok(Self {
            slope,
            intercept,
            reference_start: set.samples()[0].timestamp(),
        })
    }

    /// Slope in value units per millisecond.
    #[must_use]
    pub const fn slope(&self) -> f64 {
        self.slope
    }

    /// Value-axis intercept at the epoch.
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Timestamp of the first sample the model was fit on.
    #[must_use]
    pub const fn reference_start(&self) -> DateTime<Utc> {
        self.reference_start
    }

    /// Evaluate the model at a time coordinate in ms since the epoch.
    #[must_use]
    pub fn value_at_ms(&self, time_ms: f64) -> f64 {
        self.slope * time_ms + self.intercept
    }

    /// Evaluate the model at an instant.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value_at(&self, instant: DateTime<Utc>) -> f64 {
        self.value_at_ms(instant.timestamp_millis() as f64)
    }
}

#[cfg(test)]
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use chrono::TimeZone;

    fn daily_set(values: &[f64]) -> SampleSet {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let samples = values
            .iter()
            .enumerate()
            .map(|(day, &value)| {
                Sample::new(start + chrono::Duration::days(day as i64), value).unwrap()
            })
            .collect();
        SampleSet::new(samples).unwrap()
    }

    #[test]
    fn test_fit_recovers_exact_line() {
        // y = 25 per day, starting at 0
        let set = daily_set(&[0.0, 25.0, 50.0, 75.0, 100.0]);
        let model = TrendModel::fit(&set).unwrap();

        let per_day = model.slope() * 86_400_000.0;
        assert!(
            (per_day - 25.0).abs() < 1e-6,
            "slope per day = {per_day}, expected 25"
        );
        for sample in set.samples() {
            let predicted = model.value_at(sample.timestamp());
            assert!(
                (predicted - sample.value()).abs() < 1e-6,
                "predicted {predicted} vs observed {}",
                sample.value()
            );
        }
    }

    #[test]
    fn test_fit_reference_start_is_first_sample() {
        let set = daily_set(&[5.0, 7.0, 9.0]);
        let model = TrendModel::fit(&set).unwrap();
        assert_eq!(model.reference_start(), set.samples()[0].timestamp());
    }

    #[test]
    fn test_fit_single_sample_is_degenerate() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let set = SampleSet::new(vec![Sample::new(start, 1.0).unwrap()]).unwrap();
        let err = TrendModel::fit(&set).unwrap_err();
        assert!(matches!(err, Error::DegenerateModel(_)));
    }

    #[test]
    fn test_fit_identical_timestamps_is_degenerate() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let samples = vec![
            Sample::new(instant, 1.0).unwrap(),
            Sample::new(instant, 2.0).unwrap(),
            Sample::new(instant, 3.0).unwrap(),
        ];
        let set = SampleSet::new(samples).unwrap();
        let err = TrendModel::fit(&set).unwrap_err();
        assert!(matches!(err, Error::DegenerateModel(_)));
        assert!(err.to_string().contains("zero time variance"));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let set = daily_set(&[3.1, 1.4, 4.1, 5.9, 2.6, 5.3]);
        let first = TrendModel::fit(&set).unwrap();
        let second = TrendModel::fit(&set).unwrap();
        assert_eq!(first.slope().to_bits(), second.slope().to_bits());
        assert_eq!(first.intercept().to_bits(), second.intercept().to_bits());
    }

    #[test]
    fn test_fit_constant_values_yields_zero_slope() {
        // Constant y over distinct timestamps is a valid (horizontal) fit;
        // the degenerate condition surfaces later, in metrics or forecast.
        let set = daily_set(&[4.0, 4.0, 4.0, 4.0]);
        let model = TrendModel::fit(&set).unwrap();
        assert!(model.slope().abs() < 1e-12);
        assert!((model.value_at(set.samples()[2].timestamp()) - 4.0).abs() < 1e-9);
    }
}

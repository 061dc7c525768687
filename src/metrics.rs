//! Goodness-of-fit metrics
//!
//! Pure functions of a (true values, predicted values) pairing: R², MSE,
//! RMSE. R² is undefined when the true values have zero variance; that is
//! signaled as a degenerate model, never returned as NaN.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Goodness-of-fit metrics for one (true, predicted) pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitMetrics {
    r_squared: f64,
    mean_squared_error: f64,
    root_mean_squared_error: f64,
}

impl FitMetrics {
    /// Compute metrics over parallel slices of equal length n ≥ 1.
    ///
    /// ```text
    /// SSres = Σ(yᵢ − ŷᵢ)²
    /// SStot = Σ(yᵢ − ȳ)²
    /// R² = 1 − SSres/SStot,  MSE = SSres/n,  RMSE = √MSE
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the slices are empty or their
    /// lengths differ, and `Error::DegenerateModel` if all true values are
    /// identical (SStot = 0).
    pub fn compute(true_values: &[f64], predicted_values: &[f64]) -> Result<Self> {
        if true_values.is_empty() {
            return Err(Error::InvalidInput(
                "metrics require at least one observation".to_string(),
            ));
        }
        if true_values.len() != predicted_values.len() {
            return Err(Error::InvalidInput(format!(
                "length mismatch: {} true values vs {} predictions",
                true_values.len(),
                predicted_values.len()
            )));
        }

        #[allow(clippy::cast_precision_loss)]
        let n = true_values.len() as f64;
        let mean = true_values.iter().sum::<f64>() / n;

        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (observed, predicted) in true_values.iter().zip(predicted_values) {
            ss_res += (observed - predicted) * (observed - predicted);
            ss_tot += (observed - mean) * (observed - mean);
        }

        if ss_tot == 0.0 {
            return Err(Error::DegenerateModel(
                "zero value variance: R² is undefined for constant observations".to_string(),
            ));
        }

        let mean_squared_error = ss_res / n;
        Ok(Self {
            r_squared: 1.0 - ss_res / ss_tot,
            mean_squared_error,
            root_mean_squared_error: mean_squared_error.sqrt(),
        })
    }

    /// Coefficient of determination.
    #[must_use]
    pub const fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Mean squared error.
    #[must_use]
    pub const fn mean_squared_error(&self) -> f64 {
        self.mean_squared_error
    }

    /// Root mean squared error.
    #[must_use]
    pub const fn root_mean_squared_error(&self) -> f64 {
        self.root_mean_squared_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let observed = [1.0, 2.0, 3.0, 4.0];
        let metrics = FitMetrics::compute(&observed, &observed).unwrap();
        assert!((metrics.r_squared() - 1.0).abs() < f64::EPSILON);
        assert!(metrics.mean_squared_error().abs() < f64::EPSILON);
        assert!(metrics.root_mean_squared_error().abs() < f64::EPSILON);
    }

    #[test]
    fn test_known_values() {
        // SSres = 1 + 0 + 1 + 0 = 2, mean = 2.5, SStot = 5
        let observed = [1.0, 2.0, 3.0, 4.0];
        let predicted = [2.0, 2.0, 4.0, 4.0];
        let metrics = FitMetrics::compute(&observed, &predicted).unwrap();
        assert!((metrics.r_squared() - 0.6).abs() < 1e-12);
        assert!((metrics.mean_squared_error() - 0.5).abs() < 1e-12);
        assert!((metrics.root_mean_squared_error() - 0.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_constant_observations_are_degenerate() {
        let observed = [7.0, 7.0, 7.0];
        let predicted = [6.0, 7.0, 8.0];
        let err = FitMetrics::compute(&observed, &predicted).unwrap_err();
        assert!(matches!(err, Error::DegenerateModel(_)));
        assert!(err.to_string().contains("zero value variance"));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = FitMetrics::compute(&[], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = FitMetrics::compute(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("length mismatch"));
    }

    #[test]
    fn test_single_observation() {
        // n = 1 is accepted by the contract, but a single observation has
        // zero variance, so R² is undefined.
        let err = FitMetrics::compute(&[5.0], &[5.0]).unwrap_err();
        assert!(matches!(err, Error::DegenerateModel(_)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let metrics = FitMetrics::compute(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        let json = serde_json::to_value(metrics).unwrap();
        assert!(json.get("rSquared").is_some());
        assert!(json.get("meanSquaredError").is_some());
        assert!(json.get("rootMeanSquaredError").is_some());
    }
}

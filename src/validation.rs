//! K-fold cross-validation of the trend estimator
//!
//! Partitions the sample set into k contiguous, non-overlapping test folds
//! of floor(n/k) samples each, refits the estimator on everything outside
//! the fold, and averages the resulting metrics. Cross-validation is not
//! best-effort: one degenerate fold fails the whole operation.
//!
//! Remainder samples beyond k·floor(n/k) never serve as a test fold (they
//! still appear in every training set). Inherited boundary behavior, kept
//! as documented rather than corrected.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::estimator::TrendModel;
use crate::metrics::FitMetrics;
use crate::sample::{Sample, SampleSet};
use crate::{Error, Result};

/// Fold-averaged metrics from k-fold cross-validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossValidationResult {
    r_squared: f64,
    mean_squared_error: f64,
    root_mean_squared_error: f64,
}

impl CrossValidationResult {
    /// Fold-averaged coefficient of determination.
    #[must_use]
    pub const fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Fold-averaged mean squared error.
    #[must_use]
    pub const fn mean_squared_error(&self) -> f64 {
        self.mean_squared_error
    }

    /// Fold-averaged root mean squared error.
    #[must_use]
    pub const fn root_mean_squared_error(&self) -> f64 {
        self.root_mean_squared_error
    }
}

/// Run k-fold cross-validation over a sample set.
///
/// Performs exactly `folds` refits. Fold i's test slice is
/// `[i·fold_size, (i+1)·fold_size)` with `fold_size = floor(n/folds)`;
/// its training set is every sample outside the slice, order preserved.
///
/// # Errors
///
/// Returns `Error::DegenerateModel` if `folds` is 0 or exceeds the sample
/// count (fold size would be 0), and propagates any error from a fold's
/// refit or metrics computation unchanged.
pub fn cross_validate(set: &SampleSet, folds: usize) -> Result<CrossValidationResult> {
    let n = set.len();
    if folds == 0 {
        return Err(Error::DegenerateModel(
            "fold count must be at least 1".to_string(),
        ));
    }
    let fold_size = n / folds;
    if fold_size == 0 {
        return Err(Error::DegenerateModel(format!(
            "cannot partition {n} sample(s) into {folds} folds"
        )));
    }

    let mut r_squared_sum = 0.0;
    let mut mse_sum = 0.0;
    let mut rmse_sum = 0.0;

    for fold in 0..folds {
        let (training, test) = split_fold(set.samples(), fold * fold_size, fold_size);
        if training.is_empty() {
            return Err(Error::DegenerateModel(
                "training partition is empty".to_string(),
            ));
        }

        let model = TrendModel::fit(&SampleSet::new(training)?)?;
        let observed: Vec<f64> = test.iter().map(Sample::value).collect();
        let predicted: Vec<f64> = test
            .iter()
            .map(|sample| model.value_at_ms(sample.time_ms()))
            .collect();
        let metrics = FitMetrics::compute(&observed, &predicted)?;

        debug!(
            fold,
            test_len = test.len(),
            r_squared = metrics.r_squared(),
            "evaluated fold"
        );
        r_squared_sum += metrics.r_squared();
        mse_sum += metrics.mean_squared_error();
        rmse_sum += metrics.root_mean_squared_error();
    }

    #[allow(clippy::cast_precision_loss)]
    let count = folds as f64;
    Ok(CrossValidationResult {
        r_squared: r_squared_sum / count,
        mean_squared_error: mse_sum / count,
        root_mean_squared_error: rmse_sum / count,
    })
}

/// Split samples into (training set, test slice) for one fold.
///
/// The test slice is `[test_start, test_start + fold_size)`; the training
/// set is everything else, by exclusion, order preserved.
fn split_fold(samples: &[Sample], test_start: usize, fold_size: usize) -> (Vec<Sample>, &[Sample]) {
    let test_end = test_start + fold_size;
    let mut training = Vec::with_capacity(samples.len() - fold_size);
    training.extend_from_slice(&samples[..test_start]);
    training.extend_from_slice(&samples[test_end..]);
    (training, &samples[test_start..test_end])
}

#[cfg(test)]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn daily_set(values: &[f64]) -> SampleSet {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let samples = values
            .iter()
            .enumerate()
            .map(|(day, &value)| Sample::new(start + Duration::days(day as i64), value).unwrap())
            .collect();
        SampleSet::new(samples).unwrap()
    }

    #[test]
    fn test_split_fold_sizes_and_order() {
        let set = daily_set(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let (training, test) = split_fold(set.samples(), 2, 2);

        assert_eq!(test.len(), 2);
        assert_eq!(training.len(), 5);
        let training_values: Vec<f64> = training.iter().map(Sample::value).collect();
        assert_eq!(training_values, vec![0.0, 1.0, 4.0, 5.0, 6.0]);
        let test_values: Vec<f64> = test.iter().map(Sample::value).collect();
        assert_eq!(test_values, vec![2.0, 3.0]);
    }

    #[test]
    fn test_folds_partition_without_overlap() {
        // n = 11, k = 4 → fold_size = 2; test folds cover [0, 8), the
        // remainder [8, 11) is never tested
        let n = 11;
        let folds = 4;
        let fold_size = n / folds;
        let set = daily_set(&(0..n).map(|i| i as f64).collect::<Vec<_>>());

        let mut tested = vec![0_u32; n];
        for fold in 0..folds {
            let (training, test) = split_fold(set.samples(), fold * fold_size, fold_size);
            assert_eq!(test.len(), fold_size);
            assert_eq!(training.len(), n - fold_size);
            for sample in test {
                let index = (sample.value()) as usize;
                tested[index] += 1;
            }
        }

        for (index, &count) in tested.iter().enumerate() {
            if index < folds * fold_size {
                assert_eq!(count, 1, "sample {index} must be tested exactly once");
            } else {
                assert_eq!(count, 0, "remainder sample {index} must never be tested");
            }
        }
    }

    #[test]
    fn test_cross_validate_perfect_line() {
        let set = daily_set(&(0..10).map(|i| f64::from(i) * 10.0).collect::<Vec<_>>());
        let result = cross_validate(&set, 5).unwrap();
        assert!((result.r_squared() - 1.0).abs() < 1e-9);
        assert!(result.mean_squared_error() < 1e-9);
        assert!(result.root_mean_squared_error() < 1e-6);
    }

    #[test]
    fn test_cross_validate_noisy_line_reasonable() {
        // Line with deterministic perturbations; CV should succeed with
        // nonzero error and a finite fold-averaged R²
        let values: Vec<f64> = (0..20)
            .map(|i| f64::from(i) * 5.0 + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let set = daily_set(&values);
        let result = cross_validate(&set, 5).unwrap();
        assert!(result.mean_squared_error() > 0.0);
        assert!(result.r_squared().is_finite());
        assert!(result.root_mean_squared_error() > 0.0);
    }

    #[test]
    fn test_cross_validate_more_folds_than_samples() {
        let set = daily_set(&[1.0, 2.0, 3.0]);
        let err = cross_validate(&set, 5).unwrap_err();
        assert!(matches!(err, Error::DegenerateModel(_)));
        assert!(err.to_string().contains("cannot partition"));
    }

    #[test]
    fn test_cross_validate_zero_folds() {
        let set = daily_set(&[1.0, 2.0, 3.0]);
        let err = cross_validate(&set, 0).unwrap_err();
        assert!(matches!(err, Error::DegenerateModel(_)));
    }

    #[test]
    fn test_cross_validate_constant_test_fold_fails_whole_operation() {
        // First test fold is [5, 5]: zero variance → degenerate, and the
        // whole run fails rather than skipping the fold
        let set = daily_set(&[5.0, 5.0, 1.0, 2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 9.0]);
        let err = cross_validate(&set, 5).unwrap_err();
        assert!(matches!(err, Error::DegenerateModel(_)));
    }

    #[test]
    fn test_cross_validate_single_fold_has_no_training_data() {
        // k = 1 makes the test slice the whole set; nothing remains to train on
        let set = daily_set(&[1.0, 2.0, 3.0, 4.0]);
        let err = cross_validate(&set, 1).unwrap_err();
        assert!(matches!(err, Error::DegenerateModel(_)));
    }
}

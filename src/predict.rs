//! Prediction orchestration
//!
//! `Predictor` is the single entry point external collaborators call. It
//! composes normalization, the full-sample fit, goodness-of-fit metrics,
//! k-fold cross-validation, and threshold-crossing resolution into one
//! immutable response object. Any failure along the way aborts the whole
//! operation; no partial result is ever returned.
//!
//! A `Predictor` is plain configuration data: stateless, `Copy`, and safe
//! to share across concurrent calls. Every call allocates its own sample
//! set; nothing is cached between requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::estimator::TrendModel;
use crate::forecast::resolve_crossing;
use crate::metrics::FitMetrics;
use crate::sample::SampleSet;
use crate::validation::{cross_validate, CrossValidationResult};
use crate::Result;

/// Default fold count for cross-validation.
pub const DEFAULT_FOLDS: usize = 5;

/// Default maintenance threshold the monitored quantity is forecast against.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Complete, immutable output of one prediction call.
///
/// Serializes to the wire contract consumed by the transport layer:
///
/// ```json
/// {
///   "coef": ..., "bias": ..., "start_date": "...", "predictedDate": "...",
///   "metrics": {
///     "rSquared": ..., "meanSquaredError": ..., "rootMeanSquaredError": ...,
///     "crossValidation": { "rSquared": ..., "meanSquaredError": ..., "rootMeanSquaredError": ... }
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(flatten)]
    model: TrendModel,
    #[serde(rename = "predictedDate")]
    forecast_instant: DateTime<Utc>,
    metrics: MetricsReport,
}

impl PredictionResult {
    /// The fitted trend model.
    #[must_use]
    pub const fn model(&self) -> &TrendModel {
        &self.model
    }

    /// Instant at which the model forecasts the threshold crossing.
    #[must_use]
    pub const fn forecast_instant(&self) -> DateTime<Utc> {
        self.forecast_instant
    }

    /// Full-sample goodness-of-fit metrics.
    #[must_use]
    pub const fn metrics(&self) -> &FitMetrics {
        self.metrics.fit()
    }

    /// Fold-averaged cross-validation metrics.
    #[must_use]
    pub const fn cross_validation(&self) -> &CrossValidationResult {
        self.metrics.cross_validation()
    }
}

/// Full-sample metrics with the cross-validation block nested inside, as
/// the wire contract expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    #[serde(flatten)]
    fit: FitMetrics,
    #[serde(rename = "crossValidation")]
    cross_validation: CrossValidationResult,
}

impl MetricsReport {
    /// Full-sample metrics.
    #[must_use]
    pub const fn fit(&self) -> &FitMetrics {
        &self.fit
    }

    /// Cross-validation metrics.
    #[must_use]
    pub const fn cross_validation(&self) -> &CrossValidationResult {
        &self.cross_validation
    }
}

/// Stateless prediction engine holding the per-call configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predictor {
    folds: usize,
    threshold: f64,
}

impl Default for Predictor {
    fn default() -> Self {
        Self {
            folds: DEFAULT_FOLDS,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Predictor {
    /// Create a predictor with the default configuration
    /// (`DEFAULT_FOLDS` folds, `DEFAULT_THRESHOLD` threshold).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a predictor builder.
    #[must_use]
    pub fn builder() -> PredictorBuilder {
        PredictorBuilder::default()
    }

    /// Configured fold count.
    #[must_use]
    pub const fn folds(&self) -> usize {
        self.folds
    }

    /// Configured maintenance threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Transport-facing entry point: normalize a raw JSON `data` payload
    /// and predict.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the payload fails normalization and
    /// any error from [`Self::predict`] unchanged.
    pub fn predict_json(&self, data: &Value) -> Result<PredictionResult> {
        let set = SampleSet::from_json(data)?;
        self.predict(&set)
    }

    /// Run one prediction over an already-normalized sample set.
    ///
    /// Steps, in order: fit the full model, compute full-sample metrics
    /// (the full set serves as both train and test), cross-validate,
    /// resolve the threshold crossing. The first failure aborts the call
    /// and propagates unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::DegenerateModel` for zero time variance, constant
    /// observations, an unsatisfiable fold request, or a zero-slope model
    /// at forecast time.
    pub fn predict(&self, set: &SampleSet) -> Result<PredictionResult> {
        let model = TrendModel::fit(set)?;

        let observed = set.values();
        let predicted: Vec<f64> = set
            .samples()
            .iter()
            .map(|sample| model.value_at_ms(sample.time_ms()))
            .collect();
        let fit = FitMetrics::compute(&observed, &predicted)?;

        let cross_validation = cross_validate(set, self.folds)?;
        let forecast_instant = resolve_crossing(&model, self.threshold)?;

        debug!(
            samples = set.len(),
            folds = self.folds,
            threshold = self.threshold,
            %forecast_instant,
            "prediction complete"
        );

        Ok(PredictionResult {
            model,
            forecast_instant,
            metrics: MetricsReport {
                fit,
                cross_validation,
            },
        })
    }
}

/// Builder for [`Predictor`].
#[derive(Debug, Clone, Copy)]
pub struct PredictorBuilder {
    folds: usize,
    threshold: f64,
}

impl Default for PredictorBuilder {
    fn default() -> Self {
        Self {
            folds: DEFAULT_FOLDS,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl PredictorBuilder {
    /// Set the cross-validation fold count (default 5).
    #[must_use]
    pub const fn folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    /// Set the maintenance threshold (default 100.0).
    #[must_use]
    pub const fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Build the predictor.
    #[must_use]
    pub const fn build(self) -> Predictor {
        Predictor {
            folds: self.folds,
            threshold: self.threshold,
        }
    }
}

//! # Trendcast: Maintenance-Date Forecasting from Sensor Trends
//!
//! Trendcast fits a univariate linear model of observed value versus
//! absolute time and inverts it to forecast the date at which a monitored
//! quantity will cross a fixed maintenance threshold. Alongside the fit it
//! reports goodness-of-fit metrics (R², MSE, RMSE) and validates the model
//! with k-fold cross-validation.
//!
//! The crate is the statistical core only: stateless, synchronous, pure
//! computation. Transport (HTTP), file handling, and charting are external
//! collaborators that call [`Predictor::predict_json`] with the raw `data`
//! payload and serialize the [`PredictionResult`] back out.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//! use trendcast::Predictor;
//!
//! # fn main() -> trendcast::Result<()> {
//! // Ten daily readings climbing 10 units per day
//! let data = json!([
//!     {"date": "2024-01-01", "y": 0.0},
//!     {"date": "2024-01-02", "y": 10.0},
//!     {"date": "2024-01-03", "y": 20.0},
//!     {"date": "2024-01-04", "y": 30.0},
//!     {"date": "2024-01-05", "y": 40.0},
//!     {"date": "2024-01-06", "y": 50.0},
//!     {"date": "2024-01-07", "y": 60.0},
//!     {"date": "2024-01-08", "y": 70.0},
//!     {"date": "2024-01-09", "y": 80.0},
//!     {"date": "2024-01-10", "y": 90.0},
//! ]);
//!
//! let predictor = Predictor::builder().folds(5).threshold(100.0).build();
//! let result = predictor.predict_json(&data)?;
//!
//! // The trend reaches 100 one day past the last reading
//! let expected = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();
//! assert!((result.forecast_instant() - expected).num_seconds().abs() <= 1);
//! assert!(result.metrics().r_squared() > 0.999);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod estimator;
pub mod forecast;
pub mod metrics;
pub mod predict;
pub mod sample;
pub mod validation;

pub use error::{Error, Result};
pub use estimator::TrendModel;
pub use forecast::resolve_crossing;
pub use metrics::FitMetrics;
pub use predict::{PredictionResult, Predictor, PredictorBuilder, DEFAULT_FOLDS, DEFAULT_THRESHOLD};
pub use sample::{Sample, SampleSet};
pub use validation::{cross_validate, CrossValidationResult};

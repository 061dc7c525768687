//! Threshold-crossing forecast resolution
//!
//! Inverts a fitted trend model to find the instant at which the modeled
//! value equals the maintenance threshold: `t = (threshold − bias) / coef`.
//! The model purely extrapolates; whether the crossing lies in the past or
//! the future relative to the data is deliberately unconstrained.

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::estimator::TrendModel;
use crate::{Error, Result};

/// Resolve the instant at which the fitted line crosses `threshold`.
///
/// # Errors
///
/// Returns `Error::DegenerateModel` if the slope is zero (a horizontal
/// model either never reaches the threshold or sits on it at all times) or
/// if the crossing instant falls outside the representable date range.
pub fn resolve_crossing(model: &TrendModel, threshold: f64) -> Result<DateTime<Utc>> {
    if model.slope() == 0.0 {
        return Err(Error::DegenerateModel(
            "zero slope: a horizontal model never crosses the threshold".to_string(),
        ));
    }

    let crossing_ms = (threshold - model.intercept()) / model.slope();
    let instant = instant_from_ms(crossing_ms)?;
    debug!(threshold, %instant, "resolved threshold crossing");
    if instant < model.reference_start() {
        warn!(%instant, "threshold crossing precedes the first observation");
    }
    Ok(instant)
}

/// Convert a millisecond time coordinate back to an instant.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn instant_from_ms(time_ms: f64) -> Result<DateTime<Utc>> {
    let out_of_range = || {
        Error::DegenerateModel(format!(
            "crossing time {time_ms} ms is outside the representable date range"
        ))
    };

    if !time_ms.is_finite() || time_ms < i64::MIN as f64 || time_ms > i64::MAX as f64 {
        return Err(out_of_range());
    }
    Utc.timestamp_millis_opt(time_ms.round() as i64)
        .single()
        .ok_or_else(out_of_range)
}

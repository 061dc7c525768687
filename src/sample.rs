//! Time-series sample normalization
//!
//! Converts raw `{date, y}` records supplied by a transport layer into a
//! validated, ordered sample set the estimator can work on. Accepted `date`
//! encodings: RFC 3339 / ISO-8601 strings, plain `YYYY-MM-DD` dates
//! (midnight UTC), and JSON numbers interpreted as milliseconds since the
//! Unix epoch. Input order is preserved; it matters for fold partitioning
//! in cross-validation, not for the fit itself.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::{Error, Result};

/// One timestamped observation. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    timestamp: DateTime<Utc>,
    value: f64,
}

impl Sample {
    /// Create a sample.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `value` is not finite.
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "sample value must be finite, got {value}"
            )));
        }
        Ok(Self { timestamp, value })
    }

    /// Timestamp of the observation.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Observed value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Time coordinate used by the estimator: milliseconds since the Unix
    /// epoch as `f64`. The unit is consistent between fit and evaluation.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn time_ms(&self) -> f64 {
        self.timestamp.timestamp_millis() as f64
    }
}

/// Ordered, validated sequence of samples.
///
/// Built per request from externally supplied raw data, owned by the call
/// that created it, and dropped with the response. Never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Wrap an already-validated sequence of samples.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `samples` is empty.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("sample sequence is empty".to_string()));
        }
        Ok(Self { samples })
    }

    /// Normalize a raw JSON `data` payload into a sample set.
    ///
    /// The payload must be a non-empty array of objects, each carrying a
    /// parseable `date` and a finite numeric `y`. Fails fast on the first
    /// bad record; no partial set is produced.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the payload is not an array, the
    /// array is empty, or any record is malformed.
    pub fn from_json(raw: &Value) -> Result<Self> {
        let records = raw.as_array().ok_or_else(|| {
            Error::InvalidInput("data must be an array of {date, y} records".to_string())
        })?;

        let mut samples = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let fields = record.as_object().ok_or_else(|| {
                Error::InvalidInput(format!("record {index} is not an object"))
            })?;

            let date = fields.get("date").ok_or_else(|| {
                Error::InvalidInput(format!("record {index} is missing a date"))
            })?;
            let timestamp = parse_timestamp(date)
                .ok_or_else(|| Error::InvalidInput(format!("record {index}: unparseable date {date}")))?;

            let value = fields.get("y").and_then(Value::as_f64).ok_or_else(|| {
                Error::InvalidInput(format!("record {index} has no numeric y"))
            })?;

            samples.push(Sample::new(timestamp, value)?);
        }

        Self::new(samples)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the set is empty. Construction rejects empty sets, so this
    /// is always `false`; provided for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The samples, in input order.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Time coordinates (ms since epoch), in input order.
    #[must_use]
    pub fn times_ms(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::time_ms).collect()
    }

    /// Observed values, in input order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::value).collect()
    }
}

/// Parse a raw `date` field into an instant.
///
/// Mirrors what lenient datetime constructors accept from CSV-sourced rows:
/// RFC 3339 strings, bare dates, or epoch-millisecond numbers.
fn parse_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(text) => parse_timestamp_str(text),
        Value::Number(millis) => {
            let millis = millis.as_f64()?;
            if !millis.is_finite() {
                return None;
            }
            #[allow(clippy::cast_possible_truncation)]
            let millis = millis as i64;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    // Bare dates are taken as midnight UTC
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

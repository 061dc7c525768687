//! Error types for Trendcast
//!
//! Two distinct kinds so the transport layer can tell a caller mistake
//! apart from data the model cannot be fit to. Both map to a client
//! error status at the boundary; the core never formats user-facing text
//! beyond these `Display` impls.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trendcast error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input rejected during normalization: not an array, empty, an
    /// unparseable timestamp, or a non-finite value. Detected before any
    /// fitting happens.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested quantity is mathematically undefined for this data:
    /// zero time variance in a fit, zero value variance in a metrics
    /// computation, a zero-slope model at forecast time, or a fold request
    /// the sample set cannot satisfy. Never coerced to NaN/Infinity.
    #[error("Degenerate model: {0}")]
    DegenerateModel(String),
}

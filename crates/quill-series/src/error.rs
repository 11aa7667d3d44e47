//! The shared error type for the q-series engines.
//!
//! Outcomes across the workspace are tri-state: `Ok(Some(_))` for a result,
//! `Ok(None)` when a bounded search came up empty, and `Err(_)` for the
//! conditions below. A search running out of its caller-supplied bounds is
//! not an error; exceeding an internal safety cap is.

use thiserror::Error;

/// Errors produced by the q-series engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An input parameter violates the operation's domain.
    #[error("malformed parameter: {0}")]
    MalformedParameter(String),

    /// A series inversion or quotient hit a zero constant term, or a product
    /// factor vanished identically.
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    /// An algorithm that can legitimately fail reported that no answer exists
    /// in its search space.
    #[error("no result: {0}")]
    NoResult(String),

    /// A coefficient beyond the known truncation order was requested.
    #[error("precision exhausted: {0}")]
    PrecisionExhausted(String),

    /// An internal safety cap was exceeded before the computation finished.
    #[error("resource bound exceeded: {0}")]
    ResourceBound(String),
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

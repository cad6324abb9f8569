//! Unified error handling for blockgate.
//!
//! Configuration errors live in [`crate::config`], storage errors in
//! [`crate::db`]; this module wraps what the gate itself surfaces.

use crate::db::DbError;
use thiserror::Error;

/// Errors surfaced by the decision pipeline and block commands.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("block store error: {0}")]
    Store(#[from] DbError),
}

impl GateError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Store(DbError::RecordExists { .. }) => "record_exists",
            Self::Store(DbError::RecordMissing { .. }) => "record_missing",
            Self::Store(DbError::Encoding(_)) => "encoding",
            Self::Store(_) => "store_unavailable",
        }
    }
}

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;

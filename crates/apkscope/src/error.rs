//! Caller-visible failures.
//!
//! Low-level faults never cross the boundary verbatim; they are logged where
//! they occur and reduced to one of these variants.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArchive(String),

    #[error("method not implemented: {0}")]
    NotImplemented(String),
}

impl ServiceError {
    /// Error code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidArchive(_) => "INVALID_APK",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
        }
    }
}

/// A submitted scan panicked or was aborted before producing a value.
#[derive(Debug, Error)]
#[error("scan task '{label}' failed: {reason}")]
pub struct TaskFailed {
    pub label: &'static str,
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, ServiceError>;

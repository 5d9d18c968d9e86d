//! Error types for metadata resolution.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid package archive '{}': {reason}", path.display())]
    InvalidArchive { path: PathBuf, reason: String },

    #[error("malformed binary resource: {0}")]
    Malformed(&'static str),
}

pub type Result<T> = std::result::Result<T, ManifestError>;

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to open archive '{}': {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("entry not found: '{0}'")]
    EntryNotFound(String),

    #[error("failed to read entry '{name}': {reason}")]
    Entry { name: String, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ArchiveError {
    pub(crate) fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

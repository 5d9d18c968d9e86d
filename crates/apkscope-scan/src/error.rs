use std::io;
use std::path::PathBuf;

use apkscope_archive::ArchiveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("file not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;

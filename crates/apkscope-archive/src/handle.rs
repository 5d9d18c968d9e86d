use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::detect::MAGIC_LEN;
use crate::{ArchiveEntry, ArchiveError, EntryInfo, Result, is_zip};

pub(crate) type Source = BufReader<File>;

/// An open zip-format archive.
///
/// Owns its file descriptor; dropping the handle closes it, whichever way the
/// owning scope exits.
pub struct ArchiveHandle {
    path: PathBuf,
    archive: ZipArchive<Source>,
}

impl std::fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveHandle")
            .field("path", &self.path)
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl ArchiveHandle {
    /// Open `path` and parse its central directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ArchiveError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ArchiveError::open(path, e),
        })?;

        let mut reader = BufReader::new(file);
        let mut header = [0u8; MAGIC_LEN];
        if reader.read_exact(&mut header).is_err() || !is_zip(&header) {
            return Err(ArchiveError::open(path, "not a zip archive"));
        }
        reader.rewind().map_err(|e| ArchiveError::open(path, e))?;

        let archive = ZipArchive::new(reader).map_err(|e| ArchiveError::open(path, e))?;
        tracing::debug!(path = %path.display(), entries = archive.len(), "archive opened");

        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Central directory listing, in archive order. Nothing is decompressed.
    pub fn entries(&mut self) -> Result<Vec<EntryInfo>> {
        let archive = &mut self.archive;
        (0..archive.len())
            .map(|index| {
                archive
                    .by_index_raw(index)
                    .map(|file| EntryInfo::from_zip(&file))
                    .map_err(|e| positional_error(index, e))
            })
            .collect()
    }

    /// Stream the entry at `index`.
    pub fn entry_at(&mut self, index: usize) -> Result<ArchiveEntry<'_>> {
        self.archive
            .by_index(index)
            .map(ArchiveEntry::new)
            .map_err(|e| positional_error(index, e))
    }

    /// Stream the entry named exactly `name`.
    pub fn by_name(&mut self, name: &str) -> Result<ArchiveEntry<'_>> {
        match self.archive.by_name(name) {
            Ok(file) => Ok(ArchiveEntry::new(file)),
            Err(ZipError::FileNotFound) => Err(ArchiveError::EntryNotFound(name.to_string())),
            Err(e) => Err(ArchiveError::Entry {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

fn positional_error(index: usize, e: ZipError) -> ArchiveError {
    match e {
        ZipError::FileNotFound => ArchiveError::EntryNotFound(format!("#{index}")),
        e => ArchiveError::Entry {
            name: format!("#{index}"),
            reason: e.to_string(),
        },
    }
}

use std::io::{self, Read};

use zip::read::ZipFile;

use crate::handle::Source;
use crate::{ArchiveError, Result};

/// Upper bound on the buffer reserved up front from a declared entry size.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Owned snapshot of an entry's central directory record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    pub is_dir: bool,
}

impl EntryInfo {
    pub(crate) fn from_zip<R: Read>(file: &ZipFile<'_, R>) -> Self {
        Self {
            name: file.name().to_string(),
            size: file.size(),
            compressed_size: file.compressed_size(),
            is_dir: file.is_dir(),
        }
    }
}

/// Decompressing byte stream over one archive member.
///
/// Borrows the [`ArchiveHandle`](crate::ArchiveHandle) it came from.
pub struct ArchiveEntry<'a> {
    file: ZipFile<'a, Source>,
}

impl std::fmt::Debug for ArchiveEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("name", &self.file.name())
            .finish_non_exhaustive()
    }
}

impl<'a> ArchiveEntry<'a> {
    pub(crate) fn new(file: ZipFile<'a, Source>) -> Self {
        Self { file }
    }

    pub fn name(&self) -> &str {
        self.file.name()
    }

    /// Uncompressed size as declared by the archive.
    pub fn size(&self) -> u64 {
        self.file.size()
    }

    pub fn compressed_size(&self) -> u64 {
        self.file.compressed_size()
    }

    pub fn is_dir(&self) -> bool {
        self.file.is_dir()
    }

    pub fn info(&self) -> EntryInfo {
        EntryInfo::from_zip(&self.file)
    }

    /// Read the remaining content into memory.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut content = Vec::with_capacity(self.size().min(MAX_PREALLOC) as usize);
        self.file
            .read_to_end(&mut content)
            .map_err(|e| ArchiveError::Entry {
                name: self.file.name().to_string(),
                reason: e.to_string(),
            })?;
        Ok(content)
    }
}

impl Read for ArchiveEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

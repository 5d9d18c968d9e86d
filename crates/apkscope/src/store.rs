//! Locating installed packages and copying them out.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Installed payload inside a per-package directory.
pub const BASE_APK: &str = "base.apk";

/// Maps a package identifier to the path of its installed archive.
pub trait PackageStore: Send + Sync {
    fn source_path(&self, package: &str) -> Option<PathBuf>;
}

impl<S: PackageStore + ?Sized> PackageStore for Box<S> {
    fn source_path(&self, package: &str) -> Option<PathBuf> {
        (**self).source_path(package)
    }
}

impl<S: PackageStore + ?Sized> PackageStore for std::sync::Arc<S> {
    fn source_path(&self, package: &str) -> Option<PathBuf> {
        (**self).source_path(package)
    }
}

/// Dot-separated segments of ASCII letters, digits and underscores.
///
/// Anything else, including path separators and `..`, is not a package name.
pub fn is_package_name(package: &str) -> bool {
    !package.is_empty()
        && package.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        })
}

/// Installed packages under a root directory, laid out the way the platform
/// installs them.
///
/// Lookup order:
///
/// 1. `<root>/<package>/base.apk`
/// 2. `<root>/<package>-<suffix>/base.apk`, first in name order
/// 3. `<root>/<package>.apk`
#[derive(Clone, Debug)]
pub struct DirectoryPackageStore {
    root: PathBuf,
}

impl DirectoryPackageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn suffixed(&self, package: &str) -> Option<PathBuf> {
        let prefix = format!("{package}-");
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(root = %self.root.display(), error = %e, "package root unreadable");
                return None;
            }
        };

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .map(|entry| entry.path().join(BASE_APK))
            .filter(|path| path.is_file())
            .collect();
        candidates.sort();
        candidates.into_iter().next()
    }
}

impl PackageStore for DirectoryPackageStore {
    fn source_path(&self, package: &str) -> Option<PathBuf> {
        if !is_package_name(package) {
            return None;
        }

        let direct = self.root.join(package).join(BASE_APK);
        if direct.is_file() {
            return Some(direct);
        }
        if let Some(path) = self.suffixed(package) {
            return Some(path);
        }
        let flat = self.root.join(format!("{package}.apk"));
        flat.is_file().then_some(flat)
    }
}

/// Copy `source` to `<cache_dir>/<package>.apk`, replacing any existing file.
///
/// The bytes are staged in a temporary file inside `cache_dir` and renamed
/// into place, so a failed copy leaves no partial destination behind.
pub fn copy_package(source: &Path, cache_dir: &Path, package: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(cache_dir)?;
    let destination = cache_dir.join(format!("{package}.apk"));

    let mut staged = NamedTempFile::new_in(cache_dir)?;
    let mut input = File::open(source)?;
    let copied = io::copy(&mut input, staged.as_file_mut())?;
    staged.as_file().sync_all()?;

    if destination.exists() {
        tracing::debug!(path = %destination.display(), "replacing cached copy");
    }
    // atomic rename over any previous copy
    staged.persist(&destination).map_err(|e| e.error)?;

    tracing::debug!(bytes = copied, path = %destination.display(), "package copied");
    Ok(destination)
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Version reported when the manifest declares none.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Identity and declared requirements of a package archive.
///
/// Serialized with the keys the method-call boundary exposes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(rename = "appName")]
    pub label: String,
    #[serde(rename = "packageName")]
    pub package_name: String,
    pub version: String,
    pub path: PathBuf,
    pub permissions: Vec<String>,
}

impl PackageMetadata {
    pub fn new(package_name: impl Into<String>, label: impl Into<String>, path: &Path) -> Self {
        Self {
            label: label.into(),
            package_name: package_name.into(),
            version: UNKNOWN_VERSION.to_string(),
            path: path.to_path_buf(),
            permissions: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for permission in permissions {
            self.add_permission(permission);
        }
        self
    }

    /// Append a permission unless already present. Returns whether it was added.
    pub fn add_permission(&mut self, permission: impl Into<String>) -> bool {
        let permission = permission.into();
        if self.permissions.contains(&permission) {
            return false;
        }
        self.permissions.push(permission);
        true
    }
}

/// Resolves package metadata from an archive on disk.
pub trait PackageMetadataProvider: Send + Sync {
    /// Fails with [`ManifestError::InvalidArchive`](crate::ManifestError::InvalidArchive)
    /// when the file is missing or cannot be parsed as a package.
    fn resolve(&self, path: &Path) -> Result<PackageMetadata>;
}

impl<P: PackageMetadataProvider + ?Sized> PackageMetadataProvider for Box<P> {
    fn resolve(&self, path: &Path) -> Result<PackageMetadata> {
        (**self).resolve(path)
    }
}

impl<P: PackageMetadataProvider + ?Sized> PackageMetadataProvider for std::sync::Arc<P> {
    fn resolve(&self, path: &Path) -> Result<PackageMetadata> {
        (**self).resolve(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_unknown_version() {
        let metadata = PackageMetadata::new("com.example", "Example", Path::new("/a.apk"));
        assert_eq!(metadata.version, UNKNOWN_VERSION);
        assert!(metadata.permissions.is_empty());
    }

    #[test]
    fn permissions_keep_first_occurrence_order() {
        let metadata = PackageMetadata::new("com.example", "Example", Path::new("/a.apk"))
            .with_permissions([
                "android.permission.INTERNET",
                "android.permission.CAMERA",
                "android.permission.INTERNET",
            ]);
        assert_eq!(
            metadata.permissions,
            ["android.permission.INTERNET", "android.permission.CAMERA"]
        );
    }

    #[test]
    fn add_permission_reports_novelty() {
        let mut metadata = PackageMetadata::new("com.example", "Example", Path::new("/a.apk"));
        assert!(metadata.add_permission("android.permission.INTERNET"));
        assert!(!metadata.add_permission("android.permission.INTERNET"));
    }
}

//! Package metadata (identity, version, label, permissions) for APK archives.
//!
//! # Architecture
//!
//! Resolution is a collaborator, not a fixed algorithm. The
//! [`PackageMetadataProvider`] trait is the only contract between the
//! inspection engine and whatever knows how to read a package: a host
//! platform service, a fake in tests, or the built-in
//! [`AxmlMetadataProvider`], which decodes the binary `AndroidManifest.xml`
//! stored in the archive and resolves label references through
//! `resources.arsc`.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use apkscope_manifest::{ManifestError, PackageMetadata, PackageMetadataProvider};
//!
//! struct Fixed;
//!
//! impl PackageMetadataProvider for Fixed {
//!     fn resolve(&self, path: &Path) -> Result<PackageMetadata, ManifestError> {
//!         Ok(PackageMetadata::new("com.example.app", "Example", path))
//!     }
//! }
//!
//! let metadata = Fixed.resolve(Path::new("/tmp/app.apk")).unwrap();
//! assert_eq!(metadata.version, "unknown");
//! ```

pub use error::{ManifestError, Result};
pub use metadata::{PackageMetadata, PackageMetadataProvider, UNKNOWN_VERSION};
pub use arsc::{RESOURCE_TABLE_ENTRY, ResourceTable};
pub use provider::{AxmlMetadataProvider, MANIFEST_ENTRY};

pub mod arsc;
pub mod axml;
mod chunk;
mod error;
mod metadata;
mod pool;
mod provider;

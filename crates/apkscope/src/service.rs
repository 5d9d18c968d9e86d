use std::path::{Path, PathBuf};
use std::sync::Arc;

use apkscope_manifest::{AxmlMetadataProvider, PackageMetadata, PackageMetadataProvider};
use apkscope_scan::{ObfuscationVerdict, ScanError, UrlSet, analyze_obfuscation, extract_endpoints};

use crate::store::{self, DirectoryPackageStore, PackageStore};
use crate::{Config, Result, ScanExecutor, ServiceError};

/// The four inspection operations over installed packages.
///
/// Cheap to share behind an [`Arc`]; holds no per-call state.
pub struct Inspector {
    store: Arc<dyn PackageStore>,
    metadata: Arc<dyn PackageMetadataProvider>,
    executor: ScanExecutor,
    cache_dir: PathBuf,
}

impl std::fmt::Debug for Inspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inspector")
            .field("cache_dir", &self.cache_dir)
            .finish_non_exhaustive()
    }
}

fn required<'a>(value: &'a str, name: &'static str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidArgument(name));
    }
    Ok(value)
}

impl Inspector {
    pub fn new(
        store: impl PackageStore + 'static,
        metadata: impl PackageMetadataProvider + 'static,
        executor: ScanExecutor,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            metadata: Arc::new(metadata),
            executor,
            cache_dir: cache_dir.into(),
        }
    }

    /// Directory store and binary manifest decoder as configured.
    pub fn from_config(config: &Config, executor: ScanExecutor) -> Self {
        Self::new(
            DirectoryPackageStore::new(&config.package_root),
            AxmlMetadataProvider::new(),
            executor,
            &config.cache_dir,
        )
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Copy the installed archive of `package` into the cache directory and
    /// return the destination path.
    pub fn extract_package(&self, package: &str) -> Result<PathBuf> {
        let package = required(package, "packageName")?;

        let source = self.store.source_path(package).ok_or_else(|| {
            tracing::warn!(package, "package not installed");
            ServiceError::NotFound(format!("package '{package}' is not installed"))
        })?;

        let destination = store::copy_package(&source, &self.cache_dir, package).map_err(|e| {
            tracing::warn!(package, source = %source.display(), error = %e, "copy failed");
            ServiceError::NotFound(format!("could not copy package '{package}'"))
        })?;

        tracing::info!(package, path = %destination.display(), "package extracted");
        Ok(destination)
    }

    pub fn package_metadata(&self, file_path: &str) -> Result<PackageMetadata> {
        let file_path = required(file_path, "filePath")?;

        let metadata = self.metadata.resolve(Path::new(file_path)).map_err(|e| {
            tracing::warn!(path = file_path, error = %e, "metadata unavailable");
            ServiceError::InvalidArchive(format!("could not parse package archive '{file_path}'"))
        })?;

        tracing::info!(path = file_path, package = %metadata.package_name, "metadata resolved");
        Ok(metadata)
    }

    /// URLs embedded in the package. Any failure past argument validation
    /// yields an empty set.
    pub async fn endpoints(&self, file_path: &str) -> Result<UrlSet> {
        let file_path = required(file_path, "filePath")?;
        let path = PathBuf::from(file_path);

        let urls = match self.executor.submit("endpoints", move || extract_endpoints(path)).await {
            Ok(Ok(urls)) => urls,
            Ok(Err(e)) => {
                tracing::warn!(path = file_path, error = %e, "endpoint scan failed");
                UrlSet::new()
            }
            Err(e) => {
                tracing::error!(path = file_path, error = %e, "endpoint scan aborted");
                UrlSet::new()
            }
        };

        tracing::info!(path = file_path, count = urls.len(), "endpoints extracted");
        Ok(urls)
    }

    /// Entropy verdict for the package. Only a missing file is reported; every
    /// other fault degrades to a zero verdict.
    pub async fn obfuscation(&self, file_path: &str) -> Result<ObfuscationVerdict> {
        let file_path = required(file_path, "filePath")?;
        let path = PathBuf::from(file_path);

        let verdict = match self.executor.submit("entropy", move || analyze_obfuscation(path)).await {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(ScanError::NotFound { .. })) => {
                return Err(ServiceError::NotFound(format!("file '{file_path}' does not exist")));
            }
            Ok(Err(e)) => {
                tracing::warn!(path = file_path, error = %e, "entropy scan failed");
                ObfuscationVerdict::default()
            }
            Err(e) => {
                tracing::error!(path = file_path, error = %e, "entropy scan aborted");
                ObfuscationVerdict::default()
            }
        };

        tracing::info!(
            path = file_path,
            total = verdict.total_entropy,
            payload = verdict.payload_entropy,
            obfuscated = verdict.is_obfuscated,
            "entropy analyzed"
        );
        Ok(verdict)
    }
}

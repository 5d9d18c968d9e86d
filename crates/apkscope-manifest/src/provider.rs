use std::path::Path;

use apkscope_archive::ArchiveHandle;

use crate::arsc::{RESOURCE_TABLE_ENTRY, ResourceTable};
use crate::axml::{self, AttributeValue, Document};
use crate::{ManifestError, PackageMetadata, PackageMetadataProvider, Result};

/// Archive member holding the compiled manifest.
pub const MANIFEST_ENTRY: &str = "AndroidManifest.xml";

const ATTR_LABEL: u32 = 0x0101_0001;
const ATTR_NAME: u32 = 0x0101_0003;
const ATTR_VERSION_NAME: u32 = 0x0101_021c;

const PERMISSION_TAGS: [&str; 2] = ["uses-permission", "uses-permission-sdk-23"];

/// Reads metadata straight from the archive's binary manifest.
///
/// Label and version references are resolved against `resources.arsc`. When
/// the table is missing or the reference does not lead to a string, the label
/// falls back to the package name and the version to [`UNKNOWN_VERSION`].
///
/// [`UNKNOWN_VERSION`]: crate::UNKNOWN_VERSION
#[derive(Clone, Copy, Debug, Default)]
pub struct AxmlMetadataProvider;

struct PackageFiles {
    manifest: Vec<u8>,
    resources: Option<Vec<u8>>,
}

impl AxmlMetadataProvider {
    pub fn new() -> Self {
        Self
    }

    fn read_package(path: &Path) -> Result<PackageFiles> {
        let mut handle = ArchiveHandle::open(path).map_err(|e| invalid(path, e))?;
        let manifest = handle
            .by_name(MANIFEST_ENTRY)
            .and_then(|mut entry| entry.read_all())
            .map_err(|e| invalid(path, e))?;

        let resources = match handle
            .by_name(RESOURCE_TABLE_ENTRY)
            .and_then(|mut entry| entry.read_all())
        {
            Ok(resources) => Some(resources),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "resource table unavailable");
                None
            }
        };

        Ok(PackageFiles {
            manifest,
            resources,
        })
    }
}

impl PackageMetadataProvider for AxmlMetadataProvider {
    fn resolve(&self, path: &Path) -> Result<PackageMetadata> {
        let files = Self::read_package(path)?;
        let document = axml::parse(&files.manifest).map_err(|e| invalid(path, e))?;

        let table = files
            .resources
            .as_deref()
            .and_then(|data| match ResourceTable::parse(data) {
                Ok(table) => Some(table),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "resource table unreadable");
                    None
                }
            });
        let metadata = metadata_from_document(&document, table.as_ref(), path)?;

        tracing::debug!(
            package = %metadata.package_name,
            permissions = metadata.permissions.len(),
            "manifest decoded"
        );
        Ok(metadata)
    }
}

fn invalid(path: &Path, reason: impl ToString) -> ManifestError {
    ManifestError::InvalidArchive {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Literal text of `value`, or the string a reference resolves to.
fn text_of(value: &AttributeValue, table: Option<&ResourceTable<'_>>) -> Option<String> {
    match value {
        AttributeValue::Reference(id) => {
            table.and_then(|table| match table.resolve_string(*id) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(id = %format!("{id:#010x}"), error = %e, "reference unresolved");
                    None
                }
            })
        }
        other => other.as_text(),
    }
}

fn metadata_from_document(
    document: &Document,
    table: Option<&ResourceTable<'_>>,
    path: &Path,
) -> Result<PackageMetadata> {
    let manifest = document
        .elements_named("manifest")
        .next()
        .ok_or_else(|| invalid(path, "manifest element missing"))?;

    let package_name = manifest
        .attributes
        .iter()
        .find(|a| a.name == "package")
        .and_then(|a| a.value.as_text())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| invalid(path, "package name missing"))?;

    let label = document
        .elements_named("application")
        .next()
        .and_then(|app| app.attribute("label", ATTR_LABEL))
        .and_then(|value| match value {
            AttributeValue::String(_) | AttributeValue::Reference(_) => text_of(value, table),
            _ => None,
        })
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| package_name.clone());

    let mut metadata = PackageMetadata::new(package_name, label, path);

    if let Some(version) = manifest
        .attribute("versionName", ATTR_VERSION_NAME)
        .and_then(|value| text_of(value, table))
    {
        metadata = metadata.with_version(version);
    }

    for element in document
        .elements
        .iter()
        .filter(|e| PERMISSION_TAGS.contains(&e.name.as_str()))
    {
        if let Some(permission) = element
            .attribute("name", ATTR_NAME)
            .and_then(AttributeValue::as_text)
        {
            metadata.add_permission(permission);
        }
    }

    Ok(metadata)
}

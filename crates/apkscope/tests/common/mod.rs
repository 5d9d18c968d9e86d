#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use apkscope::{DirectoryPackageStore, Inspector, ScanExecutor};
use apkscope_manifest::{ManifestError, PackageMetadata, PackageMetadataProvider};
use tempfile::TempDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

pub const RESOURCE_TEXT: &[u8] =
    b"http://example.com/path and http://schemas.android.com/apk/res/android";

pub fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = zip::ZipWriter::new(File::create(path).expect("create archive"));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(content).expect("write entry");
    }
    writer.finish().expect("finish archive");
}

/// Every byte value, repeated; entropy 8.0.
pub fn uniform_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

/// A package with a resource table, a high-entropy payload and a layout.
pub fn sample_package(path: &Path) {
    let payload = uniform_bytes(4096);
    write_archive(
        path,
        &[
            ("AndroidManifest.xml", &b"\x03\x00\x08\x00"[..]),
            ("resources.arsc", RESOURCE_TEXT),
            ("classes.dex", &payload[..]),
            ("res/layout/main.xml", &b"<a href=\"https://cdn.example.net/img.png\">"[..]),
            ("assets/notes.txt", &b"https://ignored.example.org/never"[..]),
        ],
    );
}

/// Resolves any existing file to fixed metadata.
#[derive(Clone, Copy, Debug, Default)]
pub struct FakeProvider;

impl PackageMetadataProvider for FakeProvider {
    fn resolve(&self, path: &Path) -> apkscope_manifest::Result<PackageMetadata> {
        if !path.is_file() {
            return Err(ManifestError::InvalidArchive {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            });
        }
        Ok(PackageMetadata::new("com.example.fake", "Fake", path)
            .with_version("2.0")
            .with_permissions(["android.permission.INTERNET"]))
    }
}

pub struct Fixture {
    pub dir: TempDir,
    pub inspector: Inspector,
}

impl Fixture {
    /// Inspector over `<tmp>/apps` with cache `<tmp>/cache`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("apps")).expect("package root");
        let inspector = Inspector::new(
            DirectoryPackageStore::new(dir.path().join("apps")),
            FakeProvider,
            ScanExecutor::current(),
            dir.path().join("cache"),
        );
        Self { dir, inspector }
    }

    pub fn apps(&self) -> PathBuf {
        self.dir.path().join("apps")
    }

    pub fn cache(&self) -> PathBuf {
        self.dir.path().join("cache")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

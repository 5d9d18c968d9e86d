//! URL extraction from archive members.
//!
//! Selected members are matched as raw bytes, so binary payloads need no
//! decoding and any byte outside the URL character class ends a match. URLs
//! spelled in a multi-byte encoding are not recovered.

use std::collections::BTreeSet;
use std::path::Path;

use apkscope_archive::ArchiveHandle;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

use crate::Result;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[a-zA-Z0-9._~:/?#\[\]@!$&'()*+,;=%-]+").expect("url pattern compiles")
});

/// Matches this short or shorter are discarded.
pub const MIN_URL_LEN: usize = 8;

/// XML namespace host; every manifest and layout carries it.
pub const NAMESPACE_HOST: &str = "schemas.android.com";

/// Distinct URLs, iterated in lexicographic order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlSet {
    urls: BTreeSet<String>,
}

impl UrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `url` was not already present.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.urls.into_iter().collect()
    }
}

impl Extend<String> for UrlSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.urls.extend(iter);
    }
}

impl IntoIterator for UrlSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.into_iter()
    }
}

/// Whether a member is part of the URL scan: `*.dex`, `resources.arsc` or
/// `*.xml`, compared case-insensitively.
pub fn is_scanned_entry(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.ends_with(".dex") || name == "resources.arsc" || name.ends_with(".xml")
}

fn keep(url: &str) -> bool {
    url.len() > MIN_URL_LEN && !url.contains(NAMESPACE_HOST)
}

/// Collect URLs from raw member content into `urls`. Returns how many were
/// newly added.
pub fn find_urls(content: &[u8], urls: &mut UrlSet) -> usize {
    URL_REGEX
        .find_iter(content)
        // the class is ASCII only
        .filter_map(|m| std::str::from_utf8(m.as_bytes()).ok())
        .filter(|url| keep(url))
        .filter(|url| urls.insert(*url))
        .count()
}

/// Scan every selected member of an open archive.
///
/// Members that fail to open or decompress are skipped.
pub fn scan_archive(handle: &mut ArchiveHandle) -> UrlSet {
    let mut urls = UrlSet::new();

    for index in 0..handle.len() {
        let mut entry = match handle.entry_at(index) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(index, error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.is_dir() || !is_scanned_entry(entry.name()) {
            continue;
        }

        match entry.read_all() {
            Ok(content) => {
                let added = find_urls(&content, &mut urls);
                tracing::trace!(entry = entry.name(), added, "entry scanned");
            }
            Err(e) => tracing::debug!(error = %e, "skipping undecodable entry"),
        }
    }

    urls
}

/// Open `path` and collect the URLs embedded in it.
pub fn extract_endpoints(path: impl AsRef<Path>) -> Result<UrlSet> {
    let mut handle = ArchiveHandle::open(path)?;
    Ok(scan_archive(&mut handle))
}

//! Static intelligence scans over APK archives.
//!
//! - [`endpoints`] - URL-shaped strings embedded in bytecode, resource tables
//!   and XML
//! - [`obfuscation`] - Shannon entropy of the archive and of `classes.dex`,
//!   reduced to a packed/obfuscated verdict
//!
//! Both scans are synchronous and CPU/I-O bound; run them off any latency
//! sensitive thread. Each call opens its own archive handle, so scans of the
//! same file may run concurrently.

pub use endpoints::{UrlSet, extract_endpoints, find_urls, is_scanned_entry, scan_archive};
pub use error::{Result, ScanError};
pub use obfuscation::{
    OBFUSCATION_THRESHOLD, ObfuscationVerdict, PAYLOAD_ENTRY, analyze_obfuscation,
    payload_entropy,
};

pub mod endpoints;
mod error;
pub mod obfuscation;

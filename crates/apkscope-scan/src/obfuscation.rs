//! Entropy-based packing and obfuscation signal.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use apkscope_archive::ArchiveHandle;
use apkscope_entropy::stream_entropy;
use serde::{Deserialize, Serialize};

use crate::{Result, ScanError};

/// Payload entropy strictly above this marks the package as obfuscated.
///
/// Packed or encrypted bytecode approaches 8.0 bits/byte; ordinary compiled
/// bytecode sits well below the line.
pub const OBFUSCATION_THRESHOLD: f64 = 6.8;

/// Primary bytecode member.
pub const PAYLOAD_ENTRY: &str = "classes.dex";

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObfuscationVerdict {
    pub total_entropy: f64,
    pub payload_entropy: f64,
    pub is_obfuscated: bool,
}

impl ObfuscationVerdict {
    pub fn from_entropies(total_entropy: f64, payload_entropy: f64) -> Self {
        Self {
            total_entropy,
            payload_entropy,
            is_obfuscated: payload_entropy > OBFUSCATION_THRESHOLD,
        }
    }
}

/// Entropy of the [`PAYLOAD_ENTRY`] member, or `0.0` when the archive or the
/// member cannot be read.
pub fn payload_entropy(path: &Path) -> f64 {
    let mut handle = match ArchiveHandle::open(path) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "payload unavailable");
            return 0.0;
        }
    };

    match handle.by_name(PAYLOAD_ENTRY) {
        Ok(entry) => stream_entropy(entry),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "payload unavailable");
            0.0
        }
    }
}

/// Measure whole-file and payload entropy of the package at `path`.
///
/// Fails only when the file itself cannot be opened; every later fault
/// degrades the affected measurement to `0.0`.
pub fn analyze_obfuscation(path: impl AsRef<Path>) -> Result<ObfuscationVerdict> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ScanError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ScanError::Io(e),
    })?;

    let total = stream_entropy(BufReader::new(file));
    let payload = payload_entropy(path);

    Ok(ObfuscationVerdict::from_entropies(total, payload))
}

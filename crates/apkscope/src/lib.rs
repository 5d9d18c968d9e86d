//! Inspection service over installed APK packages.
//!
//! # Architecture
//!
//! - [`Inspector`] - the four boundary operations (extract, metadata,
//!   endpoints, obfuscation analysis)
//! - [`ScanExecutor`] - runs CPU/I-O heavy scans on the blocking pool
//! - [`store`] - locating installed packages and copying them out
//! - [`channel`] - method-call dispatch with wire error codes
//! - [`server`] - JSON-lines request loop feeding a single response writer
//! - [`config`] - layered configuration
//!
//! The service keeps no state between calls. Each operation opens the archive
//! itself, so any number of operations may target the same file concurrently.

pub use config::{Config, ConfigError};
pub use error::{Result, ServiceError, TaskFailed};
pub use executor::{ScanExecutor, ScanTask};
pub use service::Inspector;
pub use store::{DirectoryPackageStore, PackageStore};

pub mod channel;
pub mod config;
mod error;
mod executor;
pub mod server;
mod service;
pub mod store;

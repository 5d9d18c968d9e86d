//! Read-only access to zip-format package archives.
//!
//! # Architecture
//!
//! - `detect.rs` - Zip magic detection
//! - `handle.rs` - [`ArchiveHandle`], one open file per handle
//! - `entry.rs` - Entry streams and owned entry snapshots
//!
//! Handles share nothing: the same path can be opened from several threads at
//! once, each open holding its own descriptor until the handle is dropped.
//! Entry streams borrow their handle and cannot outlive it.

pub use detect::is_zip;
pub use entry::{ArchiveEntry, EntryInfo};
pub use error::{ArchiveError, Result};
pub use handle::ArchiveHandle;

mod detect;
mod entry;
mod error;
mod handle;

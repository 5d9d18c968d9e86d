//! Shannon entropy of byte streams, in bits per byte.
//!
//! Counts byte values in a single forward pass and reduces the counts to a
//! scalar in `[0.0, 8.0]`. Values close to 8.0 indicate a near-uniform byte
//! distribution (compressed, encrypted or packed content).
//!
//! # Key Features
//!
//! - **Streaming**: fixed-size buffer, memory use independent of input length
//! - **Total**: an empty or unreadable stream measures `0.0`, never NaN
//! - **Pass-through**: [`EntropyReader`] measures while data moves elsewhere
//!
//! # Example
//!
//! ```
//! use apkscope_entropy::{stream_entropy, ByteFrequencyTable};
//!
//! let uniform: Vec<u8> = (0..=255).collect();
//! assert_eq!(stream_entropy(&uniform[..]), 8.0);
//!
//! let mut table = ByteFrequencyTable::new();
//! table.update(b"AAAA");
//! assert_eq!(table.total(), 4);
//! assert_eq!(table.entropy(), 0.0);
//! ```

pub use self::reader::{EntropyReader, stream_entropy};
pub use self::table::{ByteFrequencyTable, entropy_of};

/// Upper bound of byte entropy, reached by a uniform distribution.
pub const MAX_ENTROPY: f64 = 8.0;

mod reader;
mod table;

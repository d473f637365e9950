//! Staging area file format
//!
//! The staging file records the pending additions and removals that the next
//! commit will apply on top of the current branch tip.
//!
//! ## File Format
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "STAG" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - Kind (1 byte): 0 = addition, 1 = removal
//!   - Blob id (20 bytes, additions only)
//!   - Path length (2 bytes) followed by the UTF-8 path
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All integers are in network byte order.

pub mod checksum;
pub mod index_header;
pub mod stage_entry;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying staging files
pub const SIGNATURE: &str = "STAG";

/// Staging file format version
pub const VERSION: u32 = 1;

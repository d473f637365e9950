//! Stored object types
//!
//! Everything the repository persists under `objects/` is one of two kinds:
//!
//! - **Blob**: a file's raw bytes
//! - **Commit**: message, timestamp, parent links and a full path -> blob snapshot
//!
//! Both share the framing `<type> <size>\0<payload>`, and are identified by the
//! SHA-1 of that framed form.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of an abbreviated object id
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;

//! Data structures and algorithms
//!
//! - `branch`: branch names and commit id resolution
//! - `checkout`: working area migration and overwrite detection
//! - `core`: configuration and the pager writer
//! - `index`: staging file format
//! - `log`: history walks and record formatting
//! - `merge`: merge base search and three-way reconciliation
//! - `objects`: blob and commit objects
//! - `status`: status report

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;

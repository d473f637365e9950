//! A small content-addressed version control system
//!
//! Repository state lives in `.gitlet/` next to the working files; every
//! command goes through a [`areas::repository::Repository`] handle.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

//! Utilities shared across modules
//!
//! - [`fs`] - atomic writes, optional reads and timestamp queries

pub mod fs;

pub use fs::{atomic_write, ensure_dir, modified_time, read_optional_text};

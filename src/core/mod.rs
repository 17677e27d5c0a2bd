//! Core types shared by every part of codegen
//!
//! Currently this is the error system:
//! - [`CodegenError`] - enumerated failure modes with their per-template or
//!   whole-run policy
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - converts any [`anyhow::Error`] for CLI display

pub mod error;

pub use error::{CodegenError, ErrorContext, user_friendly_error};

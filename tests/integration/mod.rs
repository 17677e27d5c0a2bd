//! Integration test suite for codegen
//!
//! End-to-end tests that drive the `codegen` binary against temporary
//! projects.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render_cycle**: first render, up-to-date skips, forced and stale re-renders
//! - **custom_sections**: hand-written sections surviving regeneration
//! - **failures**: per-template failures and fatal configuration errors
//! - **formatting**: the `--pretty` formatter stage and its fallbacks
//! - **cli**: argument handling and template selection

mod common;

mod cli;
mod custom_sections;
mod failures;
mod formatting;
mod render_cycle;

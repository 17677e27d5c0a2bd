//! codegen - incremental template rendering with preserved custom sections
//!
//! Renders Tera templates against YAML models and writes the results to
//! files. Regenerating a file keeps the text a user wrote inside its custom
//! sections, so generated code can be extended by hand without losing the
//! edits on the next run.
//!
//! # Architecture Overview
//!
//! One run is a strictly sequential render cycle:
//!
//! ```text
//! ResolvedConfig -> TemplateBuilder -> [Template]
//!     for each template:
//!         StalenessChecker -> (skip) | ExtensionPipeline -> TemplateWriter
//!     TemplateWriter::flush
//! ```
//!
//! - Outputs newer than their template and model are skipped
//! - Each render runs the stage chain banner, format, sections around one
//!   engine call
//! - A failing template is reported and the others still run
//!
//! # Core Modules
//!
//! - [`config`] - command line > `codegen.yaml` > defaults, resolved once
//! - [`models`] - YAML models and dotted-path lookup
//! - [`templating`] - the template engine seam and template construction
//! - [`extensions`] - the stage pipeline: banner, formatter, section merge
//! - [`renderer`] - staleness checks, orchestration and buffered writing
//! - [`reporter`] - user-facing progress notices
//! - [`core`] - error types and user-friendly error display
//! - [`cli`] - the `codegen` command
//!
//! ## Supporting modules
//! - [`constants`] - default names, timeouts and delimiter syntax
//! - [`utils`] - file system helpers
//!
//! # Custom sections
//!
//! ```text
//! // [[@ section imports @]]
//! use crate::extra::Helper;
//! // [[@ end @]]
//! ```
//!
//! Section names match `[A-Za-z0-9_-]+`. Whatever is between the markers in
//! the existing output replaces what the template rendered there.
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Render all out-of-date templates configured in ./codegen.yaml
//! codegen
//!
//! # Force re-rendering of one entry and format the result
//! codegen --force --pretty entity
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod extensions;
pub mod models;
pub mod renderer;
pub mod reporter;
pub mod templating;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

//! Test utilities for codegen
//!
//! Helpers shared by unit tests and the integration test target (enable the
//! `test-utils` feature to use them from `tests/`).
//!
//! - [`init_test_logging`] - one-time tracing setup
//! - [`TestProject`] / [`TestProjectBuilder`] - a temporary project directory
//!   with config, model and template files
//! - [`FakeEngine`] - a [`TemplateEngine`](crate::templating::TemplateEngine)
//!   with canned outputs and errors
//! - [`RecordingReporter`] - a reporter that remembers what it was told
//!
//! # Example
//!
//! ```rust,no_run
//! use codegen_cli::test_utils::TestProject;
//!
//! let project = TestProject::builder()
//!     .with_config("templates:\n  - name: main\n    renderPath: out/main.rs\n")
//!     .with_model("name: App\n")
//!     .with_template("main", "fn {{ name }}() {}\n")
//!     .build()
//!     .unwrap();
//! assert!(project.file_exists("codegen.yaml"));
//! ```

pub mod builder;
pub mod fakes;

pub use builder::{TestProject, TestProjectBuilder};
pub use fakes::{FakeEngine, RecordingReporter, ReportEvent};

use std::fs::File;
use std::path::Path;
use std::sync::Once;
use std::time::{Duration, SystemTime};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::models::Model;
use crate::templating::Template;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=codegen_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Set a file's modification time.
///
/// # Panics
///
/// If the file cannot be opened or its timestamp cannot be changed.
pub fn set_mtime(path: &Path, time: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(time))
        .unwrap_or_else(|e| panic!("Failed to set mtime of {}: {e}", path.display()));
}

/// A template named `name` with an in-memory empty model, writing to
/// `dir/output`.
///
/// Its source file `dir/<name>.tera` is created and backdated by an hour so a
/// freshly written output is always strictly newer.
///
/// # Panics
///
/// If the source file cannot be written.
pub fn template_at(dir: &Path, name: &str, output: &str) -> Template {
    let source_path = dir.join(format!("{name}.tera"));
    std::fs::write(&source_path, "")
        .unwrap_or_else(|e| panic!("Failed to write {}: {e}", source_path.display()));
    set_mtime(&source_path, SystemTime::now() - Duration::from_secs(3600));

    Template {
        name: name.to_string(),
        source_path,
        output_path: dir.join(output),
        model: Model::from_value(serde_yaml::Value::Mapping(serde_yaml::Mapping::new())),
        force: false,
        pretty: false,
    }
}

//! Command-line interface for codegen.
//!
//! `codegen` has no subcommands: one invocation is one render cycle over the
//! configured templates.
//!
//! ```bash
//! # Render every configured template that is out of date
//! codegen
//!
//! # Render two entries, ignoring timestamps, with formatting
//! codegen -f -p entity schema
//!
//! # Use another project directory and config file
//! codegen -d ../service -c ../service/gen/codegen.yaml
//! ```
//!
//! # Execution flow
//!
//! 1. Parse arguments and initialize logging
//! 2. Resolve configuration (command line > `codegen.yaml` > defaults)
//! 3. Expand the selected template entries into templates
//! 4. Render every stale template through the extension pipeline
//! 5. Flush all outputs and print a summary
//!
//! Configuration errors abort before anything is rendered. Any other failure
//! is reported per template and turns the exit status non-zero once the run
//! has finished.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::{CliOverrides, ResolvedConfig};
use crate::core::CodegenError;
use crate::extensions::ExtensionPipeline;
use crate::renderer::{RenderReport, Renderer};
use crate::reporter::{ConsoleReporter, Reporter};
use crate::templating::{TemplateBuilder, TemplateEngine, TeraEngine};

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default tracing filter, used when `RUST_LOG` is not set
    pub log_level: String,
    /// Suppress progress output
    pub quiet: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            quiet: false,
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the level chosen by `--verbose`/`--quiet`.
/// Calling this more than once is harmless; only the first call installs.
pub fn init_logging(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Renders templates against YAML models, preserving custom sections.
#[derive(Parser, Debug)]
#[command(
    name = "codegen",
    about = "Render templates against YAML models, preserving hand-written custom sections",
    version,
    long_about = "Renders the templates configured in codegen.yaml and writes their outputs. \
                  Outputs that are newer than their template and model are skipped. Text between \
                  [[@ section <name> @]] and [[@ end @]] markers is kept across regenerations."
)]
pub struct Cli {
    /// Names of template entries to render (default: all)
    #[arg(value_name = "TEMPLATES")]
    templates: Vec<String>,

    /// Base directory for relative paths and the default config file
    #[arg(short = 'd', long = "basedir", value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Configuration file (default: <basedir>/codegen.yaml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render even when outputs are up to date
    #[arg(short, long)]
    force: bool,

    /// Run outputs through the configured external formatters
    #[arg(short, long)]
    pretty: bool,

    /// Model file used by templates that do not name their own
    #[arg(short = 's', long = "model-file", value_name = "FILE")]
    model_file: Option<PathBuf>,

    /// Directory holding <name>.tera template files
    #[arg(short = 't', long = "template-dir", value_name = "DIR")]
    template_dir: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

/// What a completed run did.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub report: RenderReport,
}

impl RunOutcome {
    /// True when no template failed.
    #[must_use]
    pub fn success(&self) -> bool {
        !self.report.has_failures()
    }
}

impl Cli {
    /// Parse arguments, initialize logging and run one render cycle.
    ///
    /// # Errors
    ///
    /// Only fatal (configuration) errors are returned; per-template failures
    /// are collected in the [`RunOutcome`].
    pub async fn execute(self) -> Result<RunOutcome> {
        let config = self.build_config();
        init_logging(&config);
        self.execute_with_config(config).await
    }

    /// Derive runtime settings from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            quiet: self.quiet,
        }
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            base_dir: self.base_dir.clone(),
            config_file: self.config.clone(),
            force: self.force,
            pretty: self.pretty,
            model_file: self.model_file.clone(),
            template_dir: self.template_dir.clone(),
            to_render: self.templates.clone(),
        }
    }

    /// Run one render cycle with explicit runtime settings.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<RunOutcome> {
        let resolved = ResolvedConfig::load(&self.overrides())?;
        tracing::debug!("Resolved configuration: {:?}", resolved);

        let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new(config.quiet));
        let engine: Arc<dyn TemplateEngine> = Arc::new(TeraEngine::new());
        let pipeline = ExtensionPipeline::new(&resolved.extensions, resolved.pipeline_options())?;

        let mut report = RenderReport::default();
        let mut templates = Vec::new();
        let mut builder = TemplateBuilder::new(&resolved, engine.as_ref());

        for entry in resolved.selected_entries() {
            match builder.build(entry) {
                Ok(built) => templates.extend(built),
                Err(error) if is_fatal(&error) => return Err(error),
                Err(error) => {
                    reporter.failure(&entry.name, &error);
                    report.record_failure(entry.name.clone(), error);
                }
            }
        }

        let renderer = Renderer::new(engine.clone(), pipeline, reporter.clone());
        let (writer, rendered) = renderer.render_all(templates).await;
        let flush = writer.flush(reporter.as_ref());

        report.rendered = rendered.rendered;
        report.skipped = rendered.skipped;
        report.failures.extend(rendered.failures);
        report.absorb_flush(flush);

        if !config.quiet {
            print_summary(&report);
        }

        Ok(RunOutcome {
            report,
        })
    }
}

fn is_fatal(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<CodegenError>())
        .any(CodegenError::is_fatal)
}

fn print_summary(report: &RenderReport) {
    let failed = report.failures.len();
    let summary = format!(
        "{} rendered, {} up to date, {} failed",
        report.rendered.len(),
        report.skipped.len(),
        failed
    );

    if failed == 0 {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
}

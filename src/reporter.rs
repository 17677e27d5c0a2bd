//! User-facing progress reporting.
//!
//! Components never print directly. They receive a [`Reporter`] and tell it
//! what happened; the CLI installs a [`ConsoleReporter`], tests install a
//! recording one. Diagnostic detail goes to `tracing` instead.

use colored::Colorize;
use std::path::Path;

use crate::core::user_friendly_error;
use crate::renderer::writer::WriteEvent;
use crate::templating::Template;

/// Receives progress notices from the rendering pipeline.
pub trait Reporter: Send + Sync {
    /// A template is about to be rendered.
    fn rendering(&self, template: &Template);

    /// A template was skipped because its output is up to date.
    fn up_to_date(&self, template: &Template);

    /// The writer finished one write.
    fn write_event(&self, event: &WriteEvent);

    /// Rendering or writing failed for `subject` (a template or a path).
    fn failure(&self, subject: &str, error: &anyhow::Error);
}

/// Reporter that prints colored progress to the terminal.
///
/// Progress goes to stdout and is suppressed when `quiet` is set; failures
/// always go to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self {
            quiet,
        }
    }
}

impl Reporter for ConsoleReporter {
    fn rendering(&self, template: &Template) {
        if !self.quiet {
            println!("{} {}", "Processing template".cyan(), template);
        }
    }

    fn up_to_date(&self, template: &Template) {
        if !self.quiet {
            println!(
                "{} {} ({} is up to date)",
                "Skipping".dimmed(),
                template.name,
                display_path(&template.output_path)
            );
        }
    }

    fn write_event(&self, event: &WriteEvent) {
        if self.quiet {
            return;
        }
        match event {
            WriteEvent::Written {
                path,
                ..
            } => println!("  {} {}", "Wrote".green(), display_path(path)),
        }
    }

    fn failure(&self, subject: &str, error: &anyhow::Error) {
        eprintln!("{} {}", "Failed:".red().bold(), subject);
        user_friendly_error(error).display();
    }
}

fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(|p| p.display().to_string()))
        .unwrap_or_else(|| path.display().to_string())
}

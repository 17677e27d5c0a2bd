//! Error handling for codegen
//!
//! This module provides the error types and user-friendly error reporting for the
//! code generator. The error system follows two principles:
//! 1. **Strongly-typed errors** so the renderer can decide which failures are fatal
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - [`CodegenError::Configuration`] - missing or invalid settings. Fatal: the run is
//!   aborted before any template is rendered.
//! - [`CodegenError::ModelPath`] - a dotted model path could not be resolved. Aborts
//!   the affected template entry only.
//! - [`CodegenError::TemplateCompilation`] / [`CodegenError::TemplateRender`] - the
//!   template engine rejected the template source or failed while evaluating it.
//!   All diagnostics collected by the engine are carried together so a user sees
//!   every problem of a template in one pass.
//! - [`CodegenError::FileSystem`] - reading or writing a file failed. Reported per
//!   template; the rest of the run continues.
//!
//! Use [`user_friendly_error`] to turn any [`anyhow::Error`] into an [`ErrorContext`]
//! suitable for display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use codegen_cli::core::{CodegenError, ErrorContext, user_friendly_error};
//!
//! let error = CodegenError::Configuration {
//!     message: "You must define a 'templates' property in your configuration".to_string(),
//! };
//! let ctx = user_friendly_error(&anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for codegen operations.
///
/// Each variant maps to one failure policy of the rendering pipeline; see the
/// module documentation for which variants abort the whole run and which only
/// abort a single template.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Missing or invalid configuration.
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Human readable description of the problem
        message: String,
    },

    /// A dotted path could not be resolved inside a model.
    ///
    /// `segment` is the first path element that failed to resolve and `path`
    /// is the full dotted path that was requested.
    #[error("Cannot resolve path element '{segment}' in path '{path}'")]
    ModelPath {
        /// The full dotted path
        path: String,
        /// The first unresolved segment
        segment: String,
    },

    /// The template engine rejected the template source.
    #[error("Template '{template}' failed to compile:\n{}", .diagnostics.join("\n"))]
    TemplateCompilation {
        /// Template name
        template: String,
        /// Every diagnostic reported by the engine, in order
        diagnostics: Vec<String>,
    },

    /// The template engine raised an error while evaluating the template.
    #[error("Template '{template}' failed to render:\n{}", .diagnostics.join("\n"))]
    TemplateRender {
        /// Template name
        template: String,
        /// Every diagnostic reported by the engine, in order
        diagnostics: Vec<String>,
    },

    /// A file system operation failed.
    #[error("File system error during {operation}: {}", .path.display())]
    FileSystem {
        /// What was being attempted ("read template", "write output", ...)
        operation: String,
        /// The path involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Shorthand for building a [`CodegenError::Configuration`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for building a [`CodegenError::FileSystem`].
    pub fn file_system(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Whether this error must abort the whole run instead of a single template.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// Wraps the error message with optional details and a suggestion. Displayed
/// in color on stderr by [`ErrorContext::display`].
#[derive(Debug)]
pub struct ErrorContext {
    /// The error message (including its cause chain)
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    ///
    /// Suggestions are displayed in green to draw attention.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Walks the error chain looking for a [`CodegenError`] or [`std::io::Error`] and
/// attaches suggestions tailored to it. The message always contains the full
/// `anyhow` context chain so nothing reported by lower layers is lost.
pub fn user_friendly_error(error: &anyhow::Error) -> ErrorContext {
    let message = format!("{error:#}");

    for cause in error.chain() {
        if let Some(codegen_error) = cause.downcast_ref::<CodegenError>() {
            return with_codegen_hints(ErrorContext::new(message), codegen_error);
        }

        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            let ctx = ErrorContext::new(message);
            return match io_error.kind() {
                std::io::ErrorKind::PermissionDenied => ctx
                    .with_suggestion("Check file ownership and permissions of the output directory"),
                std::io::ErrorKind::NotFound => {
                    ctx.with_suggestion("Check that the file or directory exists and the path is correct")
                }
                _ => ctx,
            };
        }
    }

    ErrorContext::new(message)
}

fn with_codegen_hints(ctx: ErrorContext, error: &CodegenError) -> ErrorContext {
    match error {
        CodegenError::Configuration { .. } => ctx
            .with_suggestion("Check codegen.yaml (or the file passed with --config)")
            .with_details("Configuration errors abort the run before any template is rendered"),
        CodegenError::ModelPath { segment, .. } => ctx.with_suggestion(format!(
            "Make sure the model defines '{segment}' at that position, or fix the path in forModelPaths/forEach"
        )),
        CodegenError::TemplateCompilation { .. } => {
            ctx.with_suggestion("Fix the template syntax errors listed above and run codegen again")
        }
        CodegenError::TemplateRender { .. } => ctx.with_suggestion(
            "Check that every variable used by the template exists in its model",
        ),
        CodegenError::FileSystem { source, .. } => match source.kind() {
            std::io::ErrorKind::PermissionDenied => {
                ctx.with_suggestion("Check file ownership and permissions")
            }
            std::io::ErrorKind::NotFound => {
                ctx.with_suggestion("Check that the file exists and the path is correct")
            }
            _ => ctx,
        },
    }
}

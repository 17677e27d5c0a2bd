//! External code formatters.
//!
//! A formatter is an external command that reads source text on stdin and
//! writes the formatted text on stdout. Formatters are chosen by the output
//! file's extension:
//!
//! | Extension | Default command |
//! |---|---|
//! | `java` | `jacobe -quiet -stdout -cfg=sun.cfg -` |
//! | `rs` | `rustfmt --edition 2021` |
//!
//! Formatting is best effort. A formatter that is not installed, exits with an
//! error, times out, or prints nothing leaves the text unformatted; the caller
//! decides how to report it.

use anyhow::{Context, Result, anyhow, bail};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::DEFAULT_FORMATTER_TIMEOUT;
use crate::core::CodegenError;

/// Formatter commands shipped by default, keyed by output file extension.
#[must_use]
pub fn default_formatters() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("java".to_string(), "jacobe -quiet -stdout -cfg=sun.cfg -".to_string()),
        ("rs".to_string(), "rustfmt --edition 2021".to_string()),
    ])
}

/// Maps output extensions to formatter commands.
#[derive(Debug, Clone)]
pub struct FormatterRegistry {
    commands: BTreeMap<String, String>,
    timeout: Duration,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new(default_formatters(), DEFAULT_FORMATTER_TIMEOUT)
    }
}

impl FormatterRegistry {
    #[must_use]
    pub const fn new(commands: BTreeMap<String, String>, timeout: Duration) -> Self {
        Self {
            commands,
            timeout,
        }
    }

    /// Check every configured command parses with shell quoting rules and
    /// names a program.
    pub fn validate(&self) -> Result<(), CodegenError> {
        for (extension, command) in &self.commands {
            let parts = shell_words::split(command).map_err(|e| {
                CodegenError::config(format!(
                    "Failed to parse formatter command for '.{extension}' files ('{command}'): {e}"
                ))
            })?;
            if parts.is_empty() {
                return Err(CodegenError::config(format!(
                    "Formatter command for '.{extension}' files is empty"
                )));
            }
        }
        Ok(())
    }

    /// The formatter for files with `extension`, if one is configured.
    ///
    /// Commands are split like a POSIX shell would, so quoted arguments such
    /// as `sed 's/a b/c/'` stay one argument.
    #[must_use]
    pub fn for_extension(&self, extension: &str) -> Option<Formatter> {
        let command = self.commands.get(extension)?;
        let parts = match shell_words::split(command) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!("Ignoring formatter command '{}': {}", command, e);
                return None;
            }
        };
        let (program, args) = parts.split_first()?;

        Some(Formatter {
            program: program.clone(),
            args: args.to_vec(),
            timeout: self.timeout,
        })
    }

    /// The formatter for the file at `path`, if its extension has one.
    #[must_use]
    pub fn for_path(&self, path: &Path) -> Option<Formatter> {
        self.for_extension(path.extension()?.to_str()?)
    }
}

/// One external formatter command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Formatter {
    /// Whether the program can be found on `PATH` (or at the given path).
    #[must_use]
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    /// Run the formatter over `text`.
    ///
    /// The child is killed if it does not finish within the timeout.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be spawned, times out, exits unsuccessfully,
    /// or produces empty or non-UTF-8 output.
    pub async fn format(&self, text: &str) -> Result<String> {
        tracing::debug!("Running formatter: {} {}", self.program, self.args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start formatter '{}'", self.program))?;

        // Feed stdin concurrently so a formatter that streams output cannot
        // deadlock on a full stdout pipe.
        let mut stdin = child.stdin.take().context("Formatter stdin was not captured")?;
        let input = text.to_string();
        let feeder = tokio::spawn(async move {
            let result = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            result
        });

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.with_context(|| format!("Formatter '{}' failed", self.program))?,
            Err(_) => {
                feeder.abort();
                return Err(anyhow!(
                    "Formatter '{}' timed out after {} ms",
                    self.program,
                    self.timeout.as_millis()
                ));
            }
        };

        if let Ok(Err(e)) = feeder.await {
            tracing::debug!("Formatter '{}' did not read all of its input: {}", self.program, e);
        }

        if !output.status.success() {
            bail!(
                "Formatter '{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let formatted = String::from_utf8(output.stdout)
            .with_context(|| format!("Formatter '{}' produced non UTF-8 output", self.program))?;

        if formatted.trim().is_empty() {
            bail!("Formatter '{}' produced no output", self.program);
        }

        Ok(formatted)
    }
}

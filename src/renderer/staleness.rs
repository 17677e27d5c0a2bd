//! Output staleness checks.
//!
//! An output is current when it is strictly newer than both the template
//! source and the model file. Equal timestamps count as stale: coarse
//! filesystem clocks can give an edit made right after a write the same
//! mtime, and skipping it would lose the change.

use std::sync::Arc;
use std::time::SystemTime;

use crate::core::CodegenError;
use crate::reporter::Reporter;
use crate::templating::Template;
use crate::utils::fs::modified_time;

/// Decides whether a template must be rendered again.
pub struct StalenessChecker {
    reporter: Arc<dyn Reporter>,
}

impl StalenessChecker {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self {
            reporter,
        }
    }

    /// Whether `template` needs rendering.
    ///
    /// Always true for forced templates and missing outputs. A model without
    /// a timestamp (in memory, or unreadable) never makes an output stale.
    /// Reports a notice when the template is skipped.
    ///
    /// # Errors
    ///
    /// [`CodegenError::FileSystem`] if the template source or an existing
    /// output cannot be inspected.
    pub fn needs_render(&self, template: &Template) -> Result<bool, CodegenError> {
        if template.force {
            tracing::debug!("Rendering {} (forced)", template.name);
            return Ok(true);
        }

        let output_modified = match modified_time(&template.output_path) {
            Ok(time) => time,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "Rendering {}: no output at {}",
                    template.name,
                    template.output_path.display()
                );
                return Ok(true);
            }
            Err(e) => {
                return Err(CodegenError::file_system("stat output", &template.output_path, e));
            }
        };

        let source_modified = template.source_modified()?;
        let model_modified = template.model.last_modified();

        if is_stale(output_modified, source_modified, model_modified) {
            tracing::debug!("Rendering {}: inputs changed since last render", template.name);
            return Ok(true);
        }

        self.reporter.up_to_date(template);
        Ok(false)
    }
}

fn is_stale(output: SystemTime, source: SystemTime, model: Option<SystemTime>) -> bool {
    source >= output || model.is_some_and(|model| model >= output)
}

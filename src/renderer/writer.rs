//! Buffered output writing.
//!
//! Rendered text is collected first and written in one [`TemplateWriter::flush`]
//! at the end of the run. Each file is replaced atomically, but the batch as a
//! whole is not: if the process dies mid-flush some outputs are updated and
//! others are not.

use std::path::PathBuf;

use anyhow::Context;

use super::RenderFailure;
use crate::reporter::Reporter;
use crate::templating::Template;
use crate::utils::fs::atomic_write;

/// Something the writer did, reported as it happens.
///
/// A `Written` event marks the point where the previous output of that path
/// has been replaced; anything read from the old file before is now stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteEvent {
    Written { template: String, path: PathBuf },
}

#[derive(Debug)]
struct PendingWrite {
    template: String,
    path: PathBuf,
    text: String,
}

/// Collects rendered outputs until they are flushed to disk.
#[derive(Debug, Default)]
pub struct TemplateWriter {
    pending: Vec<PendingWrite>,
}

/// What a flush did.
#[derive(Debug, Default)]
pub struct FlushReport {
    pub events: Vec<WriteEvent>,
    pub failures: Vec<RenderFailure>,
}

impl FlushReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl TemplateWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer `text` as the new content of the template's output path.
    pub fn add(&mut self, template: &Template, text: String) {
        tracing::debug!("Queued {} for {}", template.output_path.display(), template.name);
        self.pending.push(PendingWrite {
            template: template.name.clone(),
            path: template.output_path.clone(),
            text,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Write every buffered output, in the order they were added.
    ///
    /// Existing files are overwritten and missing parent directories created.
    /// A failed write is reported and recorded; the remaining writes still run.
    pub fn flush(self, reporter: &dyn Reporter) -> FlushReport {
        let mut report = FlushReport::default();

        for write in self.pending {
            let result = atomic_write(&write.path, &write.text)
                .with_context(|| format!("Failed to write output of template '{}'", write.template));

            match result {
                Ok(()) => {
                    let event = WriteEvent::Written {
                        template: write.template,
                        path: write.path,
                    };
                    reporter.write_event(&event);
                    report.events.push(event);
                }
                Err(error) => {
                    let subject = write.path.display().to_string();
                    reporter.failure(&subject, &error);
                    report.failures.push(RenderFailure {
                        template: write.template,
                        error,
                    });
                }
            }
        }

        report
    }
}

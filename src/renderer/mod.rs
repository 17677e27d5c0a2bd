//! Render orchestration.
//!
//! The [`Renderer`] walks templates in order and, for each one:
//!
//! 1. asks the [`StalenessChecker`] whether the output is out of date,
//! 2. reads the previous output once,
//! 3. runs the [`ExtensionPipeline`] (stage `begin` hooks, engine render,
//!    stage `end` hooks),
//! 4. hands the final text to the [`TemplateWriter`].
//!
//! Templates are independent units of work. A failure in one is reported and
//! recorded in the [`RenderReport`], and the next template is processed as if
//! nothing happened. Processing is strictly sequential.

pub mod staleness;
pub mod writer;

use anyhow::Result;
use std::sync::Arc;

use crate::extensions::ExtensionPipeline;
use crate::reporter::Reporter;
use crate::templating::{PreviousOutput, Template, TemplateEngine};
pub use staleness::StalenessChecker;
pub use writer::{FlushReport, TemplateWriter, WriteEvent};

/// A template (or template entry) that could not be produced.
#[derive(Debug)]
pub struct RenderFailure {
    pub template: String,
    pub error: anyhow::Error,
}

/// Outcome of a run, by template name.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<RenderFailure>,
}

impl RenderReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn record_failure(&mut self, template: impl Into<String>, error: anyhow::Error) {
        self.failures.push(RenderFailure {
            template: template.into(),
            error,
        });
    }

    /// Fold the failures of a flush into this report.
    pub fn absorb_flush(&mut self, flush: FlushReport) {
        self.failures.extend(flush.failures);
    }
}

/// Drives templates through staleness check, pipeline and writer.
pub struct Renderer {
    engine: Arc<dyn TemplateEngine>,
    pipeline: ExtensionPipeline,
    reporter: Arc<dyn Reporter>,
    checker: StalenessChecker,
}

impl Renderer {
    pub fn new(
        engine: Arc<dyn TemplateEngine>,
        pipeline: ExtensionPipeline,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            engine,
            checker: StalenessChecker::new(reporter.clone()),
            pipeline,
            reporter,
        }
    }

    /// Render every template that needs it and buffer the results.
    ///
    /// Nothing is written yet; flush the returned writer to persist outputs.
    pub async fn render_all(&self, templates: Vec<Template>) -> (TemplateWriter, RenderReport) {
        let mut writer = TemplateWriter::new();
        let mut report = RenderReport::default();

        for template in templates {
            match self.render_one(&template).await {
                Ok(Some(text)) => {
                    writer.add(&template, text);
                    report.rendered.push(template.name);
                }
                Ok(None) => report.skipped.push(template.name),
                Err(error) => {
                    self.reporter.failure(&template.to_string(), &error);
                    report.record_failure(template.name, error);
                }
            }
        }

        (writer, report)
    }

    /// Render all templates and flush the writer.
    pub async fn render_and_write(&self, templates: Vec<Template>) -> RenderReport {
        let (writer, mut report) = self.render_all(templates).await;
        let flush = writer.flush(self.reporter.as_ref());
        report.absorb_flush(flush);
        report
    }

    /// Render one template, or `None` when its output is up to date.
    ///
    /// # Errors
    ///
    /// Staleness I/O errors, stage failures and engine errors.
    pub async fn render_one(&self, template: &Template) -> Result<Option<String>> {
        if !self.checker.needs_render(template)? {
            return Ok(None);
        }

        self.reporter.rendering(template);
        let previous = PreviousOutput::read(&template.output_path);
        let text = self.pipeline.run(template, &previous, self.engine.as_ref()).await?;
        Ok(Some(text))
    }
}

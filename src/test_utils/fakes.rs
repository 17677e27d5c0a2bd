//! Test doubles for the engine and reporter seams.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::CodegenError;
use crate::models::Model;
use crate::renderer::WriteEvent;
use crate::reporter::Reporter;
use crate::templating::{Template, TemplateEngine};

#[derive(Debug, Clone)]
enum Canned {
    Output(String),
    Compile(Vec<String>),
    Render(Vec<String>),
}

/// A template engine with canned results keyed by template name.
///
/// Rendering an unknown template is a render error. `render_str` returns its
/// source unchanged.
#[derive(Debug, Default)]
pub struct FakeEngine {
    canned: HashMap<String, Canned>,
    renders: AtomicUsize,
}

impl FakeEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output(mut self, template: &str, text: &str) -> Self {
        self.canned.insert(template.to_string(), Canned::Output(text.to_string()));
        self
    }

    #[must_use]
    pub fn with_compile_error(mut self, template: &str, diagnostics: &[&str]) -> Self {
        let diagnostics = diagnostics.iter().map(|d| (*d).to_string()).collect();
        self.canned.insert(template.to_string(), Canned::Compile(diagnostics));
        self
    }

    #[must_use]
    pub fn with_render_error(mut self, template: &str, diagnostics: &[&str]) -> Self {
        let diagnostics = diagnostics.iter().map(|d| (*d).to_string()).collect();
        self.canned.insert(template.to_string(), Canned::Render(diagnostics));
        self
    }

    /// How many times `render` was called
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl TemplateEngine for FakeEngine {
    fn render(&self, template: &Template) -> Result<String, CodegenError> {
        self.renders.fetch_add(1, Ordering::SeqCst);

        match self.canned.get(&template.name) {
            Some(Canned::Output(text)) => Ok(text.clone()),
            Some(Canned::Compile(diagnostics)) => Err(CodegenError::TemplateCompilation {
                template: template.name.clone(),
                diagnostics: diagnostics.clone(),
            }),
            Some(Canned::Render(diagnostics)) => Err(CodegenError::TemplateRender {
                template: template.name.clone(),
                diagnostics: diagnostics.clone(),
            }),
            None => Err(CodegenError::TemplateRender {
                template: template.name.clone(),
                diagnostics: vec!["no canned output".to_string()],
            }),
        }
    }

    fn render_str(&self, _name: &str, source: &str, _model: &Model) -> Result<String, CodegenError> {
        Ok(source.to_string())
    }
}

/// A notice received by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Rendering(String),
    UpToDate(String),
    Written(PathBuf),
    Failure(String),
}

/// Reporter that records every notice instead of printing it.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    fn push(&self, event: ReportEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Paths reported as written, in order
    pub fn written(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::Written(path) => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn rendering(&self, template: &Template) {
        self.push(ReportEvent::Rendering(template.name.clone()));
    }

    fn up_to_date(&self, template: &Template) {
        self.push(ReportEvent::UpToDate(template.name.clone()));
    }

    fn write_event(&self, event: &WriteEvent) {
        match event {
            WriteEvent::Written {
                path,
                ..
            } => self.push(ReportEvent::Written(path.clone())),
        }
    }

    fn failure(&self, subject: &str, _error: &anyhow::Error) {
        self.push(ReportEvent::Failure(subject.to_string()));
    }
}

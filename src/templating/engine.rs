//! Template engine binding.
//!
//! The rendering pipeline treats the engine as an opaque collaborator: it hands
//! over a template and a model and gets back text or a compile/runtime error.
//! [`TemplateEngine`] is that seam; [`TeraEngine`] is the implementation used by
//! the CLI.

use std::collections::HashSet;

use serde_yaml::Value;
use tera::{Context as TeraContext, Tera};

use super::template::Template;
use crate::core::CodegenError;
use crate::models::Model;

/// A template engine that renders a template against a model.
///
/// Implementations must report problems found while compiling the template
/// source as [`CodegenError::TemplateCompilation`] and problems found while
/// evaluating it as [`CodegenError::TemplateRender`], carrying every
/// diagnostic they collected.
pub trait TemplateEngine: Send + Sync {
    /// Render the template file of `template` against `template.model`.
    fn render(&self, template: &Template) -> Result<String, CodegenError>;

    /// Render an inline template source, identified by `name` in diagnostics.
    fn render_str(&self, name: &str, source: &str, model: &Model) -> Result<String, CodegenError>;
}

/// [`TemplateEngine`] backed by Tera.
///
/// A fresh `Tera` instance is created per render (just empty maps), so nothing
/// leaks from one template into the next. Autoescaping is turned off: the
/// output is source code, not HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraEngine;

impl TeraEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render_source(
        &self,
        name: &str,
        source: &str,
        model: &Model,
    ) -> Result<String, CodegenError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_template(name, source).map_err(|e| CodegenError::TemplateCompilation {
            template: name.to_string(),
            diagnostics: collect_diagnostics(&e),
        })?;

        let context = build_context(name, model)?;

        tracing::debug!("Rendering template '{}'", name);
        tera.render(name, &context).map_err(|e| CodegenError::TemplateRender {
            template: name.to_string(),
            diagnostics: collect_diagnostics(&e),
        })
    }
}

impl TemplateEngine for TeraEngine {
    fn render(&self, template: &Template) -> Result<String, CodegenError> {
        let source = std::fs::read_to_string(&template.source_path).map_err(|e| {
            CodegenError::file_system("read template", &template.source_path, e)
        })?;

        self.render_source(&template.name, &source, &template.model)
    }

    fn render_str(&self, name: &str, source: &str, model: &Model) -> Result<String, CodegenError> {
        self.render_source(name, source, model)
    }
}

/// Flatten a model into a template context.
///
/// Every top-level key of a mapping becomes a template variable. A model that
/// is not a mapping (a scalar or a sequence, typically a `forEach` element) is
/// exposed as `model`.
pub fn build_context(template: &str, model: &Model) -> Result<TeraContext, CodegenError> {
    let mut context = TeraContext::new();

    let insert = |context: &mut TeraContext, key: String, value: &Value| {
        context.try_insert(key.clone(), value).map_err(|e| CodegenError::TemplateRender {
            template: template.to_string(),
            diagnostics: vec![format!("Model value '{key}' cannot be used in a template: {e}")],
        })
    };

    match model.data() {
        Value::Mapping(map) => {
            for (key, value) in map {
                insert(&mut context, key_to_string(key), value)?;
            }
        }
        Value::Null => {}
        other => insert(&mut context, "model".to_string(), other)?,
    }

    Ok(context)
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_yaml::to_string(other).map(|s| s.trim().to_string()).unwrap_or_default(),
    }
}

/// Collect every message of a Tera error chain.
///
/// Tera wraps the interesting message (parse location, missing variable, ...)
/// inside generic "Failed to render" errors, so the whole `source()` chain is
/// walked and each distinct message kept in order.
fn collect_diagnostics(error: &tera::Error) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut diagnostics = Vec::new();

    let mut current: Option<&dyn std::error::Error> = Some(error);
    while let Some(err) = current {
        let message = err.to_string().trim().to_string();
        if !message.is_empty() && seen.insert(message.clone()) {
            diagnostics.push(message);
        }
        current = err.source();
    }

    diagnostics
}

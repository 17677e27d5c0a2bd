//! Templates and their construction from configuration.
//!
//! A [`Template`] binds one template source file to one output path and one
//! model. A configured template entry can expand into several templates:
//!
//! - a plain entry produces exactly one template,
//! - `forModelPaths` produces one template per listed model path,
//! - `forEach` produces one template per element of a model sequence.
//!
//! For the expanding forms the entry's `renderPath` is itself rendered against
//! each submodel, so `src/{{ name | lower }}.rs` yields one file per entity.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::engine::TemplateEngine;
use crate::config::{Expansion, ResolvedConfig, TemplateEntry};
use crate::core::CodegenError;
use crate::models::Model;
use crate::utils::fs::{modified_time, read_optional_text};

/// A named template bound to one output path and one model.
///
/// Templates are consumed by a single render cycle and never reused.
#[derive(Debug, Clone)]
pub struct Template {
    /// Template name, as configured
    pub name: String,
    /// The template source file
    pub source_path: PathBuf,
    /// Where the rendered output is written
    pub output_path: PathBuf,
    /// Data the template is rendered against
    pub model: Model,
    /// Render even when the output looks up to date
    pub force: bool,
    /// Run the output through an external formatter when one is available
    pub pretty: bool,
}

impl Template {
    /// Modification time of the template source file.
    pub fn source_modified(&self) -> Result<SystemTime, CodegenError> {
        modified_time(&self.source_path)
            .map_err(|e| CodegenError::file_system("stat template", &self.source_path, e))
    }

    /// Extension of the output file, used to pick comment syntax and formatters.
    #[must_use]
    pub fn output_extension(&self) -> Option<&str> {
        self.output_path.extension().and_then(|ext| ext.to_str())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.source_path.display())
    }
}

/// The output a template produced in a previous run, read once per render.
///
/// A missing or unreadable previous output is simply "no previous output": it
/// means there are no custom sections to carry over yet.
#[derive(Debug, Clone, Default)]
pub struct PreviousOutput {
    text: Option<String>,
}

impl PreviousOutput {
    /// Read the current content of `path`.
    pub fn read(path: &Path) -> Self {
        match read_optional_text(path) {
            Ok(Some(text)) => Self {
                text: Some(text),
            },
            Ok(None) => {
                tracing::debug!("Old output does not exist at render path: {}", path.display());
                Self::none()
            }
            Err(e) => {
                tracing::warn!(
                    "Old output at {} could not be read, custom sections will not be carried over: {}",
                    path.display(),
                    e
                );
                Self::none()
            }
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self {
            text: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Expands configured template entries into [`Template`]s.
///
/// Model files are loaded once and shared between entries that use the same
/// file.
pub struct TemplateBuilder<'a> {
    config: &'a ResolvedConfig,
    engine: &'a dyn TemplateEngine,
    models: HashMap<PathBuf, Model>,
}

impl<'a> TemplateBuilder<'a> {
    pub fn new(config: &'a ResolvedConfig, engine: &'a dyn TemplateEngine) -> Self {
        Self {
            config,
            engine,
            models: HashMap::new(),
        }
    }

    /// Build every template for one configured entry.
    ///
    /// # Errors
    ///
    /// - [`CodegenError::Configuration`] when the model file cannot be loaded
    ///   (fatal for the run)
    /// - [`CodegenError::ModelPath`] or a render error for `renderPath` when an
    ///   expansion fails (fatal for this entry only)
    pub fn build(&mut self, entry: &TemplateEntry) -> Result<Vec<Template>> {
        let model = self.model(&entry.model_file)?;

        match &entry.expansion {
            Expansion::Single => {
                Ok(vec![self.make(entry, self.config.resolve_path(&entry.render_path), model)])
            }
            Expansion::ModelPaths(paths) => {
                let mut templates = Vec::with_capacity(paths.len());
                for path in paths {
                    let submodel = model.submodel(path)?;
                    let output = self.render_output_path(entry, &submodel)?;
                    templates.push(self.make(entry, output, submodel));
                }
                Ok(templates)
            }
            Expansion::ForEach(path) => {
                let items = model.resolve(path)?.as_sequence().ok_or_else(|| {
                    anyhow::anyhow!(
                        "forEach path '{}' of template '{}' does not resolve to a sequence",
                        path,
                        entry.name
                    )
                })?;

                let mut templates = Vec::with_capacity(items.len());
                for item in items {
                    let submodel = model.with_data(item.clone());
                    let output = self.render_output_path(entry, &submodel)?;
                    templates.push(self.make(entry, output, submodel));
                }
                Ok(templates)
            }
        }
    }

    fn model(&mut self, path: &Path) -> Result<Model> {
        if let Some(model) = self.models.get(path) {
            return Ok(model.clone());
        }

        let model = Model::load(path)?;
        self.models.insert(path.to_path_buf(), model.clone());
        Ok(model)
    }

    fn render_output_path(&self, entry: &TemplateEntry, model: &Model) -> Result<PathBuf> {
        let rendered = self
            .engine
            .render_str(&format!("{}:renderPath", entry.name), &entry.render_path, model)
            .with_context(|| format!("Failed to render output path of template '{}'", entry.name))?;

        Ok(self.config.resolve_path(rendered.trim()))
    }

    fn make(&self, entry: &TemplateEntry, output_path: PathBuf, model: Model) -> Template {
        Template {
            name: entry.name.clone(),
            source_path: entry.source_path.clone(),
            output_path,
            model,
            force: self.config.force,
            pretty: self.config.pretty,
        }
    }
}

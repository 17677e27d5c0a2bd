//! Configuration management for codegen
//!
//! Settings come from three ordered sources, merged once into a
//! [`ResolvedConfig`] before anything is rendered:
//!
//! 1. **Command line** ([`CliOverrides`]) - always wins
//! 2. **Configuration file** (`codegen.yaml`, or the file given with `--config`)
//! 3. **Defaults** (see [`crate::constants`])
//!
//! Nothing downstream performs lookup-with-fallback; the renderer only sees the
//! resolved values.
//!
//! # Configuration file
//!
//! ```yaml
//! baseDir: .
//! templateDir: codegen_tmpl
//! modelFile: codegen_model.yaml
//! templateType: tera
//! prettyPrint: true
//! formatters:
//!   java: "jacobe -quiet -stdout -cfg=sun.cfg -"
//! extensions: [banner, format, sections]
//! templates:
//!   - name: entity
//!     renderPath: "src/model/{{ name | lower }}.rs"
//!     forModelPaths: [entities.user, entities.group]
//!   - name: schema
//!     renderPath: sql/schema.sql
//! ```
//!
//! # Path resolution
//!
//! The configuration file is looked up as `<baseDir>/codegen.yaml`, where
//! `baseDir` is `--basedir` or the current directory. A `baseDir` inside the
//! file is relative to the file's directory. `templateDir`, `modelFile` and
//! `renderPath` are relative to the resolved base directory. `~` and
//! environment variables are expanded in all of them.
//!
//! # Modules
//!
//! - `file` - the on-disk format ([`FileConfig`])
//! - `parser` - generic YAML parsing with path context ([`parse_config`])

mod file;
mod parser;

pub use file::{FileConfig, TemplateEntryConfig};
pub use parser::parse_config;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use strsim::levenshtein;

use crate::constants::{
    DEFAULT_CONFIG_FILENAME, DEFAULT_FORMATTER_TIMEOUT, DEFAULT_MODEL_FILENAME,
    DEFAULT_TEMPLATE_DIR, DEFAULT_TEMPLATE_TYPE, TEMPLATE_FILE_EXTENSION,
};
use crate::core::CodegenError;
use crate::extensions::format::{FormatterRegistry, default_formatters};
use crate::extensions::{ExtensionKind, PipelineOptions, validate_kinds};

/// Settings given on the command line.
///
/// `None` (or `false` for flags) means "not given", so the file or default
/// value applies.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub force: bool,
    pub pretty: bool,
    pub model_file: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    /// Names of template entries to render; empty means all
    pub to_render: Vec<String>,
}

/// How a template entry expands into templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// One template rendered against the whole model
    Single,
    /// One template per listed model path
    ModelPaths(Vec<String>),
    /// One template per element of the sequence at this model path
    ForEach(String),
}

/// A configured template entry with every path resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub name: String,
    /// Output path; itself a template for expanding entries
    pub render_path: String,
    pub model_file: PathBuf,
    pub source_path: PathBuf,
    pub expansion: Expansion,
}

/// The single, fully merged configuration of a run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_dir: PathBuf,
    pub config_file: PathBuf,
    pub template_dir: PathBuf,
    pub model_file: PathBuf,
    pub template_type: String,
    pub force: bool,
    pub pretty: bool,
    pub formatter_timeout: Duration,
    pub formatters: BTreeMap<String, String>,
    pub extensions: Vec<ExtensionKind>,
    /// Every configured entry, in file order
    pub templates: Vec<TemplateEntry>,
    /// Entry names requested on the command line; empty means all
    pub selected: Vec<String>,
}

impl ResolvedConfig {
    /// Merge command line, configuration file and defaults.
    ///
    /// # Errors
    ///
    /// [`CodegenError::Configuration`] for a missing or invalid configuration
    /// file, a missing `templates` list, an unsupported template type, an
    /// invalid extension list, or an unknown template name on the command line.
    pub fn load(cli: &CliOverrides) -> Result<Self, CodegenError> {
        let cli_base = match &cli.base_dir {
            Some(dir) => expand_path(dir)?,
            None => std::env::current_dir()
                .map_err(|e| CodegenError::config(format!("Cannot determine current directory: {e}")))?,
        };

        let config_file = match &cli.config_file {
            Some(path) => expand_path(path)?,
            None => cli_base.join(DEFAULT_CONFIG_FILENAME),
        };
        tracing::debug!("Loading configuration from {}", config_file.display());
        let file: FileConfig = parse_config(&config_file)?;

        Self::merge(cli, file, cli_base, config_file)
    }

    fn merge(
        cli: &CliOverrides,
        file: FileConfig,
        cli_base: PathBuf,
        config_file: PathBuf,
    ) -> Result<Self, CodegenError> {
        let base_dir = match (&cli.base_dir, &file.base_dir) {
            (Some(_), _) | (None, None) => cli_base,
            (None, Some(dir)) => {
                let config_dir = config_file.parent().unwrap_or_else(|| Path::new(""));
                config_dir.join(expand_path(dir)?)
            }
        };
        let resolve = |path: &Path| -> Result<PathBuf, CodegenError> {
            Ok(base_dir.join(expand_path(path)?))
        };

        let template_dir = resolve(
            cli.template_dir
                .as_deref()
                .or(file.template_dir.as_deref())
                .unwrap_or_else(|| Path::new(DEFAULT_TEMPLATE_DIR)),
        )?;
        let model_file = resolve(
            cli.model_file
                .as_deref()
                .or(file.model_file.as_deref())
                .unwrap_or_else(|| Path::new(DEFAULT_MODEL_FILENAME)),
        )?;

        let template_type =
            file.template_type.clone().unwrap_or_else(|| DEFAULT_TEMPLATE_TYPE.to_string());
        if template_type != DEFAULT_TEMPLATE_TYPE {
            return Err(CodegenError::config(format!(
                "Unsupported templateType '{template_type}' (only '{DEFAULT_TEMPLATE_TYPE}' is available)"
            )));
        }

        let extensions = match &file.extensions {
            Some(names) => names
                .iter()
                .map(|name| name.parse::<ExtensionKind>())
                .collect::<Result<Vec<_>, _>>()?,
            None => ExtensionKind::default_order(),
        };
        validate_kinds(&extensions)?;

        let mut formatters = default_formatters();
        formatters.extend(file.formatters.clone());

        let entries = file.templates.clone().ok_or_else(|| {
            CodegenError::config(format!(
                "You must define a 'templates' property in {}",
                config_file.display()
            ))
        })?;

        let mut templates = Vec::with_capacity(entries.len());
        for entry in entries {
            let model = match &entry.model_file {
                Some(path) => resolve(path)?,
                None => model_file.clone(),
            };
            templates.push(TemplateEntry::from_config(entry, &template_dir, model)?);
        }

        check_selection(&cli.to_render, &templates)?;

        let resolved = Self {
            force: cli.force || file.force.unwrap_or(false),
            pretty: cli.pretty || file.pretty_print.unwrap_or(false),
            formatter_timeout: file
                .formatter_timeout_secs
                .map_or(DEFAULT_FORMATTER_TIMEOUT, Duration::from_secs),
            base_dir,
            config_file,
            template_dir,
            model_file,
            template_type,
            formatters,
            extensions,
            templates,
            selected: cli.to_render.clone(),
        };

        resolved.pipeline_options().formatters.validate()?;
        Ok(resolved)
    }

    /// Resolve a path from the configuration against the base directory.
    ///
    /// `~` and environment variables are expanded; if expansion fails the path
    /// is used as written.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match expand_path(path) {
            Ok(expanded) => self.base_dir.join(expanded),
            Err(e) => {
                tracing::warn!("{}; using '{}' as written", e, path.display());
                self.base_dir.join(path)
            }
        }
    }

    /// The entries to render this run, in configuration order.
    pub fn selected_entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.templates
            .iter()
            .filter(|entry| self.selected.is_empty() || self.selected.contains(&entry.name))
    }

    /// Stage settings derived from this configuration.
    #[must_use]
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            formatters: FormatterRegistry::new(self.formatters.clone(), self.formatter_timeout),
        }
    }
}

impl TemplateEntry {
    fn from_config(
        entry: TemplateEntryConfig,
        template_dir: &Path,
        model_file: PathBuf,
    ) -> Result<Self, CodegenError> {
        if entry.name.trim().is_empty() {
            return Err(CodegenError::config("Template entries must have a non-empty 'name'"));
        }

        let expansion = match (entry.for_model_paths, entry.for_each) {
            (Some(_), Some(_)) => {
                return Err(CodegenError::config(format!(
                    "Template '{}' cannot use both 'forModelPaths' and 'forEach'",
                    entry.name
                )));
            }
            (Some(paths), None) => Expansion::ModelPaths(paths),
            (None, Some(path)) => Expansion::ForEach(path),
            (None, None) => Expansion::Single,
        };

        Ok(Self {
            source_path: template_dir.join(format!("{}.{TEMPLATE_FILE_EXTENSION}", entry.name)),
            name: entry.name,
            render_path: entry.render_path,
            model_file,
            expansion,
        })
    }
}

/// Expand `~` and environment variables in a path.
fn expand_path(path: &Path) -> Result<PathBuf, CodegenError> {
    let raw = path.to_string_lossy();
    shellexpand::full(&raw).map(|expanded| PathBuf::from(expanded.as_ref())).map_err(|e| {
        CodegenError::config(format!("Failed to expand path '{raw}': {e}"))
    })
}

fn check_selection(selected: &[String], templates: &[TemplateEntry]) -> Result<(), CodegenError> {
    for name in selected {
        if templates.iter().any(|entry| &entry.name == name) {
            continue;
        }

        let suggestion = templates
            .iter()
            .map(|entry| (entry.name.as_str(), levenshtein(name, &entry.name)))
            .filter(|(_, distance)| *distance <= name.len().max(2) / 2)
            .min_by_key(|(_, distance)| *distance)
            .map(|(candidate, _)| format!(" (did you mean '{candidate}'?)"))
            .unwrap_or_default();

        return Err(CodegenError::config(format!("Unknown template '{name}'{suggestion}")));
    }
    Ok(())
}

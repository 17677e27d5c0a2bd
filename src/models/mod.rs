//! Template models
//!
//! A [`Model`] is the read-only data a template is rendered against. It is a
//! nested YAML value (mappings, sequences and scalars) together with the place
//! it came from, which the staleness checker uses to decide whether generated
//! output is older than its inputs.
//!
//! # Dotted paths
//!
//! [`Model::resolve`] walks a dot-separated path from the root of the model:
//!
//! | Current value | Segment | Behavior |
//! |---|---|---|
//! | mapping | any | key lookup |
//! | sequence | numeric | positional index |
//! | anything else | any | [`CodegenError::ModelPath`] |
//!
//! ```rust,no_run
//! use codegen_cli::models::Model;
//!
//! # fn example() -> anyhow::Result<()> {
//! let model = Model::from_yaml_str("a:\n  b: [10, 20, 30]\n")?;
//! assert_eq!(model.resolve("a.b.1")?.as_i64(), Some(20));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::core::CodegenError;

/// Where a model's data came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOrigin {
    /// Loaded from a YAML file on disk
    File(PathBuf),
    /// Built in memory; has no modification time
    Memory,
}

/// Read-only structured data supplied to a template at render time.
///
/// Cloning is cheap: the underlying value is shared.
#[derive(Debug, Clone)]
pub struct Model {
    data: Arc<Value>,
    origin: ModelOrigin,
}

impl Model {
    /// Load a model from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Configuration`] when the file cannot be opened
    /// or does not contain valid YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CodegenError::config(format!(
                "The given model file cannot be opened: {} ({e})",
                path.display()
            ))
        })?;

        let data: Value = serde_yaml::from_str(&content).map_err(|e| {
            CodegenError::config(format!("Error parsing model yaml file ({}): {e}", path.display()))
        })?;

        tracing::debug!("Loaded model from {}", path.display());

        Ok(Self {
            data: Arc::new(data),
            origin: ModelOrigin::File(path.to_path_buf()),
        })
    }

    /// Create an in-memory model from an already parsed value.
    #[must_use]
    pub fn from_value(data: Value) -> Self {
        Self {
            data: Arc::new(data),
            origin: ModelOrigin::Memory,
        }
    }

    /// Parse an in-memory model from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let data: Value = serde_yaml::from_str(yaml).context("Failed to parse model YAML")?;
        Ok(Self::from_value(data))
    }

    /// The root value of the model.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    #[must_use]
    pub const fn origin(&self) -> &ModelOrigin {
        &self.origin
    }

    /// Modification time of the backing file.
    ///
    /// Always `None` for in-memory models. For file-backed models an
    /// unreadable timestamp is also reported as `None` rather than an error;
    /// callers treat a missing timestamp as "not newer".
    #[must_use]
    pub fn last_modified(&self) -> Option<SystemTime> {
        match &self.origin {
            ModelOrigin::File(path) => std::fs::metadata(path).and_then(|m| m.modified()).ok(),
            ModelOrigin::Memory => None,
        }
    }

    /// Resolve a dot-separated path against the model.
    ///
    /// Empty segments are ignored, so an empty path returns the whole model.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::ModelPath`] naming the first segment that could
    /// not be resolved and the full path.
    pub fn resolve(&self, path: &str) -> Result<&Value, CodegenError> {
        let mut current: &Value = &self.data;

        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = lookup(current, segment).ok_or_else(|| CodegenError::ModelPath {
                path: path.to_string(),
                segment: segment.to_string(),
            })?;
        }

        Ok(current)
    }

    /// Build a new model from the value at `path`, keeping this model's origin.
    ///
    /// The submodel shares the origin so a template rendered from it is still
    /// considered stale when the backing file changes.
    pub fn submodel(&self, path: &str) -> Result<Self, CodegenError> {
        let value = self.resolve(path)?.clone();
        Ok(self.with_data(value))
    }

    /// A model holding `data` with the same origin as this one.
    #[must_use]
    pub fn with_data(&self, data: Value) -> Self {
        Self {
            data: Arc::new(data),
            origin: self.origin.clone(),
        }
    }
}

fn lookup<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Mapping(map) => map.get(segment).or_else(|| {
            // YAML allows integer keys; `a.1` should reach `{a: {1: x}}`
            segment.parse::<i64>().ok().and_then(|n| map.get(Value::from(n)))
        }),
        Value::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Tagged(tagged) => lookup(&tagged.value, segment),
        _ => None,
    }
}

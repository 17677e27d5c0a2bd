//! Test project builder for simplified test setup
//!
//! Creates a temporary project directory laid out the way the CLI expects:
//!
//! ```text
//! <root>/codegen.yaml
//! <root>/codegen_model.yaml
//! <root>/codegen_tmpl/<name>.tera
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{
    DEFAULT_CONFIG_FILENAME, DEFAULT_MODEL_FILENAME, DEFAULT_TEMPLATE_DIR, TEMPLATE_FILE_EXTENSION,
};

/// A builder for creating test projects with a fluent API
#[derive(Debug, Default)]
pub struct TestProjectBuilder {
    config: Option<String>,
    model: Option<String>,
    templates: Vec<(String, String)>,
    files: Vec<(String, String)>,
}

impl TestProjectBuilder {
    /// Content of `codegen.yaml`
    pub fn with_config(mut self, content: impl Into<String>) -> Self {
        self.config = Some(content.into());
        self
    }

    /// Content of `codegen_model.yaml`
    pub fn with_model(mut self, content: impl Into<String>) -> Self {
        self.model = Some(content.into());
        self
    }

    /// Add `codegen_tmpl/<name>.tera`
    pub fn with_template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.templates.push((name.into(), source.into()));
        self
    }

    /// Add any other file, relative to the project root
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Build the test project
    pub fn build(self) -> Result<TestProject> {
        let temp_dir = TempDir::new()?;
        let project = TestProject {
            root: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        };

        if let Some(config) = &self.config {
            project.write_file(DEFAULT_CONFIG_FILENAME, config)?;
        }
        if let Some(model) = &self.model {
            project.write_file(DEFAULT_MODEL_FILENAME, model)?;
        }
        for (name, source) in &self.templates {
            project.write_template(name, source)?;
        }
        for (path, content) in &self.files {
            project.write_file(path, content)?;
        }

        Ok(project)
    }
}

/// A built test project; the directory is removed when this is dropped.
#[derive(Debug)]
pub struct TestProject {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestProject {
    /// Create a new test project builder
    #[must_use]
    pub fn builder() -> TestProjectBuilder {
        TestProjectBuilder::default()
    }

    #[must_use]
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    #[must_use]
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.root.join(DEFAULT_TEMPLATE_DIR).join(format!("{name}.{TEMPLATE_FILE_EXTENSION}"))
    }

    /// Write a file relative to the project root, creating parent directories
    pub fn write_file(&self, relative: impl AsRef<Path>, content: &str) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn write_template(&self, name: &str, source: &str) -> Result<()> {
        let path = self.template_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, source)?;
        Ok(())
    }

    pub fn read_file(&self, relative: impl AsRef<Path>) -> Result<String> {
        Ok(std::fs::read_to_string(self.root.join(relative))?)
    }

    #[must_use]
    pub fn file_exists(&self, relative: impl AsRef<Path>) -> bool {
        self.root.join(relative).exists()
    }
}

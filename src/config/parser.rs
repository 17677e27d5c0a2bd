//! Generic YAML configuration parsing.
//!
//! Reads a YAML file and deserializes it into any `DeserializeOwned` type.
//! Every failure (missing file, unreadable file, invalid YAML, wrong shape) is
//! reported as [`CodegenError::Configuration`] with the file path in the
//! message, so callers can treat it as fatal for the run.
//!
//! ```rust,no_run
//! use codegen_cli::config::parse_config;
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize)]
//! struct MyConfig {
//!     name: String,
//! }
//!
//! # fn example() -> anyhow::Result<()> {
//! let config: MyConfig = parse_config(Path::new("codegen.yaml"))?;
//! println!("Config: {}", config.name);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use crate::core::CodegenError;

/// Parse a YAML configuration file into the specified type.
///
/// An empty file is parsed as an empty mapping, so types whose fields all
/// have defaults accept it.
///
/// # Errors
///
/// [`CodegenError::Configuration`] if the file cannot be read or its content
/// does not match `T`.
pub fn parse_config<T>(path: &Path) -> Result<T, CodegenError>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path).map_err(|e| {
        CodegenError::config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    let content = if content.trim().is_empty() { "{}" } else { content.as_str() };

    serde_yaml::from_str(content).map_err(|e| {
        CodegenError::config(format!("Failed to parse config file {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct TestConfig {
        name: String,
        #[serde(default)]
        value: i32,
    }

    #[test]
    fn test_parse_config() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("test.yaml");
        std::fs::write(&config_path, "name: test\nvalue: 42\n").unwrap();

        let config: TestConfig = parse_config(&config_path).unwrap();
        assert_eq!(config.name, "test");
        assert_eq!(config.value, 42);
    }

    #[test]
    fn test_parse_config_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = parse_config::<TestConfig>(&temp.path().join("missing.yaml")).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_parse_config_invalid_yaml() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("bad.yaml");
        std::fs::write(&config_path, "name: [unclosed\n").unwrap();

        let err = parse_config::<TestConfig>(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}

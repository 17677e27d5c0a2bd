//! On-disk configuration format (`codegen.yaml`).
//!
//! Every key is optional here; defaults are applied when the file is merged
//! into a [`ResolvedConfig`](super::ResolvedConfig).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The parsed content of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// Directory relative paths are resolved against
    pub base_dir: Option<PathBuf>,
    /// Directory holding `<name>.tera` template files
    pub template_dir: Option<PathBuf>,
    /// Model file shared by templates that do not name their own
    pub model_file: Option<PathBuf>,
    /// Template engine; only `tera` is supported
    pub template_type: Option<String>,
    pub force: Option<bool>,
    pub pretty_print: Option<bool>,
    pub formatter_timeout_secs: Option<u64>,
    /// Formatter commands by output extension, merged over the defaults
    #[serde(default)]
    pub formatters: BTreeMap<String, String>,
    /// Ordered stage names (`banner`, `format`, `sections`)
    pub extensions: Option<Vec<String>>,
    pub templates: Option<Vec<TemplateEntryConfig>>,
}

/// One entry of the `templates` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntryConfig {
    pub name: String,
    pub render_path: String,
    pub model_file: Option<PathBuf>,
    /// Render once per listed model path
    pub for_model_paths: Option<Vec<String>>,
    /// Render once per element of the sequence at this model path
    pub for_each: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_keys() {
        let yaml = r"
baseDir: gen
prettyPrint: true
formatterTimeoutSecs: 5
formatters:
  go: gofmt
templates:
  - name: entity
    renderPath: src/entity.rs
    forModelPaths: [a.b]
";
        let config: FileConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_dir, Some(PathBuf::from("gen")));
        assert_eq!(config.pretty_print, Some(true));
        assert_eq!(config.formatter_timeout_secs, Some(5));
        assert_eq!(config.formatters["go"], "gofmt");

        let templates = config.templates.unwrap();
        assert_eq!(templates[0].render_path, "src/entity.rs");
        assert_eq!(templates[0].for_model_paths, Some(vec!["a.b".to_string()]));
    }

    #[test]
    fn test_entry_requires_render_path() {
        let yaml = "templates:\n  - name: entity\n";
        assert!(serde_yaml::from_str::<FileConfig>(yaml).is_err());
    }
}

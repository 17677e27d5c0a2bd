//! Extension pipeline: ordered text transforms applied around each render.
//!
//! Every template render goes through the same fixed list of stages. A stage
//! has two hooks:
//!
//! 1. [`Stage::begin`] runs before the raw render. It may read the template and
//!    its previous output and returns a [`StageState`] owned by that render.
//! 2. [`StageState::end`] runs after the raw render. It consumes the state and
//!    turns the text produced by the previous stage into new text.
//!
//! All `begin` hooks run in declared order, then the template engine is called
//! exactly once, then all `end` hooks run in the same declared order:
//!
//! ```text
//! begin(banner) -> begin(format) -> begin(sections)
//!     -> engine.render(template)
//!     -> end(banner) -> end(format) -> end(sections) -> final text
//! ```
//!
//! State never outlives one render and is never shared between stages or
//! templates: each call to [`ExtensionPipeline::run`] creates fresh states.
//!
//! # Stages
//!
//! - [`ExtensionKind::Banner`] - generated-file notice ([`banner`])
//! - [`ExtensionKind::Format`] - external formatter, soft fallback ([`format`])
//! - [`ExtensionKind::Sections`] - custom section merge ([`sections`]); must be
//!   the last stage so it sees the final text of every other stage

pub mod banner;
pub mod format;
pub mod sections;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::CodegenError;
use crate::templating::{PreviousOutput, Template, TemplateEngine};
use format::{Formatter, FormatterRegistry};
use sections::SectionMap;

/// The kinds of stage a pipeline can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    /// Prepend a generated-file notice
    Banner,
    /// Run the output through an external formatter
    Format,
    /// Carry custom sections over from the previous output
    Sections,
}

impl ExtensionKind {
    /// The stage list used when nothing is configured.
    #[must_use]
    pub fn default_order() -> Vec<Self> {
        vec![Self::Banner, Self::Format, Self::Sections]
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Banner => write!(f, "banner"),
            Self::Format => write!(f, "format"),
            Self::Sections => write!(f, "sections"),
        }
    }
}

impl FromStr for ExtensionKind {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "banner" => Ok(Self::Banner),
            "format" | "beautify" => Ok(Self::Format),
            "sections" | "custom-sections" => Ok(Self::Sections),
            _ => Err(CodegenError::config(format!(
                "Unknown extension '{s}' (expected one of: banner, format, sections)"
            ))),
        }
    }
}

/// Check that a list of stage kinds forms a valid pipeline.
///
/// Each kind may appear once, and nothing may follow [`ExtensionKind::Sections`].
pub fn validate_kinds(kinds: &[ExtensionKind]) -> Result<(), CodegenError> {
    for (idx, kind) in kinds.iter().enumerate() {
        if kinds[..idx].contains(kind) {
            return Err(CodegenError::config(format!(
                "Extension '{kind}' is listed more than once"
            )));
        }
    }

    let after_sections = kinds
        .iter()
        .position(|k| *k == ExtensionKind::Sections)
        .and_then(|pos| kinds.get(pos + 1));
    if let Some(after) = after_sections {
        return Err(CodegenError::config(format!(
            "Extension '{after}' is ordered after 'sections'; the section merge must be the last stage"
        )));
    }

    Ok(())
}

/// Settings the stages need besides the template itself.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub formatters: FormatterRegistry,
}

/// What a stage may look at before the raw render.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub template: &'a Template,
    pub previous: &'a PreviousOutput,
}

/// A configured stage. Stateless; shared by every render of a run.
#[derive(Debug, Clone)]
pub enum Stage {
    Banner,
    Format(FormatterRegistry),
    Sections,
}

impl Stage {
    fn new(kind: ExtensionKind, options: &PipelineOptions) -> Self {
        match kind {
            ExtensionKind::Banner => Self::Banner,
            ExtensionKind::Format => Self::Format(options.formatters.clone()),
            ExtensionKind::Sections => Self::Sections,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ExtensionKind {
        match self {
            Self::Banner => ExtensionKind::Banner,
            Self::Format(_) => ExtensionKind::Format,
            Self::Sections => ExtensionKind::Sections,
        }
    }

    /// Pre-render hook.
    ///
    /// # Errors
    ///
    /// An error here aborts the render of this template; nothing is written.
    pub fn begin(&self, input: &RenderInput<'_>) -> Result<StageState> {
        let template = input.template;

        let state = match self {
            Self::Banner => StageState::Banner {
                banner: banner::banner_for(&template.name, template.output_extension()),
            },
            Self::Format(registry) => {
                let formatter =
                    if template.pretty { registry.for_path(&template.output_path) } else { None };
                if template.pretty && formatter.is_none() {
                    tracing::debug!(
                        "No formatter configured for {}",
                        template.output_path.display()
                    );
                }
                StageState::Format {
                    formatter,
                }
            }
            Self::Sections => StageState::Sections {
                existing: input.previous.text().map(sections::extract).unwrap_or_default(),
            },
        };

        Ok(state)
    }
}

/// Per-render state handed from a stage's `begin` to its `end`.
#[derive(Debug)]
pub enum StageState {
    Banner { banner: Option<String> },
    Format { formatter: Option<Formatter> },
    Sections { existing: SectionMap },
}

impl StageState {
    /// Post-render hook: transform `text` and consume the state.
    pub async fn end(self, text: String) -> Result<String> {
        match self {
            Self::Banner {
                banner: Some(banner),
            } => Ok(banner::prepend(&banner, &text)),
            Self::Banner {
                banner: None,
            } => Ok(text),
            Self::Format {
                formatter: Some(formatter),
            } => Ok(format_or_fallback(&formatter, text).await),
            Self::Format {
                formatter: None,
            } => Ok(text),
            Self::Sections {
                existing,
            } => Ok(sections::merge(&text, &existing)),
        }
    }
}

async fn format_or_fallback(formatter: &Formatter, text: String) -> String {
    if !formatter.is_available() {
        tracing::warn!("Formatter '{}' not found, output left unformatted", formatter.program);
        return text;
    }

    match formatter.format(&text).await {
        Ok(formatted) => formatted,
        Err(e) => {
            tracing::warn!("{:#}; output left unformatted", e);
            text
        }
    }
}

/// The ordered stage list applied to every render.
#[derive(Debug, Clone)]
pub struct ExtensionPipeline {
    stages: Vec<Stage>,
}

impl ExtensionPipeline {
    /// Build a pipeline from an ordered list of kinds.
    ///
    /// # Errors
    ///
    /// [`CodegenError::Configuration`] if the list is invalid (see
    /// [`validate_kinds`]) or a formatter command is empty.
    pub fn new(kinds: &[ExtensionKind], options: PipelineOptions) -> Result<Self, CodegenError> {
        validate_kinds(kinds)?;
        if kinds.contains(&ExtensionKind::Format) {
            options.formatters.validate()?;
        }

        Ok(Self {
            stages: kinds.iter().map(|kind| Stage::new(*kind, &options)).collect(),
        })
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<ExtensionKind> {
        self.stages.iter().map(Stage::kind).collect()
    }

    /// Render `template` and pass the result through every stage.
    ///
    /// # Errors
    ///
    /// Stage `begin` failures are wrapped with the stage name; engine errors
    /// are returned as the engine reported them.
    pub async fn run(
        &self,
        template: &Template,
        previous: &PreviousOutput,
        engine: &dyn TemplateEngine,
    ) -> Result<String> {
        let input = RenderInput {
            template,
            previous,
        };

        let mut states = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let state = stage
                .begin(&input)
                .with_context(|| format!("Extension '{}' failed before rendering", stage.kind()))?;
            states.push(state);
        }

        let mut text = engine.render(template)?;

        for state in states {
            text = state.end(text).await?;
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeEngine, template_at};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn pipeline(kinds: &[ExtensionKind]) -> ExtensionPipeline {
        ExtensionPipeline::new(kinds, PipelineOptions::default()).unwrap()
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let err = validate_kinds(&[ExtensionKind::Banner, ExtensionKind::Banner]).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_requires_sections_last() {
        assert!(validate_kinds(&[ExtensionKind::Sections, ExtensionKind::Banner]).is_err());
        assert!(validate_kinds(&ExtensionKind::default_order()).is_ok());
        assert!(validate_kinds(&[]).is_ok());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Banner".parse::<ExtensionKind>().unwrap(), ExtensionKind::Banner);
        assert_eq!("sections".parse::<ExtensionKind>().unwrap(), ExtensionKind::Sections);
        assert!("minify".parse::<ExtensionKind>().is_err());
    }

    #[tokio::test]
    async fn test_run_applies_banner_then_merges_sections() {
        let temp = tempfile::tempdir().unwrap();
        let template = template_at(temp.path(), "entity", "out.rs");
        let engine = FakeEngine::new()
            .with_output("entity", "fn a() {}\n// [[@ section body @]]\n// [[@ end @]]\n");
        let previous =
            PreviousOutput::from_text("// [[@ section body @]]\nlet kept = 1;\n// [[@ end @]]\n");

        let text = pipeline(&ExtensionKind::default_order())
            .run(&template, &previous, &engine)
            .await
            .unwrap();

        assert!(text.starts_with("// GENERATED FILE"));
        assert!(text.contains("// [[@ section body @]]\nlet kept = 1;\n// [[@ end @]]"));
        assert_eq!(engine.render_count(), 1);
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let template = template_at(temp.path(), "entity", "out.rs");
        let engine =
            FakeEngine::new().with_output("entity", "x\n// [[@ section s @]]\n// [[@ end @]]\n");
        let pipeline = pipeline(&ExtensionKind::default_order());

        let first = pipeline.run(&template, &PreviousOutput::none(), &engine).await.unwrap();
        let second =
            pipeline.run(&template, &PreviousOutput::from_text(first.clone()), &engine).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_engine_error_propagates_unchanged() {
        let temp = tempfile::tempdir().unwrap();
        let template = template_at(temp.path(), "broken", "out.rs");
        let engine = FakeEngine::new().with_compile_error("broken", &["line 1: unexpected %}"]);

        let err = pipeline(&ExtensionKind::default_order())
            .run(&template, &PreviousOutput::none(), &engine)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CodegenError>(),
            Some(CodegenError::TemplateCompilation { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_pipeline_returns_raw_text() {
        let temp = tempfile::tempdir().unwrap();
        let template = template_at(temp.path(), "t", "out.rs");
        let engine = FakeEngine::new().with_output("t", "raw");

        let text = pipeline(&[]).run(&template, &PreviousOutput::none(), &engine).await.unwrap();
        assert_eq!(text, "raw");
    }

    #[tokio::test]
    async fn test_format_stage_falls_back_when_formatter_missing() {
        let temp = tempfile::tempdir().unwrap();
        let mut template = template_at(temp.path(), "t", "out.rs");
        template.pretty = true;
        let engine = FakeEngine::new().with_output("t", "fn  main( ){}");
        let options = PipelineOptions {
            formatters: FormatterRegistry::new(
                BTreeMap::from([("rs".to_string(), "codegen-missing-fmt-xyz".to_string())]),
                Duration::from_secs(1),
            ),
        };
        let pipeline = ExtensionPipeline::new(&[ExtensionKind::Format], options).unwrap();

        let text = pipeline.run(&template, &PreviousOutput::none(), &engine).await.unwrap();
        assert_eq!(text, "fn  main( ){}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_format_stage_runs_before_merge() {
        let temp = tempfile::tempdir().unwrap();
        let mut template = template_at(temp.path(), "t", "out.txt");
        template.pretty = true;
        let engine = FakeEngine::new().with_output("t", "abc [[@ section s @]]new[[@ end @]]\n");
        let options = PipelineOptions {
            formatters: FormatterRegistry::new(
                BTreeMap::from([("txt".to_string(), "sed s/abc/ABC/".to_string())]),
                Duration::from_secs(10),
            ),
        };
        let pipeline =
            ExtensionPipeline::new(&[ExtensionKind::Format, ExtensionKind::Sections], options)
                .unwrap();
        let previous = PreviousOutput::from_text("[[@ section s @]]old[[@ end @]]");

        let text = pipeline.run(&template, &previous, &engine).await.unwrap();
        assert_eq!(text, "ABC [[@ section s @]]old[[@ end @]]\n");
    }

    #[tokio::test]
    async fn test_format_stage_inactive_without_pretty() {
        let temp = tempfile::tempdir().unwrap();
        let template = template_at(temp.path(), "t", "out.rs");
        let stage = Stage::new(ExtensionKind::Format, &PipelineOptions::default());
        let previous = PreviousOutput::none();

        let state = stage
            .begin(&RenderInput {
                template: &template,
                previous: &previous,
            })
            .unwrap();
        assert!(matches!(state, StageState::Format { formatter: None }));
    }
}

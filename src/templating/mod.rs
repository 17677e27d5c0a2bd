//! Template engine binding and template construction.
//!
//! Templates are Tera files stored as `<templateDir>/<name>.tera`. Each is
//! rendered against a YAML model whose top-level keys become template
//! variables:
//!
//! ```text
//! // codegen_tmpl/entity.tera
//! pub struct {{ name }} {
//! {% for field in fields %}    pub {{ field.name }}: {{ field.ty }},
//! {% endfor %}}
//!
//! impl {{ name }} {
//!     // [[@ section {{ name | lower }}-impl @]]
//!     // [[@ end @]]
//! }
//! ```
//!
//! The text between the custom-section markers is owned by the user once the
//! file has been generated; see [`crate::extensions::sections`].
//!
//! # Modules
//!
//! - [`engine`] - the [`TemplateEngine`] seam and its Tera implementation
//! - [`template`] - [`Template`], [`PreviousOutput`] and [`TemplateBuilder`]

pub mod engine;
pub mod template;

pub use engine::{TemplateEngine, TeraEngine, build_context};
pub use template::{PreviousOutput, Template, TemplateBuilder};

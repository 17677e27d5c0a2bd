//! Global constants used throughout the codegen codebase.
//!
//! Default file names, timeouts and the custom-section delimiter syntax live
//! here so they are discoverable in one place.

use std::time::Duration;

/// Configuration file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "codegen.yaml";

/// Directory holding template files, relative to the base directory.
pub const DEFAULT_TEMPLATE_DIR: &str = "codegen_tmpl";

/// Model file used by templates that do not name their own.
pub const DEFAULT_MODEL_FILENAME: &str = "codegen_model.yaml";

/// Extension appended to a template name to find its source file.
pub const TEMPLATE_FILE_EXTENSION: &str = "tera";

/// The only template type currently supported.
pub const DEFAULT_TEMPLATE_TYPE: &str = "tera";

/// Default bounded wait for an external formatter (30 seconds).
///
/// A formatter that hangs would otherwise stall the whole run, since templates
/// are processed one after another.
pub const DEFAULT_FORMATTER_TIMEOUT: Duration = Duration::from_secs(30);

/// Start delimiter of a custom section, before the section name.
pub const SECTION_START_PREFIX: &str = "[[@ section ";

/// Start delimiter of a custom section, after the section name.
pub const SECTION_START_SUFFIX: &str = " @]]";

/// End delimiter of a custom section.
pub const SECTION_END: &str = "[[@ end @]]";

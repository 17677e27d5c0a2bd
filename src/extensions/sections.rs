//! Custom sections: user-owned regions of generated files.
//!
//! A custom section is delimited by a named start marker and an end marker:
//!
//! ```text
//! // [[@ section imports @]]
//! use crate::extra::Helper;
//! // [[@ end @]]
//! ```
//!
//! Section names match `[A-Za-z0-9_-]+`; matching is case-sensitive, spans
//! newlines and is non-greedy (a section ends at the first end marker).
//!
//! When a file is regenerated, every section present in the new render whose
//! name also appears in the previous output gets its previous content back.
//! Sections that are new in the template keep their freshly rendered content;
//! sections that no longer exist in the template are dropped. Text outside
//! delimiter pairs is never touched.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::constants::{SECTION_END, SECTION_START_PREFIX, SECTION_START_SUFFIX};

static SECTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[@ section (?P<name>[A-Za-z0-9_-]+) @\]\](?P<content>(?s:.*?))\[\[@ end @\]\]")
        .expect("custom section pattern is a valid regex")
});

/// A named region extracted from rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSection {
    pub name: String,
    /// Everything between the start and end markers, verbatim
    pub content: String,
}

impl CustomSection {
    /// The section with its delimiters, as it appears in a file.
    #[must_use]
    pub fn to_delimited(&self) -> String {
        format!(
            "{SECTION_START_PREFIX}{}{SECTION_START_SUFFIX}{}{SECTION_END}",
            self.name, self.content
        )
    }
}

/// Sections keyed by name.
pub type SectionMap = HashMap<String, CustomSection>;

/// Iterate over the sections of `text`, left to right, without overlap.
pub fn sections_iter(text: &str) -> impl Iterator<Item = CustomSection> + '_ {
    SECTION_REGEX.captures_iter(text).map(|caps| CustomSection {
        name: caps["name"].to_string(),
        content: caps["content"].to_string(),
    })
}

/// Extract the sections of `text` into a map.
///
/// When a name occurs more than once the last occurrence wins.
pub fn extract(text: &str) -> SectionMap {
    let mut sections = SectionMap::new();

    for section in sections_iter(text) {
        if let Some(previous) = sections.insert(section.name.clone(), section) {
            tracing::warn!(
                "Custom section '{}' appears more than once; only its last occurrence is kept",
                previous.name
            );
        }
    }

    tracing::debug!("Custom sections found: {:?}", sections.keys().collect::<Vec<_>>());
    sections
}

/// Re-insert previously extracted sections into freshly rendered text.
///
/// Each delimiter pair of `new_text` whose name is in `existing` is emitted with
/// the old content; all other text, including pairs with unknown names, is
/// copied unchanged. The old content is inserted literally.
pub fn merge(new_text: &str, existing: &SectionMap) -> String {
    if existing.is_empty() {
        return new_text.to_string();
    }

    SECTION_REGEX
        .replace_all(new_text, |caps: &Captures<'_>| match existing.get(&caps["name"]) {
            Some(old) => old.to_delimited(),
            None => {
                tracing::debug!("New custom section found: {}", &caps["name"]);
                caps[0].to_string()
            }
        })
        .into_owned()
}

//! Generated-file banner.
//!
//! Prepends a short notice, written in the comment syntax of the output file,
//! telling readers the file is generated. The notice contains no timestamps so
//! regenerating an unchanged template produces identical bytes.

/// How comments are written in a given output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// Every line starts with the given prefix (`//`, `#`, `--`)
    Line(&'static str),
    /// One block wrapped in an opening and a closing delimiter
    Block(&'static str, &'static str),
}

impl CommentStyle {
    /// Pick the comment style for a file extension.
    ///
    /// Returns `None` for formats without comments (JSON) or extensions we do
    /// not know; such files get no banner.
    #[must_use]
    pub fn for_extension(extension: &str) -> Option<Self> {
        let style = match extension.to_ascii_lowercase().as_str() {
            "rs" | "java" | "c" | "h" | "cc" | "cpp" | "hpp" | "cs" | "go" | "js" | "jsx" | "mjs"
            | "ts" | "tsx" | "kt" | "kts" | "scala" | "swift" | "dart" | "groovy" | "gradle"
            | "proto" | "php" | "zig" => Self::Line("//"),
            "py" | "rb" | "sh" | "bash" | "zsh" | "yaml" | "yml" | "toml" | "pl" | "r" | "cmake"
            | "tf" | "nix" | "ex" | "exs" | "conf" | "properties" => Self::Line("#"),
            "sql" | "lua" | "hs" | "elm" | "ada" => Self::Line("--"),
            "html" | "htm" | "xml" | "xhtml" | "svg" | "md" | "vue" => Self::Block("<!--", "-->"),
            "css" | "scss" | "less" => Self::Block("/*", "*/"),
            _ => return None,
        };
        Some(style)
    }

    fn render(self, lines: &[String]) -> String {
        match self {
            Self::Line(prefix) => lines.iter().map(|line| format!("{prefix} {line}\n")).collect(),
            Self::Block(open, close) => {
                let mut out = format!("{open}\n");
                for line in lines {
                    out.push_str("  ");
                    out.push_str(line);
                    out.push('\n');
                }
                out.push_str(close);
                out.push('\n');
                out
            }
        }
    }
}

/// Build the banner text for a template, or `None` when the output format
/// has no known comment syntax.
#[must_use]
pub fn banner_for(template_name: &str, extension: Option<&str>) -> Option<String> {
    let style = CommentStyle::for_extension(extension?)?;
    let lines = [
        "GENERATED FILE - DO NOT EDIT OUTSIDE CUSTOM SECTIONS".to_string(),
        format!("Generated by codegen from template '{template_name}'."),
        "Changes outside custom sections are overwritten on the next run.".to_string(),
    ];
    Some(style.render(&lines))
}

/// Insert `banner` at the top of `text`.
///
/// A leading shebang (`#!`) or XML declaration (`<?xml`) must stay on the first
/// line, so the banner goes right after it in that case.
#[must_use]
pub fn prepend(banner: &str, text: &str) -> String {
    let keeps_first_line = text.starts_with("#!") || text.starts_with("<?xml");

    if keeps_first_line {
        let (first, rest) = match text.find('\n') {
            Some(idx) => text.split_at(idx + 1),
            None => (text, ""),
        };
        let separator = if first.ends_with('\n') { "" } else { "\n" };
        format!("{first}{separator}{banner}\n{rest}")
    } else {
        format!("{banner}\n{text}")
    }
}

//! Whitespace normalization for multi-line field values.
//!
//! Document text comes out of PDF text extraction with ragged indentation and
//! runs of spaces; these passes tidy captured values without touching content.

use std::sync::LazyLock;

use regex::Regex;

static LINE_INDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*").expect("valid regex"));

static SPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Keep line breaks but strip each line's indentation, drop blank lines,
/// and collapse runs of spaces.
pub(crate) fn reflow_lines(text: &str) -> String {
    let text = LINE_INDENT_RE.replace_all(text.trim(), "\n");
    SPACE_RUN_RE.replace_all(&text, " ").into_owned()
}

/// Collapse all whitespace, including line breaks, to single spaces.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflow_keeps_line_breaks() {
        let input = "  Handel mit  Waren\n     aller Art\n\n   sowie Dienstleistungen  ";
        assert_eq!(
            reflow_lines(input),
            "Handel mit Waren\naller Art\nsowie Dienstleistungen"
        );
    }

    #[test]
    fn collapse_joins_lines() {
        let input = "Ist nur ein Geschäftsführer\n   bestellt,\tso vertritt er\n";
        assert_eq!(
            collapse_whitespace(input),
            "Ist nur ein Geschäftsführer bestellt, so vertritt er"
        );
    }
}

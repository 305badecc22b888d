//! Line-based cleanup applied to markdown before it reaches the renderer.

use regex::Regex;
use std::sync::LazyLock;

/// Leading whitespace, one or more `#`, then whitespace.
static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#+\s").expect("valid heading pattern"));

/// Strip leading whitespace from heading lines
///
/// The renderer only recognizes a heading when its `#` sits at column zero (or is
/// indented less than four spaces). Descriptions saved through older forms picked up
/// indentation in front of their headings, and the stored HTML was produced with this
/// exact rule, so it must stay byte-for-byte stable:
///
/// - only lines matching `^\s*#+\s` are touched
/// - list items and every other line are left as they are
/// - lines inside fenced code blocks are not special-cased
pub fn normalize_headings(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if HEADING_LINE.is_match(line) {
                line.trim_start()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether a single line would be rewritten by [`normalize_headings`]
pub fn is_indented_heading(line: &str) -> bool {
    HEADING_LINE.is_match(line) && line.starts_with(char::is_whitespace)
}

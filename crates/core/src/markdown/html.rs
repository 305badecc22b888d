//! Markdown to (unsanitized) HTML.
//!
//! The extension set is fixed: fenced code blocks, tables, a hard line break on every
//! single newline, header ids, strikethrough, task lists, and "code-friendly" emphasis
//! where `_`/`__` never produce `<em>`/`<strong>`.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

static SLUG_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid slug pattern"));

static SLUG_HYPHENATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid hyphenate pattern"));

/// Slug used when a heading has no word characters at all.
const FALLBACK_SLUG: &str = "section";

/// Parser options for the fixed extension set
pub fn markdown_options() -> Options {
    let mut options = Options::empty();

    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    options
}

/// Render markdown to HTML without any sanitization
///
/// Fenced code blocks are part of CommonMark and need no option. Malformed input
/// (an unclosed fence, a dangling table row) renders best-effort.
pub fn render_html(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let parser = Parser::new_ext(markdown, markdown_options()).into_offset_iter();

    let events = literal_underscores(markdown, parser)
        .into_iter()
        .map(hard_break)
        .collect();
    let events = assign_heading_ids(events);

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    html_output
}

/// Turn every soft line break into `<br />`
fn hard_break(event: Event<'_>) -> Event<'_> {
    match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    }
}

/// Replace underscore-delimited emphasis with the literal delimiters
///
/// The parser reports emphasis without saying which delimiter produced it, so the
/// source offset of each `Start` event is checked instead. A stack keeps every `End`
/// paired with its `Start`.
fn literal_underscores<'a>(
    source: &str,
    events: impl Iterator<Item = (Event<'a>, Range<usize>)>,
) -> Vec<Event<'a>> {
    let mut open: Vec<Option<&'static str>> = Vec::new();
    let mut output = Vec::new();

    for (event, range) in events {
        match event {
            Event::Start(tag @ (Tag::Emphasis | Tag::Strong)) => {
                let delimiter = match (source.as_bytes().get(range.start), &tag) {
                    (Some(b'_'), Tag::Strong) => Some("__"),
                    (Some(b'_'), _) => Some("_"),
                    _ => None,
                };

                open.push(delimiter);
                output.push(match delimiter {
                    Some(literal) => Event::Text(CowStr::Borrowed(literal)),
                    None => Event::Start(tag),
                });
            }
            Event::End(tag @ (TagEnd::Emphasis | TagEnd::Strong)) => {
                output.push(match open.pop().flatten() {
                    Some(literal) => Event::Text(CowStr::Borrowed(literal)),
                    None => Event::End(tag),
                });
            }
            other => output.push(other),
        }
    }

    output
}

/// Give every heading an `id` derived from its text
fn assign_heading_ids(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for index in 0..events.len() {
        if !matches!(events[index], Event::Start(Tag::Heading { .. })) {
            continue;
        }

        let text = heading_text(&events[index + 1..]);
        let slug = unique_slug(slugify(&text), &mut seen);

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[index] {
            *id = Some(CowStr::from(slug));
        }
    }

    events
}

/// Plain text of a heading, up to its closing tag
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();

    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }

    text
}

/// Lower-case slug: non-word characters removed, whitespace and hyphen runs become `-`
pub fn slugify(text: &str) -> String {
    let stripped = SLUG_STRIP.replace_all(text, "");
    let lowered = stripped.trim().to_lowercase();
    let slug = SLUG_HYPHENATE.replace_all(&lowered, "-").into_owned();

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Suffix repeated slugs with `-2`, `-3`, ...
fn unique_slug(slug: String, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(slug.clone()).or_insert(0);
    *count += 1;

    if *count == 1 {
        slug
    } else {
        format!("{slug}-{count}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(render_html(""), "");
    }

    #[test]
    fn test_heading_gets_id() {
        assert_eq!(render_html("# Title"), "<h1 id=\"title\">Title</h1>\n");
    }

    #[test]
    fn test_duplicate_headings_get_suffixed_ids() {
        let html = render_html("## Notes\n\n## Notes\n\n## Notes");
        assert!(html.contains(r#"<h2 id="notes">"#));
        assert!(html.contains(r#"<h2 id="notes-2">"#));
        assert!(html.contains(r#"<h2 id="notes-3">"#));
    }

    #[test]
    fn test_heading_id_includes_inline_code() {
        let html = render_html("### Using `cargo test`");
        assert!(html.contains(r#"id="using-cargo-test""#));
    }

    #[test]
    fn test_single_newline_is_hard_break() {
        assert_eq!(render_html("a\nb"), "<p>a<br />\nb</p>\n");
    }

    #[test]
    fn test_fenced_code_block() {
        let html = render_html("```rust\nfn main() {}\n```");
        let expected = "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>";
        assert!(html.contains(expected));
    }

    #[test]
    fn test_table() {
        let html = render_html("| Item | Qty |\n|------|-----|\n| milk | 1 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>Item</th>"));
        assert!(html.contains("<td>milk</td>"));
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(render_html("~~gone~~"), "<p><del>gone</del></p>\n");
    }

    #[test]
    fn test_task_list() {
        let html = render_html("- [ ] milk\n- [x] eggs");
        assert!(html.contains(r#"<input disabled="" type="checkbox"/>"#));
        let checked = r#"<input disabled="" type="checkbox" checked=""/>"#;
        assert!(html.contains(checked));
    }

    #[test]
    fn test_underscores_inside_words_are_literal() {
        assert_eq!(
            render_html("call snake_case_name now"),
            "<p>call snake_case_name now</p>\n"
        );
    }

    #[test]
    fn test_underscore_emphasis_is_disabled() {
        assert_eq!(render_html("_not emphasis_"), "<p>_not emphasis_</p>\n");
        assert_eq!(render_html("__init__"), "<p>__init__</p>\n");
    }

    #[test]
    fn test_asterisk_emphasis_still_works() {
        assert_eq!(
            render_html("*em* and **strong**"),
            "<p><em>em</em> and <strong>strong</strong></p>\n"
        );
    }

    #[test]
    fn test_mixed_delimiters_keep_pairs() {
        let html = render_html("**bold _plain_ bold**");
        assert_eq!(html, "<p><strong>bold _plain_ bold</strong></p>\n");
    }

    #[test]
    fn test_unclosed_fence_renders_best_effort() {
        let html = render_html("```\nlet x = 1;");
        assert!(html.contains("<pre><code>"));
        assert!(html.contains("let x = 1;"));
    }

    #[test]
    fn test_raw_html_passes_through_unsanitized() {
        let html = render_html("<div class=\"x\">hi</div>");
        assert!(html.contains("<div class=\"x\">"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Shopping List"), "shopping-list");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("材料（4人分）"), "材料4人分");
        assert_eq!(slugify("!!!"), "section");
    }
}

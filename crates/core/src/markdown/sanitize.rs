//! Allow-list sanitization of rendered HTML.
//!
//! The policy is a plain table ([`AllowList`]) mapping each permitted tag to the
//! attributes it may carry. A single routine ([`AllowList::clean`]) turns the table
//! into an `ammonia` builder, so the policy can be audited and tested without going
//! through the markdown renderer.

use ammonia::{Builder, UrlRelative};
use std::collections::{HashMap, HashSet};

/// One permitted tag and the attributes it may keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRule {
    pub tag: &'static str,
    pub attributes: &'static [&'static str],
}

const fn bare(tag: &'static str) -> TagRule {
    TagRule {
        tag,
        attributes: &[],
    }
}

const DEFAULT_RULES: &[TagRule] = &[
    bare("p"),
    bare("br"),
    bare("strong"),
    bare("em"),
    bare("u"),
    bare("i"),
    bare("b"),
    bare("code"),
    bare("pre"),
    bare("blockquote"),
    bare("ul"),
    bare("ol"),
    bare("li"),
    bare("h1"),
    bare("h2"),
    bare("h3"),
    bare("h4"),
    bare("h5"),
    bare("h6"),
    TagRule {
        tag: "a",
        attributes: &["href", "title"],
    },
    TagRule {
        tag: "img",
        attributes: &["src", "alt", "title"],
    },
    bare("hr"),
    bare("table"),
    bare("thead"),
    bare("tbody"),
    bare("tr"),
    bare("th"),
    bare("td"),
    TagRule {
        tag: "input",
        attributes: &["type", "checked", "disabled"],
    },
    bare("del"),
    bare("s"),
];

/// Schemes allowed in `href`/`src`. Relative URLs are always kept.
const DEFAULT_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Disallowed tags whose text content is dropped along with the tag.
const DEFAULT_DROP_CONTENT: &[&str] = &["script", "style"];

/// Sanitization policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowList {
    pub rules: &'static [TagRule],
    pub url_schemes: &'static [&'static str],
    pub drop_content: &'static [&'static str],
}

impl Default for AllowList {
    fn default() -> Self {
        Self::default_policy()
    }
}

impl AllowList {
    /// The policy every stored description and post body is filtered with
    pub const fn default_policy() -> Self {
        Self {
            rules: DEFAULT_RULES,
            url_schemes: DEFAULT_URL_SCHEMES,
            drop_content: DEFAULT_DROP_CONTENT,
        }
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.rule(tag).is_some()
    }

    /// Attributes `tag` may keep; empty for unknown tags
    pub fn allowed_attributes(&self, tag: &str) -> &'static [&'static str] {
        self.rule(tag).map(|rule| rule.attributes).unwrap_or(&[])
    }

    fn rule(&self, tag: &str) -> Option<&TagRule> {
        self.rules
            .iter()
            .find(|rule| rule.tag.eq_ignore_ascii_case(tag))
    }

    fn builder(&self) -> Builder<'static> {
        let tags: HashSet<&'static str> = self.rules.iter().map(|rule| rule.tag).collect();

        let tag_attributes: HashMap<&'static str, HashSet<&'static str>> = self
            .rules
            .iter()
            .filter(|rule| !rule.attributes.is_empty())
            .map(|rule| (rule.tag, rule.attributes.iter().copied().collect()))
            .collect();

        let mut builder = Builder::empty();
        builder
            .tags(tags)
            .tag_attributes(tag_attributes)
            .url_schemes(self.url_schemes.iter().copied().collect())
            .url_relative(UrlRelative::PassThrough)
            .clean_content_tags(self.drop_content.iter().copied().collect())
            .link_rel(None)
            .strip_comments(true);

        builder
    }

    /// Remove every tag and attribute the table does not name
    ///
    /// Disallowed tags are stripped, not escaped: their text children survive except
    /// for the `drop_content` tags, which disappear with everything inside them.
    pub fn clean(&self, html: &str) -> String {
        if html.is_empty() {
            return String::new();
        }

        preserve_pre_newlines(self.builder().clean(html).to_string())
    }
}

/// The HTML parser drops one newline right after `<pre>`; put it back so the
/// output reparses to the same content
fn preserve_pre_newlines(html: String) -> String {
    if !html.contains("<pre>\n") {
        return html;
    }

    let mut out = String::with_capacity(html.len() + 8);
    let (mut in_tag, mut quoted, mut tag_start) = (false, false, 0);

    for (i, c) in html.char_indices() {
        out.push(c);
        match c {
            '<' if !in_tag => {
                in_tag = true;
                tag_start = i;
            }
            '"' if in_tag => quoted = !quoted,
            '>' if in_tag && !quoted => {
                in_tag = false;
                if &html[tag_start..=i] == "<pre>" && html[i + 1..].starts_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }

    out
}

/// Sanitize HTML with the default policy
pub fn sanitize(html: &str) -> String {
    AllowList::default_policy().clean(html)
}

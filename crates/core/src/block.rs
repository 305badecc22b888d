//! Content block: raw markdown plus the sanitized HTML derived from it.

use crate::markdown::{render, RenderError};
use serde::{Deserialize, Serialize};

/// A to-do description or a blog post body
///
/// `html` is only ever assigned from [`render`] on the current `source`, and both
/// fields are replaced together. Blocks read back from a record file are trusted as
/// written; [`ContentBlock::rerender`] recomputes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    source: String,
    html: String,
}

impl ContentBlock {
    pub fn new(source: impl Into<String>) -> Result<Self, RenderError> {
        let source = source.into();
        let html = render(&source)?;

        Ok(Self { source, html })
    }

    /// Replace the source and recompute the HTML from scratch
    ///
    /// On error the block is left untouched.
    pub fn set_source(&mut self, source: impl Into<String>) -> Result<(), RenderError> {
        *self = Self::new(source)?;
        Ok(())
    }

    /// Recompute the HTML from the stored source
    ///
    /// Returns `true` when the stored HTML was stale.
    pub fn rerender(&mut self) -> Result<bool, RenderError> {
        let html = render(&self.source)?;
        let changed = html != self.html;
        self.html = html;

        Ok(changed)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn is_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_renders_source() {
        let block = ContentBlock::new("# Hello").unwrap();
        assert_eq!(block.source(), "# Hello");
        assert_eq!(block.html(), "<h1>Hello</h1>\n");
    }

    #[test]
    fn test_empty_block() {
        let block = ContentBlock::new("").unwrap();
        assert!(block.is_empty());
        assert_eq!(block.html(), "");
        assert_eq!(block, ContentBlock::default());
    }

    #[test]
    fn test_source_is_kept_verbatim() {
        let source = "    # Indented\n<script>x()</script>";
        let block = ContentBlock::new(source).unwrap();
        assert_eq!(block.source(), source);
        assert!(!block.html().contains("script"));
    }

    #[test]
    fn test_set_source_overwrites_html_wholesale() {
        let mut block = ContentBlock::new("# First").unwrap();
        block.set_source("plain").unwrap();
        assert_eq!(block.source(), "plain");
        assert_eq!(block.html(), "<p>plain</p>\n");
    }

    #[test]
    fn test_clearing_source_clears_html() {
        let mut block = ContentBlock::new("**bold**").unwrap();
        block.set_source("").unwrap();
        assert_eq!(block.html(), "");
    }

    #[test]
    fn test_rerender_reports_stale_html() {
        let json = r##"{"source":"# Title","html":"<h1 id=\"title\">Title</h1>"}"##;
        let mut block: ContentBlock = serde_json::from_str(json).unwrap();

        assert!(block.rerender().unwrap());
        assert_eq!(block.html(), "<h1>Title</h1>\n");
        assert!(!block.rerender().unwrap());
    }

    #[test]
    fn test_serde_shape() {
        let block = ContentBlock::new("hi").unwrap();
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["source"], "hi");
        assert_eq!(json["html"], "<p>hi</p>\n");
    }
}

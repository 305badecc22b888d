//! Markdown to safe HTML
//!
//! Three steps compose linearly:
//!
//! 1. [`normalize_headings`]: strip indentation in front of heading lines
//! 2. [`render_html`]: markdown to HTML with the fixed extension set
//! 3. [`sanitize`]: filter the HTML through the [`AllowList`]
//!
//! [`render`] runs all three and is the only way stored HTML is produced.

pub mod html;
pub mod normalize;
pub mod sanitize;

pub use html::{markdown_options, render_html, slugify};
pub use normalize::{is_indented_heading, normalize_headings};
pub use sanitize::{sanitize, AllowList, TagRule};

use serde::Serialize;
use std::any::Any;
use std::panic::{self, UnwindSafe};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum RenderError {
    #[error("Markdown rendering failed: {0}")]
    Renderer(String),
}

/// Every stage of one rendering, for inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub source: String,
    pub normalized: String,
    pub rendered: String,
    pub html: String,
}

/// Convert untrusted markdown to HTML that is safe to embed
///
/// Empty input yields empty output. A panic in the renderer or the sanitizer is
/// reported as [`RenderError::Renderer`] instead of unwinding into the caller.
pub fn render(raw: &str) -> Result<String, RenderError> {
    render_document(raw).map(|document| document.html)
}

/// Like [`render`], keeping the normalized source and the unsanitized HTML
pub fn render_document(raw: &str) -> Result<RenderedDocument, RenderError> {
    if raw.is_empty() {
        return Ok(RenderedDocument {
            source: String::new(),
            normalized: String::new(),
            rendered: String::new(),
            html: String::new(),
        });
    }

    let (normalized, rendered, html) = catch_panic(|| {
        let normalized = normalize_headings(raw);
        let rendered = render_html(&normalized);
        let html = sanitize(&rendered);
        (normalized, rendered, html)
    })?;

    Ok(RenderedDocument {
        source: raw.to_string(),
        normalized,
        rendered,
        html,
    })
}

fn catch_panic<T>(f: impl FnOnce() -> T + UnwindSafe) -> Result<T, RenderError> {
    panic::catch_unwind(f).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        log::error!("markdown renderer panicked: {message}");
        RenderError::Renderer(message)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "renderer panicked without a message".to_string()
    }
}

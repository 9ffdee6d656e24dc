//! Markdown processing: publish boundary, wikilinks, embeds, rendering.
//!
//! Wikilinks are rewritten into raw anchors before the markdown renderer
//! runs; the renderer passes inline HTML through untouched, including
//! inside table cells. Embeds are rewritten on the parsed event stream.

pub mod embeds;
pub mod wikilinks;

use crate::index::LinkIndex;
use pulldown_cmark::{html, Options, Parser};
use std::path::Path;

pub use embeds::transform_embeds;
pub use wikilinks::{relative_href, WikilinkTransformer};

/// Default marker after which a document's content stays private
pub const DEFAULT_PUBLISH_BOUNDARY: &str = "<!-- private -->";

/// HTML and link bookkeeping for one transformed document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,

    /// Keys of resolved wikilink targets
    pub links: Vec<String>,

    /// Wikilink targets that rendered as dead links
    pub unresolved: Vec<String>,
}

/// Markdown processor with wiki extensions
pub struct MarkdownProcessor {
    options: Options,
    publish_boundary: String,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        Self::with_publish_boundary(DEFAULT_PUBLISH_BOUNDARY)
    }

    pub fn with_publish_boundary(publish_boundary: impl Into<String>) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        // Fenced code blocks are part of CommonMark and always enabled.

        Self {
            options,
            publish_boundary: publish_boundary.into(),
        }
    }

    /// Transform a document's raw text into HTML.
    ///
    /// `source` is the document's path relative to the corpus root; links
    /// are made relative to that document's output page.
    pub fn convert(&self, markdown: &str, source: &Path, index: &LinkIndex) -> Rendered {
        let published = truncate_at_boundary(markdown, &self.publish_boundary);

        let rewritten = WikilinkTransformer::new(index, source).transform(published);
        let events = transform_embeds(Parser::new_ext(&rewritten.text, self.options));

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Rendered {
            html: html_output,
            links: rewritten.links,
            unresolved: rewritten.unresolved,
        }
    }

    /// Render markdown to HTML without wiki processing
    pub fn render(&self, markdown: &str) -> String {
        let mut html_output = String::new();
        html::push_html(&mut html_output, Parser::new_ext(markdown, self.options));
        html_output
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop everything at and after the first occurrence of `boundary`.
/// An empty boundary disables truncation.
pub fn truncate_at_boundary<'a>(text: &'a str, boundary: &str) -> &'a str {
    if boundary.is_empty() {
        return text;
    }
    match text.find(boundary) {
        Some(pos) => &text[..pos],
        None => text,
    }
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

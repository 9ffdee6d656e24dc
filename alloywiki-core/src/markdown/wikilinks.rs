//! Wikilink rewriting for [[target]] and [[target|label]] syntax.
//!
//! Links are rewritten to raw `<a>` tags on the markdown source, before the
//! markdown renderer sees it. Targets and labels never span `[`, `]`, `|` or
//! a newline, so a link can't swallow neighbouring table cells.

use crate::index::LinkIndex;
use crate::slug::document_key;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Component, Path};

/// `(!)?[[target]]`, `[[target|label]]`, `[[target\|label]]`
static WIKILINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(!?)\[\[([^\[\]|\n]+?)(?:\\?\|([^\[\]|\n]*))?\]\]").expect("valid wikilink regex")
});

/// Placeholder href for links whose target is not in the index
pub const DEAD_LINK_HREF: &str = "#";

/// Result of rewriting one document's wikilinks
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RewrittenLinks {
    pub text: String,

    /// Keys of targets that resolved
    pub links: Vec<String>,

    /// Raw target text of links rendered as dead links
    pub unresolved: Vec<String>,
}

/// Rewrites wikilinks for a single source document
pub struct WikilinkTransformer<'a> {
    index: &'a LinkIndex,
    source: &'a Path,
}

impl<'a> WikilinkTransformer<'a> {
    /// `source` is the document's path relative to the corpus root.
    pub fn new(index: &'a LinkIndex, source: &'a Path) -> Self {
        Self { index, source }
    }

    /// Replace every `[[...]]` with an anchor tag. Embeds (`![[...]]`) are
    /// left in place for the embed pass.
    pub fn transform(&self, text: &str) -> RewrittenLinks {
        let mut links = Vec::new();
        let mut unresolved = Vec::new();

        let text = WIKILINK_RE
            .replace_all(text, |caps: &Captures| {
                if &caps[1] == "!" {
                    return caps[0].to_string();
                }

                let target = caps[2].trim();
                let label = caps
                    .get(3)
                    .map(|m| m.as_str().trim())
                    .filter(|l| !l.is_empty())
                    .unwrap_or(target);

                match self.resolve(target) {
                    Some(href) => {
                        links.push(document_key(target));
                        anchor(&href, label)
                    }
                    None => {
                        tracing::debug!("Unresolved wikilink [[{}]] in {:?}", target, self.source);
                        unresolved.push(target.to_string());
                        anchor(DEAD_LINK_HREF, label)
                    }
                }
            })
            .into_owned();

        RewrittenLinks {
            text,
            links,
            unresolved,
        }
    }

    /// Relative href from this document's page to the target's page
    fn resolve(&self, target: &str) -> Option<String> {
        let target_output = self.index.resolve(&document_key(target))?;
        let own_output = self.index.output_for(self.source)?;
        Some(relative_href(own_output, target_output))
    }
}

fn anchor(href: &str, label: &str) -> String {
    format!("<a href=\"{}\">{}</a>", super::html_escape(href), label)
}

/// Path from the directory containing `from_file` to `to_file`, joined with
/// forward slashes. Both paths are relative to the same root.
///
/// ```
/// use std::path::Path;
/// use alloywiki_core::markdown::wikilinks::relative_href;
///
/// assert_eq!(relative_href(Path::new("A.html"), Path::new("B.html")), "B.html");
/// assert_eq!(relative_href(Path::new("a/x/A.html"), Path::new("a/y/B.html")), "../y/B.html");
/// assert_eq!(relative_href(Path::new("a/A.html"), Path::new("B.html")), "../B.html");
/// ```
pub fn relative_href(from_file: &Path, to_file: &Path) -> String {
    let from_dir: Vec<_> = from_file
        .parent()
        .map(normal_components)
        .unwrap_or_default();
    let to: Vec<_> = normal_components(to_file);

    let common = from_dir
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat("..".to_string()).take(from_dir.len() - common));
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

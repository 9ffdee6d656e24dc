//! Page templates with literal placeholder substitution.

use std::io;
use std::path::{Path, PathBuf};

/// Marker replaced by the page body
pub const CONTENT_PLACEHOLDER: &str = "{{content}}";

/// Marker replaced by the page title (per-document template only)
pub const TITLE_PLACEHOLDER: &str = "{{title}}";

/// An HTML template loaded from disk
#[derive(Debug, Clone)]
pub struct PageTemplate {
    path: PathBuf,
    source: String,
}

impl PageTemplate {
    pub fn load(path: &Path) -> io::Result<Self> {
        Ok(Self::from_source(path, std::fs::read_to_string(path)?))
    }

    pub fn from_source(path: &Path, source: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Substitute every placeholder occurrence. The title goes in first so
    /// a `{{title}}` inside the body text is left as written. Missing
    /// markers leave the template unchanged at that point.
    pub fn render(&self, title: Option<&str>, content: &str) -> String {
        let with_title = match title {
            Some(title) => self.source.replace(TITLE_PLACEHOLDER, title),
            None => self.source.clone(),
        };
        with_title.replace(CONTENT_PLACEHOLDER, content)
    }
}

//! The operator-curated list of corpus paths that become aggregate pages.

use crate::config::normalize_entry;
use std::io;
use std::path::Path;

/// Parsed whitelist: one corpus-relative path per entry, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    entries: Vec<String>,
}

impl Whitelist {
    /// Parse whitelist text. Blank lines and `#` comments are ignored.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| normalize_entry(line).to_string())
            .collect();
        Self { entries }
    }

    /// Read and parse a whitelist file. A missing file is an empty whitelist.
    pub fn load(path: &Path) -> io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No whitelist at {:?}; skipping aggregate pages", path);
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

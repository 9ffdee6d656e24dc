//! Page emitters: whitelisted aggregate pages and one page per document.
//!
//! Both emitters isolate failures per entry. A broken whitelist line or an
//! unreadable document is logged, recorded as a [`Diagnostic`], and the
//! remaining entries are still written.

pub mod aggregate;
pub mod pages;
pub mod template;

use crate::index::IndexError;
use crate::models::Diagnostic;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use aggregate::{AggregateEmitter, AGGREGATE_SEPARATOR};
pub use pages::{extract_title, PageEmitter};
pub use template::{PageTemplate, CONTENT_PLACEHOLDER, TITLE_PLACEHOLDER};

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Whitelist entry '{0}' has no aggregate configuration")]
    Unmapped(String),

    #[error("Template not found: {0:?}")]
    MissingTemplate(PathBuf),

    #[error("Whitelist target not found: {0:?}")]
    MissingTarget(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl EmitError {
    /// Diagnostic code for reports
    pub fn code(&self) -> &'static str {
        match self {
            EmitError::Unmapped(_) => "whitelist.unmapped",
            EmitError::MissingTemplate(_) => "template.missing",
            EmitError::MissingTarget(_) => "whitelist.missing-target",
            EmitError::Read { .. } => "io.read",
            EmitError::Write { .. } => "io.write",
            EmitError::Index(_) => "index.walk",
        }
    }

    /// Configuration problems are warnings; I/O failures are errors.
    pub fn to_diagnostic(&self, path: Option<PathBuf>) -> Diagnostic {
        match self {
            EmitError::Unmapped(_) | EmitError::MissingTemplate(_) | EmitError::MissingTarget(_) => {
                Diagnostic::warning(self.code(), self.to_string(), path)
            }
            _ => Diagnostic::error(self.code(), self.to_string(), path),
        }
    }
}

/// Load a template, mapping a missing file to [`EmitError::MissingTemplate`]
fn load_template(path: &Path) -> Result<PageTemplate, EmitError> {
    PageTemplate::load(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => EmitError::MissingTemplate(path.to_path_buf()),
        _ => EmitError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Write a page, creating parent directories as needed
fn write_page(path: &Path, html: &str) -> Result<(), EmitError> {
    let write_err = |source| EmitError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, html).map_err(write_err)
}

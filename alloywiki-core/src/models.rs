//! Content model structs for documents and build results.

use crate::slug::document_key;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extension of source documents
pub const DOCUMENT_EXTENSION: &str = "md";

/// Extension of emitted pages
pub const HTML_EXTENSION: &str = "html";

/// A single source document in the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Absolute (or config-resolved) path on disk
    pub path: PathBuf,

    /// Path relative to the corpus root
    pub rel_path: PathBuf,

    /// Wiki-link key derived from the file stem
    pub key: String,
}

impl Document {
    pub fn new(corpus_root: &Path, rel_path: impl Into<PathBuf>) -> Self {
        let rel_path = rel_path.into();
        let stem = rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path: corpus_root.join(&rel_path),
            key: document_key(&stem),
            rel_path,
        }
    }

    /// Output path relative to the output root: same directory, key as the
    /// file name, `.html` extension.
    pub fn output_rel_path(&self) -> PathBuf {
        self.rel_path
            .with_file_name(format!("{}.{}", self.key, HTML_EXTENSION))
    }

    /// File name of the source document
    pub fn file_name(&self) -> String {
        self.rel_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn read_to_string(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// Severity levels for build diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A non-fatal finding recorded during a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code, e.g. `aggregate.missing-template`
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,

    /// File the finding is about, if any
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    pub fn new(
        code: &str,
        severity: DiagnosticSeverity,
        message: impl Into<String>,
        path: Option<PathBuf>,
    ) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity,
            path,
        }
    }

    pub fn warning(code: &str, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::new(code, DiagnosticSeverity::Warning, message, path)
    }

    pub fn error(code: &str, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::new(code, DiagnosticSeverity::Error, message, path)
    }
}

/// Result of a full site build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Number of documents found by the corpus walk
    pub documents: usize,

    /// Every page written, aggregate pages first
    pub pages_written: Vec<PathBuf>,

    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    pub fn diagnostics_with_code<'a>(
        &'a self,
        code: &'a str,
    ) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn count(&self, severity: DiagnosticSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

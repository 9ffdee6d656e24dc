//! Aggregate pages: one whitelisted file or directory -> one HTML page.

use super::{load_template, write_page, EmitError};
use crate::config::{normalize_entry, Config};
use crate::index::{discover_documents, LinkIndex};
use crate::markdown::MarkdownProcessor;
use crate::models::{BuildReport, Document};
use std::path::{Path, PathBuf};

/// Separator between documents on a directory aggregate page
pub const AGGREGATE_SEPARATOR: &str = "\n<hr>\n";

pub struct AggregateEmitter<'a> {
    config: &'a Config,
    index: &'a LinkIndex,
    processor: &'a MarkdownProcessor,
}

impl<'a> AggregateEmitter<'a> {
    pub fn new(config: &'a Config, index: &'a LinkIndex, processor: &'a MarkdownProcessor) -> Self {
        Self {
            config,
            index,
            processor,
        }
    }

    /// Emit a page for every whitelist entry. Failures are recorded in the
    /// report and never stop the remaining entries.
    pub fn emit_all(&self, entries: &[String], report: &mut BuildReport) {
        for entry in entries {
            match self.emit_entry(entry) {
                Ok(path) => {
                    tracing::info!("Aggregate '{}' -> {:?}", entry, path);
                    report.pages_written.push(path);
                }
                Err(err) => {
                    tracing::warn!("Skipping whitelist entry '{}': {}", entry, err);
                    report
                        .diagnostics
                        .push(err.to_diagnostic(Some(PathBuf::from(entry))));
                }
            }
        }
    }

    /// Emit the page for one whitelist entry and return where it was written
    pub fn emit_entry(&self, entry: &str) -> Result<PathBuf, EmitError> {
        let aggregate = self
            .config
            .aggregate(entry)
            .ok_or_else(|| EmitError::Unmapped(entry.to_string()))?;

        let template_path = self.config.aggregate_template_path(aggregate);
        let corpus_root = self.config.corpus_dir();
        let target = corpus_root.join(normalize_entry(entry));

        let template = load_template(&template_path)?;
        if !target.exists() {
            return Err(EmitError::MissingTarget(target));
        }

        let html = self.combined_html(&corpus_root, &target)?;

        let output_path = self.config.aggregate_output_path(aggregate);
        write_page(&output_path, &template.render(None, &html))?;
        Ok(output_path)
    }

    /// Transformed HTML for a file, or every document of a directory in
    /// sorted path order joined by [`AGGREGATE_SEPARATOR`].
    fn combined_html(&self, corpus_root: &Path, target: &Path) -> Result<String, EmitError> {
        let documents = if target.is_dir() {
            let mut documents = discover_documents(corpus_root, target)?;
            documents.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
            documents
        } else {
            let rel = target.strip_prefix(corpus_root).unwrap_or(target);
            vec![Document::new(corpus_root, rel)]
        };

        let fragments = documents
            .iter()
            .map(|doc| self.transform(doc))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(fragments.join(AGGREGATE_SEPARATOR))
    }

    fn transform(&self, doc: &Document) -> Result<String, EmitError> {
        let raw = doc.read_to_string().map_err(|source| EmitError::Read {
            path: doc.path.clone(),
            source,
        })?;
        Ok(self.processor.convert(&raw, &doc.rel_path, self.index).html)
    }
}

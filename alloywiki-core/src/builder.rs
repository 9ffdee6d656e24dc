//! Site building logic - orchestrates indexing, transformation, and output.

use crate::{
    config::Config,
    emit::{AggregateEmitter, PageEmitter},
    index::{IndexError, LinkIndex},
    markdown::MarkdownProcessor,
    models::*,
    whitelist::Whitelist,
};
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Main site builder
pub struct SiteBuilder {
    config: Config,
    processor: MarkdownProcessor,
}

impl SiteBuilder {
    pub fn new(config: Config) -> Self {
        let processor = MarkdownProcessor::with_publish_boundary(config.publish_boundary.clone());
        Self { config, processor }
    }

    /// Build the entire site.
    ///
    /// The link index is complete before any document is transformed. Only
    /// a failed corpus walk or an unwritable output root aborts the build;
    /// everything else is recorded in the report.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let index = self.index()?;
        let mut report = BuildReport {
            documents: index.len(),
            diagnostics: index.diagnostics(),
            ..Default::default()
        };

        fs::create_dir_all(self.config.output_dir())?;

        match Whitelist::load(&self.config.whitelist_path()) {
            Ok(whitelist) if whitelist.is_empty() => {
                tracing::debug!("Whitelist is empty; no aggregate pages");
            }
            Ok(whitelist) => {
                AggregateEmitter::new(&self.config, &index, &self.processor)
                    .emit_all(whitelist.entries(), &mut report);
            }
            Err(err) => {
                let path = self.config.whitelist_path();
                tracing::error!("Failed to read whitelist {:?}: {}", path, err);
                report.diagnostics.push(Diagnostic::error(
                    "whitelist.unreadable",
                    format!("Failed to read whitelist: {err}"),
                    Some(path),
                ));
            }
        }

        PageEmitter::new(&self.config, &index, &self.processor).emit_all(&mut report);

        tracing::info!(
            "✓ Built {} pages from {} documents",
            report.pages_written.len(),
            report.documents
        );
        Ok(report)
    }

    /// Index and transform every document without writing anything.
    /// Reports key collisions and every wikilink that renders as a dead link.
    pub fn check(&self) -> Result<BuildReport, BuildError> {
        let index = self.index()?;
        let mut report = BuildReport {
            documents: index.len(),
            diagnostics: index.diagnostics(),
            ..Default::default()
        };

        for doc in index.documents() {
            let raw = match doc.read_to_string() {
                Ok(raw) => raw,
                Err(err) => {
                    report.diagnostics.push(Diagnostic::error(
                        "io.read",
                        format!("Failed to read document: {err}"),
                        Some(doc.rel_path.clone()),
                    ));
                    continue;
                }
            };

            let rendered = self.processor.convert(&raw, &doc.rel_path, &index);
            for target in rendered.unresolved {
                report.diagnostics.push(Diagnostic::new(
                    "link.unresolved",
                    DiagnosticSeverity::Info,
                    format!("[[{target}]] does not match any document"),
                    Some(doc.rel_path.clone()),
                ));
            }
        }

        Ok(report)
    }

    fn index(&self) -> Result<LinkIndex, BuildError> {
        let corpus = self.config.corpus_dir();
        tracing::info!("Indexing corpus {:?}", corpus);
        let index = LinkIndex::build(&corpus)?;
        if index.is_empty() {
            tracing::warn!("No documents found under {:?}", corpus);
        }
        Ok(index)
    }
}

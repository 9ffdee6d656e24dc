//! Per-document pages from the generic page template.

use super::{load_template, write_page, EmitError, PageTemplate};
use crate::config::Config;
use crate::index::LinkIndex;
use crate::markdown::MarkdownProcessor;
use crate::models::{BuildReport, Document};
use std::path::PathBuf;

pub struct PageEmitter<'a> {
    config: &'a Config,
    index: &'a LinkIndex,
    processor: &'a MarkdownProcessor,
}

impl<'a> PageEmitter<'a> {
    pub fn new(config: &'a Config, index: &'a LinkIndex, processor: &'a MarkdownProcessor) -> Self {
        Self {
            config,
            index,
            processor,
        }
    }

    /// Emit one page per indexed document, skipping the directory-index
    /// document and documents whose output page belongs to another source.
    /// A missing page template means no pages at all.
    pub fn emit_all(&self, report: &mut BuildReport) {
        let template_path = self.config.page_template_path();
        let template = match load_template(&template_path) {
            Ok(template) => template,
            Err(err) => {
                tracing::warn!("Skipping per-document pages: {}", err);
                report.diagnostics.push(err.to_diagnostic(Some(template_path)));
                return;
            }
        };
        tracing::debug!("Using page template {:?}", template.path());

        for doc in self.index.documents() {
            if doc.file_name() == self.config.index_document {
                tracing::debug!("Skipping directory index {:?}", doc.rel_path);
                continue;
            }
            if !self.index.owns_page(&doc.rel_path) {
                tracing::debug!("Skipping {:?}: output page taken", doc.rel_path);
                continue;
            }

            match self.emit_document(doc, &template) {
                Ok(path) => {
                    tracing::debug!("Rendered: {:?}", path);
                    report.pages_written.push(path);
                }
                Err(err) => {
                    tracing::error!("Failed to render {:?}: {}", doc.rel_path, err);
                    report
                        .diagnostics
                        .push(err.to_diagnostic(Some(doc.rel_path.clone())));
                }
            }
        }
    }

    /// Render one document into the page template and write it
    pub fn emit_document(&self, doc: &Document, template: &PageTemplate) -> Result<PathBuf, EmitError> {
        let raw = doc.read_to_string().map_err(|source| EmitError::Read {
            path: doc.path.clone(),
            source,
        })?;

        let rendered = self.processor.convert(&raw, &doc.rel_path, self.index);
        let title = extract_title(&raw);
        let html = template.render(Some(&title), &rendered.html);

        let output_rel = self
            .index
            .output_for(&doc.rel_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| doc.output_rel_path());
        let output_path = self.config.output_dir().join(output_rel);

        write_page(&output_path, &html)?;
        Ok(output_path)
    }
}

/// Title from the first line of the raw source: leading `#` markers and
/// surrounding whitespace removed. The first line is used even when it is
/// not a heading.
pub fn extract_title(raw: &str) -> String {
    raw.lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('#')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("# B Title\n\nbody"), "B Title");
        assert_eq!(extract_title("### Deep heading ###\n"), "Deep heading ###");
        assert_eq!(extract_title("  ## Indented\n"), "Indented");
        assert_eq!(extract_title("Plain first line\n# Heading"), "Plain first line");
        assert_eq!(extract_title(""), "");
        assert_eq!(extract_title("\n# Late heading"), "");
    }

    #[test]
    fn test_emit_all_mirrors_tree_and_skips_index() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let db = root.join("db");
        fs::create_dir_all(db.join("lauren/HOTG1")).unwrap();
        fs::write(db.join("index.md"), "# Home").unwrap();
        fs::write(db.join("lauren/HOTG1/HOTG1 VSM.md"), "# HOTG1 VSM\nCurie point [[index]]").unwrap();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::write(
            root.join("templates/page.html"),
            "<title>{{title}}</title>\n{{content}}",
        )
        .unwrap();

        let mut config = Config::new(&db, root.join("out"));
        config.paths.templates = root.join("templates");
        let index = LinkIndex::build(&db).unwrap();
        let processor = MarkdownProcessor::new();
        let mut report = BuildReport::default();

        PageEmitter::new(&config, &index, &processor).emit_all(&mut report);

        let page = root.join("out/lauren/HOTG1/HOTG1VSM.html");
        assert_eq!(report.pages_written, vec![page.clone()]);
        assert!(!root.join("out/index.html").exists());

        let html = fs::read_to_string(page).unwrap();
        assert!(html.starts_with("<title>HOTG1 VSM</title>\n"));
        assert!(html.contains(r#"<a href="../../index.html">index</a>"#));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_output_collision_writes_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let db = root.join("db");
        fs::create_dir_all(&db).unwrap();
        fs::write(db.join("Fe Co.md"), "spaced").unwrap();
        fs::write(db.join("FeCo.md"), "plain").unwrap();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::write(root.join("templates/page.html"), "{{content}}").unwrap();

        let mut config = Config::new(&db, root.join("out"));
        config.paths.templates = root.join("templates");
        let index = LinkIndex::build(&db).unwrap();
        let processor = MarkdownProcessor::new();
        let mut report = BuildReport::default();

        PageEmitter::new(&config, &index, &processor).emit_all(&mut report);

        let page = root.join("out/FeCo.html");
        assert_eq!(report.pages_written, vec![page.clone()]);
        assert_eq!(fs::read_to_string(page).unwrap(), "<p>plain</p>\n");
    }

    #[test]
    fn test_missing_page_template_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");
        fs::create_dir_all(&db).unwrap();
        fs::write(db.join("A.md"), "# A").unwrap();

        let mut config = Config::new(&db, dir.path().join("out"));
        config.paths.templates = dir.path().join("templates");
        let index = LinkIndex::build(&db).unwrap();
        let processor = MarkdownProcessor::new();
        let mut report = BuildReport::default();
        PageEmitter::new(&config, &index, &processor).emit_all(&mut report);

        assert!(report.pages_written.is_empty());
        assert_eq!(report.diagnostics_with_code("template.missing").count(), 1);
        assert!(!dir.path().join("out/A.html").exists());
    }
}

//! Link index: one eager corpus walk mapping document keys to output paths.
//!
//! The index is always complete before any document is transformed, so a
//! wiki-link can point at a document the walk reaches later.

use crate::models::{Diagnostic, Document, DOCUMENT_EXTENSION};
use crate::slug::{is_private_name, link_key};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to walk corpus: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{path:?} is outside of {root:?}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// Two documents whose names normalize to the same link key. The later one
/// in walk order owns the key; `shadowed` is unreachable through wiki-links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    pub key: String,
    pub kept: PathBuf,
    pub shadowed: PathBuf,
}

impl KeyCollision {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(
            "index.duplicate-key",
            format!(
                "Key '{}' of {:?} shadows {:?}; links resolve to the former",
                self.key, self.kept, self.shadowed
            ),
            Some(self.shadowed.clone()),
        )
    }
}

/// Two documents in one directory whose keys name the same output page,
/// e.g. `Fe Co.md` and `FeCo.md`. Only `kept` gets a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCollision {
    pub output: PathBuf,
    pub kept: PathBuf,
    pub skipped: PathBuf,
}

impl OutputCollision {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(
            "emit.output-collision",
            format!(
                "{:?} and {:?} both publish to {:?}; no page is written for the latter",
                self.kept, self.skipped, self.output
            ),
            Some(self.skipped.clone()),
        )
    }
}

/// Key -> output path and source path -> output path lookups
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    by_key: HashMap<String, PathBuf>,
    key_owner: HashMap<String, PathBuf>,
    by_source: HashMap<PathBuf, PathBuf>,
    page_owner: HashMap<PathBuf, PathBuf>,
    documents: Vec<Document>,
    collisions: Vec<KeyCollision>,
    output_collisions: Vec<OutputCollision>,
}

impl LinkIndex {
    /// Walk `corpus_root` and index every public document.
    pub fn build(corpus_root: &Path) -> Result<Self, IndexError> {
        let documents = discover_documents(corpus_root, corpus_root)?;
        tracing::info!("Indexed {} documents", documents.len());
        Ok(Self::from_documents(documents))
    }

    /// Index documents in the given order. The last writer wins both a link
    /// key and an output page.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        let mut index = Self::default();
        for doc in &documents {
            index.insert(doc);
        }
        index.documents = documents;
        index
    }

    fn insert(&mut self, doc: &Document) {
        let output = doc.output_rel_path();
        let key = link_key(&doc.key);

        if let Some(previous) = self.key_owner.insert(key.clone(), doc.rel_path.clone()) {
            tracing::warn!(
                "Duplicate key '{}': {:?} replaces {:?}",
                key,
                doc.rel_path,
                previous
            );
            self.collisions.push(KeyCollision {
                key: key.clone(),
                kept: doc.rel_path.clone(),
                shadowed: previous,
            });
        }

        if let Some(previous) = self.page_owner.insert(output.clone(), doc.rel_path.clone()) {
            tracing::warn!(
                "{:?} and {:?} both publish to {:?}",
                previous,
                doc.rel_path,
                output
            );
            self.output_collisions.push(OutputCollision {
                output: output.clone(),
                kept: doc.rel_path.clone(),
                skipped: previous,
            });
        }

        self.by_key.insert(key, output.clone());
        self.by_source.insert(doc.rel_path.clone(), output);
    }

    /// Output path for the document owning `key`. Matching ignores case.
    pub fn resolve(&self, key: &str) -> Option<&Path> {
        self.by_key.get(&link_key(key)).map(PathBuf::as_path)
    }

    /// Output path for a corpus-relative source path
    pub fn output_for(&self, source_rel: &Path) -> Option<&Path> {
        self.by_source.get(source_rel).map(PathBuf::as_path)
    }

    /// Whether the page at this source's output path is this source's own.
    /// False for documents that lost an [`OutputCollision`].
    pub fn owns_page(&self, source_rel: &Path) -> bool {
        self.output_for(source_rel)
            .and_then(|output| self.page_owner.get(output))
            .is_some_and(|owner| owner == source_rel)
    }

    /// Documents in walk order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }

    pub fn output_collisions(&self) -> &[OutputCollision] {
        &self.output_collisions
    }

    /// Diagnostics for every key and output collision
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collisions
            .iter()
            .map(KeyCollision::to_diagnostic)
            .chain(self.output_collisions.iter().map(OutputCollision::to_diagnostic))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Find every public markdown document under `dir`, with paths relative to
/// `corpus_root`. Private files and private directories are skipped; the
/// walk is sorted by file name so repeated runs see the same order.
pub fn discover_documents(corpus_root: &Path, dir: &Path) -> Result<Vec<Document>, IndexError> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_private_name(e.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().map_or(true, |ext| ext != DOCUMENT_EXTENSION) {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(corpus_root)
            .map_err(|_| IndexError::OutsideRoot {
                path: entry.path().to_path_buf(),
                root: corpus_root.to_path_buf(),
            })?;
        documents.push(Document::new(corpus_root, rel));
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# stub\n").unwrap();
    }

    #[test]
    fn test_build_indexes_public_markdown() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "A.md");
        touch(dir.path(), "lauren/HOTG1/HOTG1 Alloy.md");
        touch(dir.path(), "lauren/HOTG1/_scratch.md");
        touch(dir.path(), ".obsidian/workspace.md");
        touch(dir.path(), "_drafts/Secret.md");
        touch(dir.path(), "lauren/plot.png");

        let index = LinkIndex::build(dir.path()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve("A"), Some(Path::new("A.html")));
        assert_eq!(
            index.resolve("HOTG1Alloy"),
            Some(Path::new("lauren/HOTG1/HOTG1Alloy.html"))
        );
        assert_eq!(
            index.output_for(Path::new("lauren/HOTG1/HOTG1 Alloy.md")),
            Some(Path::new("lauren/HOTG1/HOTG1Alloy.html"))
        );
        assert!(index.resolve("scratch").is_none());
        assert!(index.resolve("Secret").is_none());
        assert!(index.resolve("workspace").is_none());
    }

    #[test]
    fn test_walk_order_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b/Two.md");
        touch(dir.path(), "a/One.md");
        touch(dir.path(), "C.md");

        let index = LinkIndex::build(dir.path()).unwrap();
        let rels: Vec<_> = index.documents().iter().map(|d| d.rel_path.clone()).collect();
        assert_eq!(
            rels,
            vec![
                PathBuf::from("C.md"),
                PathBuf::from("a/One.md"),
                PathBuf::from("b/Two.md"),
            ]
        );
    }

    #[test]
    fn test_key_collision_last_writer_wins() {
        let root = Path::new("/db");
        let index = LinkIndex::from_documents(vec![
            Document::new(root, "a/Fe Co.md"),
            Document::new(root, "b/FeCo.md"),
        ]);

        // Both sources stay addressable by path, only one owns the key.
        assert_eq!(index.resolve("FeCo"), Some(Path::new("b/FeCo.html")));
        assert_eq!(
            index.output_for(Path::new("a/Fe Co.md")),
            Some(Path::new("a/FeCo.html"))
        );
        assert!(index.owns_page(Path::new("a/Fe Co.md")));
        assert!(index.output_collisions().is_empty());
        assert_eq!(
            index.collisions(),
            [KeyCollision {
                key: "feco".to_string(),
                kept: PathBuf::from("b/FeCo.md"),
                shadowed: PathBuf::from("a/Fe Co.md"),
            }]
        );
        assert_eq!(
            index.collisions()[0].to_diagnostic().code,
            "index.duplicate-key"
        );
    }

    #[test]
    fn test_lookup_ignores_case() {
        let index = LinkIndex::from_documents(vec![Document::new(Path::new("/db"), "FeCo Alloy.md")]);
        assert_eq!(index.resolve("fecoalloy"), Some(Path::new("FeCoAlloy.html")));
        assert_eq!(index.resolve("FECOALLOY"), Some(Path::new("FeCoAlloy.html")));
    }

    #[test]
    fn test_same_directory_output_collision() {
        let root = Path::new("/db");
        let index = LinkIndex::from_documents(vec![
            Document::new(root, "Fe Co.md"),
            Document::new(root, "FeCo.md"),
        ]);

        assert!(!index.owns_page(Path::new("Fe Co.md")));
        assert!(index.owns_page(Path::new("FeCo.md")));
        assert_eq!(
            index.output_collisions(),
            [OutputCollision {
                output: PathBuf::from("FeCo.html"),
                kept: PathBuf::from("FeCo.md"),
                skipped: PathBuf::from("Fe Co.md"),
            }]
        );

        let codes: Vec<_> = index.diagnostics().into_iter().map(|d| d.code).collect();
        assert_eq!(codes, ["index.duplicate-key", "emit.output-collision"]);
    }

    #[test]
    fn test_case_variants_collide_on_key_only() {
        let root = Path::new("/db");
        let index = LinkIndex::from_documents(vec![
            Document::new(root, "a/feco.md"),
            Document::new(root, "b/FeCo.md"),
        ]);
        assert_eq!(index.resolve("FECO"), Some(Path::new("b/FeCo.html")));
        assert_eq!(index.collisions().len(), 1);
        assert!(index.owns_page(Path::new("a/feco.md")));
    }

    #[test]
    fn test_corpus_without_documents_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "plot.png");
        touch(dir.path(), "_drafts/Secret.md");

        let index = LinkIndex::build(dir.path()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_missing_corpus_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = LinkIndex::build(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, IndexError::Walk(_)));
    }
}

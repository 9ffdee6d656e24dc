//! Filename normalizer: strip spaces and apostrophes from document names.
//!
//! Wiki-link keys drop whitespace and punctuation, so a document named
//! `HOTG1 DSC.md` is linked as `[[HOTG1 DSC]]` but published as
//! `HOTG1DSC.html`. Renaming sources once keeps source and output names
//! aligned.

use crate::models::DOCUMENT_EXTENSION;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum RenameError {
    #[error("Failed to walk {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to rename {from:?} to {to:?}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// A planned or performed rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// New file name for a document whose name contains spaces, `None` when the
/// name needs no change.
pub fn normalized_file_name(name: &str) -> Option<String> {
    if !name.contains(' ') {
        return None;
    }
    let normalized: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | '\'' | '\u{2019}'))
        .collect();
    (normalized != name && !normalized.is_empty()).then_some(normalized)
}

/// Find every markdown document under `root` that needs renaming. Hidden
/// directories such as `.obsidian` or `.git` are not entered.
pub fn plan_renames(root: &Path) -> Result<Vec<Rename>, RenameError> {
    let mut renames = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry?;
        if !entry.file_type().is_file()
            || entry.path().extension().map_or(true, |ext| ext != DOCUMENT_EXTENSION)
        {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if let Some(new_name) = normalized_file_name(&name) {
            renames.push(Rename {
                from: entry.path().to_path_buf(),
                to: entry.path().with_file_name(new_name),
            });
        }
    }

    Ok(renames)
}

/// Outcome of a normalization run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameSummary {
    /// Renames performed, or planned under a dry run
    pub renamed: Vec<Rename>,

    /// Destination already exists
    pub skipped: Vec<Rename>,

    /// The filesystem refused the rename
    pub failed: Vec<Rename>,
}

/// Rename every document under `root` whose name contains spaces.
///
/// With `dry_run` nothing is touched and the summary lists what would
/// happen. Only a failed directory walk is an error.
pub fn normalize_names(root: &Path, dry_run: bool) -> Result<RenameSummary, RenameError> {
    let planned = plan_renames(root)?;
    if dry_run {
        let (skipped, renamed) = planned.into_iter().partition(|r| r.to.exists());
        return Ok(RenameSummary {
            renamed,
            skipped,
            failed: Vec::new(),
        });
    }
    Ok(apply_renames(planned))
}

/// Perform planned renames. An existing destination is never overwritten,
/// and one failed rename does not stop the rest.
pub fn apply_renames(planned: Vec<Rename>) -> RenameSummary {
    let mut summary = RenameSummary::default();

    for rename in planned {
        if rename.to.exists() {
            tracing::warn!(
                "Not renaming {:?}: {:?} already exists",
                rename.from,
                rename.to
            );
            summary.skipped.push(rename);
            continue;
        }

        match std::fs::rename(&rename.from, &rename.to) {
            Ok(()) => {
                tracing::info!("Renamed {:?} -> {:?}", rename.from, rename.to);
                summary.renamed.push(rename);
            }
            Err(source) => {
                let err = RenameError::Io {
                    from: rename.from.clone(),
                    to: rename.to.clone(),
                    source,
                };
                tracing::warn!("{}", err);
                summary.failed.push(rename);
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_normalized_file_name() {
        assert_eq!(
            normalized_file_name("HOTG1 DSC.md"),
            Some("HOTG1DSC.md".to_string())
        );
        assert_eq!(
            normalized_file_name("Lauren's alloy notes.md"),
            Some("Laurensalloynotes.md".to_string())
        );
        assert_eq!(
            normalized_file_name("Lauren\u{2019}s sheet.md"),
            Some("Laurenssheet.md".to_string())
        );
        assert_eq!(normalized_file_name("NoSpaces.md"), None);
        // Apostrophes alone don't trigger a rename
        assert_eq!(normalized_file_name("Lauren's.md"), None);
    }

    #[test]
    fn test_renames_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");
        fs::create_dir_all(db.join("HOTG 1")).unwrap();
        fs::create_dir_all(db.join(".obsidian")).unwrap();
        fs::write(db.join("HOTG 1/HOTG1 DSC.md"), "dsc").unwrap();
        fs::write(db.join("HOTG 1/plot 1.png"), "png").unwrap();
        fs::write(db.join(".obsidian/app settings.md"), "{}").unwrap();
        fs::write(db.join("Fine.md"), "fine").unwrap();

        let summary = normalize_names(&db, false).unwrap();

        assert_eq!(
            summary.renamed,
            vec![Rename {
                from: db.join("HOTG 1/HOTG1 DSC.md"),
                to: db.join("HOTG 1/HOTG1DSC.md"),
            }]
        );
        assert_eq!(fs::read_to_string(db.join("HOTG 1/HOTG1DSC.md")).unwrap(), "dsc");
        assert!(db.join("HOTG 1/plot 1.png").exists());
        assert!(db.join(".obsidian/app settings.md").exists());
        assert!(db.join("Fine.md").exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A B.md"), "x").unwrap();

        let planned = normalize_names(dir.path(), true).unwrap();
        assert_eq!(planned.renamed.len(), 1);
        assert!(dir.path().join("A B.md").exists());
        assert!(!dir.path().join("AB.md").exists());
    }

    #[test]
    fn test_existing_destination_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A B.md"), "spaced").unwrap();
        fs::write(dir.path().join("AB.md"), "original").unwrap();

        let summary = normalize_names(dir.path(), false).unwrap();
        assert!(summary.renamed.is_empty());
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(fs::read_to_string(dir.path().join("AB.md")).unwrap(), "original");
        assert!(dir.path().join("A B.md").exists());
    }

    #[test]
    fn test_failed_rename_does_not_stop_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A B.md"), "a").unwrap();
        fs::write(dir.path().join("C D.md"), "c").unwrap();

        let planned = plan_renames(dir.path()).unwrap();
        assert_eq!(planned.len(), 2);
        // Source vanishes between planning and renaming
        fs::remove_file(dir.path().join("A B.md")).unwrap();

        let summary = apply_renames(planned);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].from, dir.path().join("A B.md"));
        assert_eq!(summary.renamed.len(), 1);
        assert_eq!(fs::read_to_string(dir.path().join("CD.md")).unwrap(), "c");
    }
}

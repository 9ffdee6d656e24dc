//! Normalize-names command implementation.

use anyhow::{Context, Result};
use std::path::Path;

/// Rename documents whose names contain spaces, or list the plan with `dry_run`.
pub fn normalize_names(root: &Path, dry_run: bool) -> Result<()> {
    let summary = alloywiki_core::normalize_names(root, dry_run)
        .with_context(|| format!("Failed to normalize names under {:?}", root))?;

    if dry_run {
        for rename in &summary.renamed {
            println!("{} -> {}", rename.from.display(), rename.to.display());
        }
        println!("{} documents would be renamed", summary.renamed.len());
    } else {
        println!("✓ Renamed {} documents", summary.renamed.len());
    }

    if !summary.skipped.is_empty() {
        println!("{} skipped: destination exists", summary.skipped.len());
    }
    if !summary.failed.is_empty() {
        println!("{} failed:", summary.failed.len());
        for rename in &summary.failed {
            println!("  {}", rename.from.display());
        }
    }

    Ok(())
}

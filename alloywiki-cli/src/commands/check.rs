//! Check the corpus and print diagnostics without writing any output.

use alloywiki_core::{Config, DiagnosticSeverity, SiteBuilder};
use anyhow::{Context, Result};
use std::path::Path;

/// Index and transform every document, then list collisions and dead links.
pub fn check_site(config_path: &Path) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let report = SiteBuilder::new(config)
        .check()
        .context("Failed to check corpus")?;

    println!(
        "Check complete: {} documents, {} errors, {} warnings, {} info",
        report.documents,
        report.count(DiagnosticSeverity::Error),
        report.count(DiagnosticSeverity::Warning),
        report.count(DiagnosticSeverity::Info),
    );
    for diag in &report.diagnostics {
        let source = diag
            .path
            .as_deref()
            .map(|p| format!(" ({})", p.display()))
            .unwrap_or_default();
        println!(
            "- {:?} {}{}: {}",
            diag.severity, diag.code, source, diag.message
        );
    }

    Ok(())
}

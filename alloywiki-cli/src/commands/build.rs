//! Build command implementation.

use alloywiki_core::{Config, DiagnosticSeverity, SiteBuilder};
use anyhow::{Context, Result};
use std::path::Path;

/// Build the static site from the config at `config_path`
pub fn build_site(config_path: &Path) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let output_dir = config.output_dir();

    let report = SiteBuilder::new(config)
        .build()
        .context("Failed to build site")?;

    let warnings = report.count(DiagnosticSeverity::Warning);
    let errors = report.count(DiagnosticSeverity::Error);
    if warnings + errors > 0 {
        tracing::warn!(
            "Build finished with {} warnings and {} errors",
            warnings,
            errors
        );
    }
    tracing::info!("✓ Output written to {:?}", output_dir);

    Ok(())
}

//! Export alloy sample properties as JSON.

use alloywiki_core::{scan_samples, Config};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Scan the sample group named in the config and print or write the samples.
pub fn export_properties(config_path: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let samples = scan_samples(&config.corpus_dir(), &config.properties)
        .context("Failed to scan alloy samples")?;

    let json = if pretty {
        serde_json::to_string_pretty(&samples)?
    } else {
        serde_json::to_string(&samples)?
    };

    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("✓ Wrote {} samples to {:?}", samples.len(), path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

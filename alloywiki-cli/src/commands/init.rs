//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../scaffold/alloywiki.yml");
const DEFAULT_WHITELIST: &str = include_str!("../../scaffold/whitelist.txt");
const PAGE_TEMPLATE: &str = include_str!("../../scaffold/page.html");
const AGGREGATE_TEMPLATE: &str = include_str!("../../scaffold/aggregate.html");

/// Initialize a new alloywiki project. Existing files are never overwritten.
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_if_missing(&root.join("alloywiki.yml"), DEFAULT_CONFIG)?;
    write_if_missing(&root.join("whitelist.txt"), DEFAULT_WHITELIST)?;
    scaffold_templates(root)?;
    scaffold_corpus(root)?;

    println!("✓ alloywiki initialized in {:?}", root);
    println!("  - Put alloy sheets in db/ and link them with [[Wiki Links]]");
    println!("  - List aggregate pages in whitelist.txt and map them in alloywiki.yml");
    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{:?} already exists", path);
        return Ok(());
    }

    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Created {:?}", path);
    Ok(())
}

fn scaffold_templates(root: &Path) -> Result<()> {
    let templates = root.join("templates");
    fs::create_dir_all(&templates).with_context(|| format!("Failed to create {:?}", templates))?;

    write_if_missing(&templates.join("page.html"), PAGE_TEMPLATE)?;
    write_if_missing(&templates.join("aggregate.html"), AGGREGATE_TEMPLATE)?;
    Ok(())
}

fn scaffold_corpus(root: &Path) -> Result<()> {
    let samples = root.join("db").join("Samples");
    fs::create_dir_all(&samples).with_context(|| format!("Failed to create {:?}", samples))?;
    Ok(())
}

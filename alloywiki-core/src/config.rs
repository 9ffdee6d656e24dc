//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the alloywiki.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,

    /// Generic per-document template, relative to the templates directory
    #[serde(default = "default_page_template")]
    pub page_template: PathBuf,

    /// Directory-index document name; never emitted as its own page
    #[serde(default = "default_index_document")]
    pub index_document: String,

    /// Text at and after this marker is never published
    #[serde(default = "default_publish_boundary")]
    pub publish_boundary: String,

    /// Whitelist entry (corpus-relative path) -> aggregate page settings
    #[serde(default)]
    pub aggregates: BTreeMap<String, AggregateConfig>,

    /// Where `alloywiki properties` looks for sample sheets
    #[serde(default)]
    pub properties: PropertiesConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_page_template() -> PathBuf {
    PathBuf::from("page.html")
}

fn default_index_document() -> String {
    String::from("index.md")
}

fn default_publish_boundary() -> String {
    String::from("<!-- private -->")
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

fn default_whitelist() -> PathBuf {
    PathBuf::from("whitelist.txt")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub corpus: PathBuf,
    pub output: PathBuf,

    #[serde(default = "default_templates")]
    pub templates: PathBuf,

    #[serde(default = "default_whitelist")]
    pub whitelist: PathBuf,
}

/// Where a whitelisted file or directory gets published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Template path, relative to the templates directory
    pub template: PathBuf,

    /// Destination path, relative to the output directory
    pub output: PathBuf,
}

/// Sample sheets live under `<corpus>/<group>/<series_prefix>*/<n>/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertiesConfig {
    pub group: String,
    pub series_prefix: String,
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            group: String::from("lauren"),
            series_prefix: String::from("HOTG"),
        }
    }
}

impl Config {
    /// Build a configuration in memory with default settings
    pub fn new(corpus: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            paths: PathsConfig {
                corpus: corpus.into(),
                output: output.into(),
                templates: default_templates(),
                whitelist: default_whitelist(),
            },
            page_template: default_page_template(),
            index_document: default_index_document(),
            publish_boundary: default_publish_boundary(),
            aggregates: BTreeMap::new(),
            properties: PropertiesConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Get the corpus directory, resolved relative to config file
    pub fn corpus_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.corpus)
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Get the templates directory, resolved relative to config file
    pub fn templates_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.templates)
    }

    /// Get the whitelist file, resolved relative to config file
    pub fn whitelist_path(&self) -> PathBuf {
        self.resolve_path(&self.paths.whitelist)
    }

    /// Full path of the generic per-document template
    pub fn page_template_path(&self) -> PathBuf {
        self.templates_dir().join(&self.page_template)
    }

    /// Look up the aggregate settings for a whitelist entry
    pub fn aggregate(&self, entry: &str) -> Option<&AggregateConfig> {
        self.aggregates.get(normalize_entry(entry))
    }

    /// Full template path for an aggregate page
    pub fn aggregate_template_path(&self, aggregate: &AggregateConfig) -> PathBuf {
        self.templates_dir().join(&aggregate.template)
    }

    /// Full destination path for an aggregate page
    pub fn aggregate_output_path(&self, aggregate: &AggregateConfig) -> PathBuf {
        self.output_dir().join(&aggregate.output)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}

/// Whitelist entries and aggregate keys compare without surrounding
/// whitespace or trailing slashes.
pub fn normalize_entry(entry: &str) -> &str {
    entry.trim().trim_end_matches('/')
}

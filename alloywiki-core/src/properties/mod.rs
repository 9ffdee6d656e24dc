//! Alloy property extraction.
//!
//! Sample sheets live under `<corpus>/<group>/<series>*/<n>/` and are
//! named `<n>Alloy.md`, `<n>DSC.md`, `<n>Mechanical.md` and `<n>VSM.md`.
//! [`scan_samples`] reads each numbered sample directory into an
//! [`AlloySample`] for export as JSON.

mod extract;

pub use extract::{
    extractors, CompositionExtractor, DscExtractor, MechanicalExtractor, PropertyExtractor,
    VsmExtractor,
};

use crate::config::PropertiesConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PropertiesError {
    #[error("Failed to walk sample directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Properties of one alloy sample. Fields a sheet does not mention stay
/// `None` and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlloySample {
    /// `<series>_<n>`, e.g. `HOTG1_12`
    pub sample_id: String,

    /// Sample directory, relative to the corpus root
    pub folder_path: PathBuf,

    /// Element symbol -> amount
    pub composition: BTreeMap<String, f64>,

    pub primary_crystallization: Option<f64>,
    pub secondary_crystallization: Option<f64>,
    pub num_pinholes: Option<u32>,
    pub pinhole_area_percent: Option<f64>,
    pub curie_temperature: Option<f64>,
}

impl AlloySample {
    pub fn new(sample_id: impl Into<String>, folder_path: impl Into<PathBuf>) -> Self {
        Self {
            sample_id: sample_id.into(),
            folder_path: folder_path.into(),
            composition: BTreeMap::new(),
            primary_crystallization: None,
            secondary_crystallization: None,
            num_pinholes: None,
            pinhole_area_percent: None,
            curie_temperature: None,
        }
    }
}

/// Read every sample under `<corpus>/<group>`.
///
/// Series directories are visited in name order and samples in numeric
/// order. A sample without a composition is dropped. A missing group
/// directory yields no samples; unreadable sheets are logged and skipped.
pub fn scan_samples(
    corpus_root: &Path,
    config: &PropertiesConfig,
) -> Result<Vec<AlloySample>, PropertiesError> {
    let group = corpus_root.join(&config.group);
    if !group.is_dir() {
        tracing::warn!("Sample group {:?} not found", group);
        return Ok(Vec::new());
    }

    let extractors = extractors();
    let mut samples = Vec::new();

    for series in subdirectories(&group)? {
        let Some(series_name) = dir_name(&series) else {
            continue;
        };
        if !series_name.starts_with(&config.series_prefix) {
            continue;
        }
        tracing::debug!("Scanning series {}", series_name);

        let mut numbered: Vec<(u64, PathBuf)> = subdirectories(&series)?
            .into_iter()
            .filter_map(|dir| {
                let name = dir_name(&dir)?;
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                Some((name.parse::<u64>().ok()?, dir))
            })
            .collect();
        numbered.sort();

        for (_, dir) in numbered {
            if let Some(sample) = read_sample(corpus_root, &series_name, &dir, &extractors) {
                tracing::debug!("Parsed sample {}", sample.sample_id);
                samples.push(sample);
            }
        }
    }

    tracing::info!("Found {} alloy samples", samples.len());
    Ok(samples)
}

fn read_sample(
    corpus_root: &Path,
    series_name: &str,
    dir: &Path,
    extractors: &[Box<dyn PropertyExtractor>],
) -> Option<AlloySample> {
    let number = dir_name(dir)?;
    let folder_path = dir.strip_prefix(corpus_root).unwrap_or(dir);
    let mut sample = AlloySample::new(format!("{series_name}_{number}"), folder_path);

    for extractor in extractors {
        let sheet = dir.join(format!("{number}{}", extractor.suffix()));
        if !sheet.is_file() {
            continue;
        }
        match std::fs::read_to_string(&sheet) {
            Ok(content) => extractor.extract(&content, &mut sample),
            Err(err) => tracing::warn!("Failed to read {:?}: {}", sheet, err),
        }
    }

    if sample.composition.is_empty() {
        tracing::debug!("Skipping {}: no composition", sample.sample_id);
        return None;
    }
    Some(sample)
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, PropertiesError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

fn dir_name(dir: &Path) -> Option<String> {
    dir.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_scan_reads_every_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "lauren/HOTG1/1/1Alloy.md", "Chemical Formula: Co-Fe2.5Mn2Nb2\n");
        write(root, "lauren/HOTG1/1/1DSC.md", "Primary crystallization peak: 452.5 °C\n");
        write(root, "lauren/HOTG1/1/1Mechanical.md", "Number of pinholes: 3\n");
        write(root, "lauren/HOTG1/1/1VSM.md", "Curie temperature: 385 K\n");

        let samples = scan_samples(root, &PropertiesConfig::default()).unwrap();

        assert_eq!(samples.len(), 1);
        let sample = &samples[0];
        assert_eq!(sample.sample_id, "HOTG1_1");
        assert_eq!(sample.folder_path, PathBuf::from("lauren/HOTG1/1"));
        assert_eq!(sample.composition.get("Fe"), Some(&2.5));
        assert_eq!(sample.primary_crystallization, Some(452.5));
        assert_eq!(sample.secondary_crystallization, None);
        assert_eq!(sample.num_pinholes, Some(3));
        assert_eq!(sample.curie_temperature, Some(385.0));
    }

    #[test]
    fn test_scan_order_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "lauren/HOTG2/10/10Alloy.md", "Fe80B20");
        write(root, "lauren/HOTG2/9/9Alloy.md", "Co70Fe30");
        write(root, "lauren/HOTG1/3/3Alloy.md", "Composition: Ni50Ti50");
        // No composition
        write(root, "lauren/HOTG1/2/2DSC.md", "Primary peak 400 C");
        // Not numbered, not in a series, not in the group
        write(root, "lauren/HOTG1/notes/notesAlloy.md", "Fe80B20");
        write(root, "lauren/Misc/1/1Alloy.md", "Fe80B20");
        write(root, "other/HOTG3/1/1Alloy.md", "Fe80B20");

        let samples = scan_samples(root, &PropertiesConfig::default()).unwrap();
        let ids: Vec<_> = samples.iter().map(|s| s.sample_id.as_str()).collect();
        assert_eq!(ids, vec!["HOTG1_3", "HOTG2_9", "HOTG2_10"]);
    }

    #[test]
    fn test_missing_group_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let samples = scan_samples(dir.path(), &PropertiesConfig::default()).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_configured_group_and_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "samples/Run7/4/4Alloy.md", "Fe80B20");

        let config = PropertiesConfig {
            group: "samples".into(),
            series_prefix: "Run".into(),
        };
        let samples = scan_samples(dir.path(), &config).unwrap();
        assert_eq!(samples[0].sample_id, "Run7_4");
    }

    #[test]
    fn test_missing_fields_serialize_as_null() {
        let mut sample = AlloySample::new("HOTG1_1", "lauren/HOTG1/1");
        sample.composition.insert("Fe".into(), 80.0);

        let yaml = serde_yaml::to_string(&sample).unwrap();
        assert!(yaml.contains("curie_temperature: null"));
        assert!(yaml.contains("Fe: 80.0"));
    }
}

//! Per-file property extractors for alloy sample sheets.
//!
//! Each extractor reads one kind of sheet (`<n>Alloy.md`, `<n>DSC.md`,
//! `<n>Mechanical.md`, `<n>VSM.md`) line by line and fills in the fields it
//! owns. Extraction is heuristic and never fails: a line that does not
//! parse leaves the field untouched.

use super::AlloySample;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid property pattern"))
        .collect()
}

static FORMULA_FIELD_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)Chemical\s+Formula[:\s]+(.+)",
        r"(?i)Composition[:\s]+(.+)",
    ])
});

static FORMULA_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Chemical Formula|Composition)[:\s]*").expect("valid formula prefix")
});

static ELEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-z]?)(\d*\.?\d*)").expect("valid element regex"));

static DSC_TEMPERATURE_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(\d+\.?\d*)\s*°?c",
        r"(\d+\.?\d*)\s*k",
        r"peak[:\s]*(\d+\.?\d*)",
        r"temperature[:\s]*(\d+\.?\d*)",
    ])
});

static CURIE_TEMPERATURE_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(\d+\.?\d*)\s*°?c",
        r"(\d+\.?\d*)\s*k",
        r":\s*(\d+\.?\d*)",
        r"(\d+\.?\d*)",
    ])
});

static MEASUREMENT_RE: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"(\d+\.?\d*)\s*%", r":\s*(\d+\.?\d*)", r"(\d+\.?\d*)"]));

/// Reads one kind of sample sheet into an [`AlloySample`]
pub trait PropertyExtractor {
    /// File name suffix after the sample number, e.g. `DSC.md`
    fn suffix(&self) -> &'static str;

    fn extract(&self, content: &str, sample: &mut AlloySample);
}

/// Every extractor, in the order sheets are read
pub fn extractors() -> Vec<Box<dyn PropertyExtractor>> {
    vec![
        Box::new(CompositionExtractor),
        Box::new(DscExtractor),
        Box::new(MechanicalExtractor),
        Box::new(VsmExtractor),
    ]
}

/// First capture of the first pattern that yields a number
fn first_number(line: &str, patterns: &[Regex]) -> Option<f64> {
    patterns.iter().find_map(|re| {
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    })
}

/// Composition from `<n>Alloy.md`
pub struct CompositionExtractor;

impl CompositionExtractor {
    /// `Co-Fe2.5Mn2` -> {Co: 1, Fe: 2.5, Mn: 2}. A repeated element keeps
    /// its last amount.
    pub fn parse_formula(formula: &str) -> BTreeMap<String, f64> {
        let formula = FORMULA_PREFIX_RE.replace(formula.trim(), "");
        ELEMENT_RE
            .captures_iter(formula.trim())
            .map(|caps| {
                let amount = caps[2].parse::<f64>().unwrap_or(1.0);
                (caps[1].to_string(), amount)
            })
            .collect()
    }

    fn composition(content: &str) -> BTreeMap<String, f64> {
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for re in FORMULA_FIELD_RE.iter() {
                if let Some(caps) = re.captures(line) {
                    let composition = Self::parse_formula(&caps[1]);
                    if !composition.is_empty() {
                        return composition;
                    }
                }
            }

            let looks_like_formula = line.chars().any(char::is_uppercase)
                && line.chars().any(|c| c.is_ascii_digit());
            if looks_like_formula {
                let composition = Self::parse_formula(line);
                if !composition.is_empty() {
                    return composition;
                }
            }
        }
        BTreeMap::new()
    }
}

impl PropertyExtractor for CompositionExtractor {
    fn suffix(&self) -> &'static str {
        "Alloy.md"
    }

    fn extract(&self, content: &str, sample: &mut AlloySample) {
        sample.composition = Self::composition(content);
    }
}

/// Crystallization peaks from `<n>DSC.md`
pub struct DscExtractor;

impl DscExtractor {
    /// The temperature may sit on the heading line or on the two after it
    fn temperature(context: &[&str]) -> Option<f64> {
        context
            .iter()
            .find_map(|line| first_number(&line.to_lowercase(), &DSC_TEMPERATURE_RE))
    }
}

impl PropertyExtractor for DscExtractor {
    fn suffix(&self) -> &'static str {
        "DSC.md"
    }

    fn extract(&self, content: &str, sample: &mut AlloySample) {
        let lines: Vec<&str> = content.lines().collect();

        for (i, line) in lines.iter().enumerate() {
            let line = line.trim().to_lowercase();
            if !(line.contains("crystallization") || line.contains("peak")) {
                continue;
            }

            let context = &lines[i..(i + 3).min(lines.len())];
            if line.contains("primary") {
                if let Some(temp) = Self::temperature(context) {
                    sample.primary_crystallization = Some(temp);
                }
            } else if line.contains("secondary") {
                if let Some(temp) = Self::temperature(context) {
                    sample.secondary_crystallization = Some(temp);
                }
            }
        }
    }
}

/// Pinhole count and area from `<n>Mechanical.md`
pub struct MechanicalExtractor;

impl PropertyExtractor for MechanicalExtractor {
    fn suffix(&self) -> &'static str {
        "Mechanical.md"
    }

    fn extract(&self, content: &str, sample: &mut AlloySample) {
        for line in content.lines() {
            let line = line.trim().to_lowercase();
            if !line.contains("pinhole") {
                continue;
            }

            if line.contains("number") {
                if let Some(count) = first_number(&line, &MEASUREMENT_RE) {
                    sample.num_pinholes = Some(count as u32);
                }
            } else if line.contains("area") || line.contains('%') {
                if let Some(percent) = first_number(&line, &MEASUREMENT_RE) {
                    sample.pinhole_area_percent = Some(percent);
                }
            }
        }
    }
}

/// Curie temperature from `<n>VSM.md`; the first matching line wins
pub struct VsmExtractor;

impl PropertyExtractor for VsmExtractor {
    fn suffix(&self) -> &'static str {
        "VSM.md"
    }

    fn extract(&self, content: &str, sample: &mut AlloySample) {
        let curie = content
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| line.contains("curie") && line.contains("temp"))
            .find_map(|line| first_number(&line, &CURIE_TEMPERATURE_RE));

        if let Some(temp) = curie {
            sample.curie_temperature = Some(temp);
        }
    }
}

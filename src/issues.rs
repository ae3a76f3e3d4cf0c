//! Naming issues: volumes that dcm2niix disambiguated with a trailing letter
//! (`..._T1wa.nii.gz`) instead of a numeric run suffix.
//!
//! The issues file is the contract between detection and the rename planner:
//! ```json
//! { "issues": { "<subject>": { "<session>": { "<category>": [
//!     { "full_path": "...", "filename": "...", "suffix": "a", "base_name": "T1w" } ] } } },
//!   "stats": { ... } }
//! ```

use crate::mapping::CategoryMapping;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One letter-suffixed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFile {
    pub full_path: PathBuf,
    pub filename: String,
    /// Disambiguation letter, e.g. `a`.
    pub suffix: String,
    /// Naming token the letter is glued to, e.g. `T1w`.
    pub base_name: String,
}

/// subject -> session -> category -> files
pub type IssueMap = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<IssueFile>>>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStats {
    #[serde(default)]
    pub subjects: usize,
    #[serde(default)]
    pub sessions: usize,
    #[serde(default)]
    pub files: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuesFile {
    pub issues: IssueMap,
    #[serde(default)]
    pub stats: serde_json::Value,
}

impl IssuesFile {
    pub fn from_issues(issues: IssueMap) -> Self {
        let stats = IssueStats {
            subjects: issues.len(),
            sessions: issues.values().map(|s| s.len()).sum(),
            files: issues
                .values()
                .flat_map(|s| s.values())
                .flat_map(|c| c.values())
                .map(|f| f.len())
                .sum(),
        };
        Self {
            issues,
            stats: serde_json::to_value(stats).unwrap_or_default(),
        }
    }
}

/// Load and parse the issues file. Any read or parse problem is fatal to the caller.
pub fn load_issues(path: &Path) -> Result<IssuesFile> {
    if !path.exists() {
        return Err(anyhow!(
            "{} not found. Run `detect-naming` first.",
            path.display()
        ));
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read issues file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Malformed issues file {}", path.display()))
}

pub fn write_issues(path: &Path, issues: &IssuesFile) -> Result<()> {
    let json = serde_json::to_string_pretty(issues)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Last underscore token of every known suffix (`task-rest_bold` gives `bold`).
pub fn known_base_names(mapping: &CategoryMapping) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for suffix in mapping.known_suffixes() {
        let token = suffix.rsplit('_').next().unwrap_or(suffix);
        if !names.contains(&token) {
            names.push(token);
        }
    }
    names
}

/// Split a volume filename into stem and extension (`.nii.gz` or `.nii`).
pub fn split_volume_name(filename: &str) -> Option<(&str, &str)> {
    for ext in [".nii.gz", ".nii"] {
        if let Some(stem) = filename.strip_suffix(ext) {
            return Some((stem, ext));
        }
    }
    None
}

/// `sub-1_ses-2_T1wa.nii.gz` with base `T1w` gives `("T1w", "a")`.
fn letter_suffix<'a>(filename: &str, base_names: &[&'a str]) -> Option<(&'a str, char)> {
    let (stem, _) = split_volume_name(filename)?;
    let token = stem.rsplit('_').next()?;
    base_names.iter().find_map(|base| {
        let rest = token.strip_prefix(base)?;
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_lowercase() => Some((*base, letter)),
            _ => None,
        }
    })
}

/// Walk `sub-*/ses-*/<category>/` and collect letter-suffixed volumes.
pub fn detect_issues(output_root: &Path, mapping: &CategoryMapping) -> Result<IssueMap> {
    if !output_root.is_dir() {
        return Err(anyhow!("BIDS directory {} does not exist", output_root.display()));
    }
    let base_names = known_base_names(mapping);
    let mut issues = IssueMap::new();

    let walker = WalkDir::new(output_root)
        .min_depth(4)
        .max_depth(4)
        .sort_by_file_name();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().to_string();
        let Some((base, letter)) = letter_suffix(&filename, &base_names) else {
            continue;
        };

        let path = entry.path();
        let mut parts = path
            .strip_prefix(output_root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string());
        let (Some(subject), Some(session), Some(category)) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        if !subject.starts_with("sub-") || !session.starts_with("ses-") {
            continue;
        }

        issues
            .entry(subject)
            .or_default()
            .entry(session)
            .or_default()
            .entry(category)
            .or_default()
            .push(IssueFile {
                full_path: path.to_path_buf(),
                filename,
                suffix: letter.to_string(),
                base_name: base.to_string(),
            });
    }
    Ok(issues)
}

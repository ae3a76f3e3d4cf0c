//! Read-only file counts over a converted BIDS tree.

use anyhow::{anyhow, Result};
use colored::*;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

fn anat_token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_([A-Za-z0-9]+)\.nii\.gz$").expect("valid anat regex"))
}

#[derive(Debug, Default, Serialize)]
pub struct Census {
    pub root: PathBuf,
    /// Category directory name to `.nii.gz` count.
    pub categories: BTreeMap<String, usize>,
    /// Trailing filename token of anatomical volumes (`T1w`, `FLAIR`, `T1w_01` gives `01`).
    pub anat: BTreeMap<String, usize>,
}

impl Census {
    pub fn total(&self) -> usize {
        self.categories.values().sum()
    }

    pub fn anat_total(&self) -> usize {
        self.anat.values().sum()
    }

    /// Plain-text table, category counts first, then the anatomical breakdown.
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", "ADNI BIDS Dataset Modality Counts".bold());
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Dataset path: {}", self.root.display());
        let _ = writeln!(out);
        let _ = writeln!(out, "Overall Modality Counts:");
        let _ = writeln!(out, "{}", "-".repeat(30));
        for (category, count) in &self.categories {
            let _ = writeln!(out, "{:15}: {:6}", category, count);
        }
        let _ = writeln!(out, "{:15}: {:6}", "TOTAL", self.total());

        if !self.anat.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Anatomical Modality Breakdown:");
            let _ = writeln!(out, "{}", "-".repeat(35));
            for (token, count) in &self.anat {
                let _ = writeln!(out, "{:20}: {:6}", token, count);
            }
            let _ = writeln!(out, "{:20}: {:6}", "TOTAL anat", self.anat_total());
        }
        out
    }
}

fn child_dirs(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(prefix))
                .unwrap_or(false)
        })
        .collect();
    dirs.sort();
    dirs
}

/// Count `.nii.gz` volumes per category under `sub-*/ses-*/` (or `sub-*/` for
/// datasets without sessions).
pub fn count_modalities(root: &Path) -> Result<Census> {
    if !root.is_dir() {
        return Err(anyhow!("BIDS directory {} does not exist", root.display()));
    }

    let mut census = Census {
        root: root.to_path_buf(),
        ..Default::default()
    };

    for subject_dir in child_dirs(root, "sub-") {
        let session_dirs = child_dirs(&subject_dir, "ses-");
        if session_dirs.is_empty() {
            count_in_directory(&subject_dir, &mut census);
        } else {
            for session_dir in session_dirs {
                count_in_directory(&session_dir, &mut census);
            }
        }
    }
    Ok(census)
}

fn count_in_directory(dir: &Path, census: &mut Census) {
    for category_dir in child_dirs(dir, "") {
        let Some(category) = category_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        for entry in WalkDir::new(&category_dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy();
            if !filename.ends_with(".nii.gz") {
                continue;
            }
            *census.categories.entry(category.to_string()).or_default() += 1;

            if category == "anat" {
                if let Some(caps) = anat_token_pattern().captures(&filename) {
                    *census.anat.entry(caps[1].to_string()).or_default() += 1;
                }
            }
        }
    }
}

//! Subject and session discovery over the ADNI download layout.
//!
//! Expected structure:
//! ```text
//! dicom_root/
//! └── 027_S_6512/                       subject
//!     ├── MPRAGE/                       acquisition directory
//!     │   └── 2022-03-31_13_38_14.0/    timestamp directory
//!     └── Axial_DTI/
//!         └── 2022-03-31_14_02_51.0/
//! ```

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;
use tracing::debug;

fn subject_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{3}_S_\d{4}").expect("valid subject regex"))
}

fn timestamp_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})_\d{2}_\d{2}_\d{2}\.\d+").expect("valid timestamp regex")
    })
}

/// One acquisition captured on a session date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SessionEntry {
    pub acquisition: String,
    pub timestamp: String,
}

/// Session date (`YYYYMMDD`) to the acquisitions recorded that day.
pub type SessionMap = BTreeMap<String, Vec<SessionEntry>>;

pub fn is_subject_id(name: &str) -> bool {
    subject_pattern().is_match(name)
}

/// `2022-03-31_13_38_14.0` becomes `20220331`; anything else is `None`.
pub fn session_date(timestamp_dir: &str) -> Option<String> {
    let caps = timestamp_pattern().captures(timestamp_dir)?;
    Some(format!("{}{}{}", &caps[1], &caps[2], &caps[3]))
}

/// BIDS subject label: underscores dropped (`027_S_6512` -> `027S6512`).
pub fn bids_subject(subject_id: &str) -> String {
    subject_id.replace('_', "")
}

async fn list_dir_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Subject directories directly under `dicom_root`, sorted.
pub async fn discover_subjects(dicom_root: &Path) -> Result<Vec<String>> {
    let subjects: Vec<String> = list_dir_names(dicom_root)
        .await?
        .into_iter()
        .filter(|name| is_subject_id(name))
        .collect();

    for subject in &subjects {
        debug!(subject = %subject, "found subject");
    }
    Ok(subjects)
}

/// Acquisition directory names of one subject, sorted.
pub async fn list_acquisitions(subject_dir: &Path) -> Result<Vec<String>> {
    list_dir_names(subject_dir).await
}

/// Group a subject's timestamp directories by calendar date.
///
/// Directories that do not look like timestamps are ignored. A missing subject
/// directory yields an empty map.
pub async fn extract_sessions(subject_dir: &Path) -> Result<SessionMap> {
    let mut sessions = SessionMap::new();
    if !subject_dir.is_dir() {
        return Ok(sessions);
    }

    for acquisition in list_dir_names(subject_dir).await? {
        let acquisition_dir = subject_dir.join(&acquisition);
        for timestamp in list_dir_names(&acquisition_dir).await? {
            let Some(date) = session_date(&timestamp) else {
                continue;
            };
            debug!(session = %date, "{}/{}", acquisition, timestamp);
            sessions.entry(date).or_default().push(SessionEntry {
                acquisition: acquisition.clone(),
                timestamp,
            });
        }
    }

    for entries in sessions.values_mut() {
        entries.sort();
    }
    Ok(sessions)
}

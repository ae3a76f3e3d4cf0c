//! Ad-hoc look at the protocol tags of an acquisition, used when deciding how to
//! map a new directory name.

use anyhow::{Context, Result};
use dicom_object::open_file;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const NOT_FOUND: &str = "Not found";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProtocolTags {
    pub file: PathBuf,
    pub protocol_name: String,
    pub series_description: String,
    pub sequence_name: String,
    pub pulse_sequence_name: String,
}

/// First `.dcm` file below `dir` in file-name order.
pub fn first_dicom_file(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .find(|p| {
            p.extension()
                .map(|ext| ext.to_ascii_lowercase() == "dcm")
                .unwrap_or(false)
        })
}

/// Read ProtocolName, SeriesDescription, SequenceName and PulseSequenceName.
pub fn read_protocol_tags(path: &Path) -> Result<ProtocolTags> {
    let obj = open_file(path).context("Failed to open DICOM file")?;
    let text = |name: &str| -> String {
        obj.element_by_name(name)
            .ok()
            .and_then(|elem| elem.to_str().ok().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NOT_FOUND.to_string())
    };

    Ok(ProtocolTags {
        file: path.to_path_buf(),
        protocol_name: text("ProtocolName"),
        series_description: text("SeriesDescription"),
        sequence_name: text("SequenceName"),
        pulse_sequence_name: text("PulseSequenceName"),
    })
}

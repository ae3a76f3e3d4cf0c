//! dcm2niix integration for DICOM to NIfTI conversion.
//!
//! Each included acquisition is converted with one blocking dcm2niix call. Only the
//! exit code decides success; the files found afterwards are listed for the logs.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use walkdir::WalkDir;

/// Flags passed on every call: gzip output, BIDS sidecar, keep identifying fields.
pub const DCM2NIIX_FLAGS: &[&str] = &["-z", "y", "-b", "y", "-ba", "n"];

/// Result of a dcm2niix conversion operation.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Exit code was zero.
    pub success: bool,
    /// Paths to generated NIfTI files.
    pub nifti_files: Vec<PathBuf>,
    /// Paths to generated JSON sidecar files.
    pub json_files: Vec<PathBuf>,
    pub stdout: String,
    pub stderr: String,
    /// Error message if conversion failed.
    pub error: Option<String>,
    /// Time taken in milliseconds.
    pub elapsed_ms: u64,
}

/// Handle on the external converter executable.
#[derive(Debug, Clone)]
pub struct Dcm2niix {
    pub path: String,
    pub timeout: Option<Duration>,
}

impl Dcm2niix {
    pub fn new(path: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    /// Check if dcm2niix is available at the configured path.
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.path)
            .arg("-h")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Convert one acquisition directory.
    ///
    /// Runs `dcm2niix -z y -b y -ba n -f <base_name> -o <output_dir> <dicom_dir>`.
    /// `output_dir` must already exist. A timeout kills the child and is reported
    /// as a failed conversion, not as an `Err`.
    pub async fn convert(
        &self,
        dicom_dir: &Path,
        output_dir: &Path,
        base_name: &str,
    ) -> Result<ConversionResult> {
        let start = Instant::now();

        let mut command = Command::new(&self.path);
        command
            .args(DCM2NIIX_FLAGS)
            .arg("-f")
            .arg(base_name)
            .arg("-o")
            .arg(output_dir)
            .arg(dicom_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command
            .spawn()
            .with_context(|| format!("Failed to launch {}", self.path))?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output?,
                Err(_) => {
                    return Ok(ConversionResult {
                        success: false,
                        nifti_files: vec![],
                        json_files: vec![],
                        stdout: String::new(),
                        stderr: String::new(),
                        error: Some(format!("timed out after {}s", limit.as_secs())),
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    })
                }
            },
            None => child.wait_with_output().await?,
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            let (nifti_files, json_files) = find_output_files(output_dir, base_name).await?;
            Ok(ConversionResult {
                success: true,
                nifti_files,
                json_files,
                stdout,
                stderr,
                error: None,
                elapsed_ms,
            })
        } else {
            let error_msg = match output.status.code() {
                Some(code) => format!("dcm2niix exited with status {}", code),
                None => "dcm2niix terminated by signal".to_string(),
            };
            Ok(ConversionResult {
                success: false,
                nifti_files: vec![],
                json_files: vec![],
                stdout,
                stderr,
                error: Some(error_msg),
                elapsed_ms,
            })
        }
    }
}

fn is_nifti(filename: &str) -> bool {
    filename.ends_with(".nii.gz") || filename.ends_with(".nii")
}

/// Find NIfTI and JSON files matching the base name in the output directory.
///
/// dcm2niix may append suffixes like `_e1`, `_ph` or a disambiguating letter,
/// so any file starting with the base name counts.
async fn find_output_files(dir: &Path, base_name: &str) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut nifti_files = Vec::new();
    let mut json_files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let filename = path.file_name().unwrap_or_default().to_string_lossy();

        if filename.starts_with(base_name) {
            if is_nifti(&filename) {
                nifti_files.push(path);
            } else if filename.ends_with(".json") {
                json_files.push(path);
            }
        }
    }

    nifti_files.sort();
    json_files.sort();
    Ok((nifti_files, json_files))
}

/// Count DICOM files (`.dcm`, any case) below `dir`, recursively.
pub fn count_dicom_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.to_ascii_lowercase() == "dcm")
                .unwrap_or(false)
        })
        .count()
}

/// Find all NIfTI files (.nii, .nii.gz) directly inside a directory.
pub async fn find_nifti_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut nifti_files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let filename = path.file_name().unwrap_or_default().to_string_lossy();

        if is_nifti(&filename) {
            nifti_files.push(path);
        }
    }

    nifti_files.sort();
    Ok(nifti_files)
}

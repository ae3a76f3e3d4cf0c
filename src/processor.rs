//! Subject-by-subject conversion of the ADNI tree into BIDS.
//!
//! Sessions run in ascending date order and acquisitions one at a time. A failed
//! acquisition marks its session and subject failed but never stops the siblings;
//! a failed subject never stops the batch.

use crate::converter::{count_dicom_files, find_nifti_files, Dcm2niix};
use crate::logging::SubjectLog;
use crate::mapping::{Category, CategoryMapping, Classification, MatchKind};
use crate::sessions::{bids_subject, discover_subjects, extract_sessions, list_acquisitions, SessionEntry};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, warn, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AcquisitionStatus {
    Converted,
    Excluded,
    Skipped,
    Failed,
}

/// Overall outcome of one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SubjectStatus {
    Success,
    /// Some acquisitions converted, some failed.
    Partial,
    #[default]
    Failed,
}

impl std::fmt::Display for SubjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SubjectStatus::Success => "Success",
            SubjectStatus::Partial => "Partial",
            SubjectStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// What happened to one (acquisition, timestamp) pair.
#[derive(Debug, Clone, Serialize)]
pub struct AcquisitionOutcome {
    pub acquisition: String,
    pub timestamp: String,
    pub category: Option<Category>,
    pub suffix: Option<String>,
    pub status: AcquisitionStatus,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub session_date: String,
    pub success: bool,
    pub acquisitions: Vec<AcquisitionOutcome>,
}

impl SessionOutcome {
    fn count(&self, status: AcquisitionStatus) -> usize {
        self.acquisitions.iter().filter(|a| a.status == status).count()
    }
}

#[derive(Serialize, Default, Debug, Clone)]
pub struct SubjectResult {
    pub subject: String,
    pub status: SubjectStatus,
    pub reason: Vec<String>,
    pub sessions: Vec<String>,
    pub converted: usize,
    pub skipped: usize,
    pub excluded: usize,
    pub failed: usize,
    pub timestamp: DateTime<Utc>,
}

impl SubjectResult {
    pub fn succeeded(&self) -> bool {
        self.status == SubjectStatus::Success
    }
}

/// One row of the acquisition-directory index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub acquisition: String,
    pub subjects: usize,
    pub classification: String,
    pub recognized: bool,
    pub excluded: bool,
}

/// Drives the conversion of one DICOM root into one BIDS output root.
pub struct BidsConverter {
    pub dicom_root: PathBuf,
    pub output_root: PathBuf,
    pub dcm2niix: Dcm2niix,
    pub logs_dir: Option<PathBuf>,
    mapping: &'static CategoryMapping,
}

impl BidsConverter {
    /// Fails only if the output root cannot be created.
    pub fn new(
        dicom_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        dcm2niix: Dcm2niix,
        logs_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let output_root = output_root.into();
        std::fs::create_dir_all(&output_root)
            .with_context(|| format!("Failed to create output root {}", output_root.display()))?;
        Ok(Self {
            dicom_root: dicom_root.into(),
            output_root,
            dcm2niix,
            logs_dir,
            mapping: CategoryMapping::builtin(),
        })
    }

    pub async fn discover_subjects(&self) -> Result<Vec<String>> {
        if !self.dicom_root.is_dir() {
            return Err(anyhow!(
                "DICOM root directory does not exist: {}",
                self.dicom_root.display()
            ));
        }
        let subjects = discover_subjects(&self.dicom_root).await?;
        info!("Discovered {} subjects", subjects.len());
        Ok(subjects)
    }

    /// Count, per acquisition-directory name, the subjects that have it.
    ///
    /// Sorted by descending count, then name.
    pub async fn acquisition_index(&self, subjects: &[String]) -> Result<Vec<IndexEntry>> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for subject in subjects {
            let subject_dir = self.dicom_root.join(subject);
            if !subject_dir.is_dir() {
                continue;
            }
            for acquisition in list_acquisitions(&subject_dir).await? {
                *counts.entry(acquisition).or_default() += 1;
            }
        }

        let mut entries: Vec<IndexEntry> = counts
            .into_iter()
            .map(|(acquisition, subjects)| {
                let classification = self.mapping.classify(&acquisition);
                let (label, excluded) = match classification.target() {
                    Some((category, suffix)) => (format!("{}/{}", category, suffix), false),
                    None => ("excluded".to_string(), true),
                };
                IndexEntry {
                    recognized: classification.is_recognized(),
                    acquisition,
                    subjects,
                    classification: label,
                    excluded,
                }
            })
            .collect();
        entries.sort_by(|a, b| b.subjects.cmp(&a.subjects).then(a.acquisition.cmp(&b.acquisition)));
        Ok(entries)
    }

    /// Convert every subject in order; one subject's error never stops the rest.
    pub async fn convert_all(&self, subjects: &[String]) -> Vec<SubjectResult> {
        info!("Starting conversion of {} subjects", subjects.len());
        let pb = setup_progress_bar(subjects.len() as u64);

        let mut results = Vec::with_capacity(subjects.len());
        for subject in subjects {
            pb.set_message(subject.clone());
            let result = self.convert_subject(subject).await;
            if !result.succeeded() {
                pb.println(format!("{} {}: {}", "✗".red(), subject, result.reason.join("; ")));
            }
            results.push(result);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let ok = results.iter().filter(|r| r.succeeded()).count();
        info!("Conversion complete: {}/{} subjects successful", ok, results.len());
        if ok < results.len() {
            let failed: Vec<&str> = results
                .iter()
                .filter(|r| !r.succeeded())
                .map(|r| r.subject.as_str())
                .collect();
            warn!("Failed subjects: {:?}", failed);
        }
        results
    }

    /// Convert one subject, turning any error into a failed result.
    pub async fn convert_subject(&self, subject_id: &str) -> SubjectResult {
        let mut res = SubjectResult {
            subject: subject_id.to_string(),
            timestamp: Utc::now(),
            ..Default::default()
        };

        let span = info_span!("subject", subject = %subject_id);
        let outcome = self.convert_subject_inner(subject_id, &mut res).instrument(span).await;
        if let Err(e) = outcome {
            error!(subject = %subject_id, "Failed to convert subject: {:#}", e);
            res.reason.push(format!("{:#}", e));
            res.status = SubjectStatus::Failed;
            return res;
        }

        res.status = summarize_status(res.converted, &res.reason);
        res
    }

    async fn convert_subject_inner(&self, subject_id: &str, res: &mut SubjectResult) -> Result<()> {
        info!("Starting conversion for subject {}", subject_id);
        let mut log = match &self.logs_dir {
            Some(dir) => SubjectLog::create(dir, subject_id)?,
            None => SubjectLog::disabled(),
        };
        if let Some(path) = log.path() {
            debug!("Subject report: {}", path.display());
        }
        log.info(format!(
            "=== ADNI2BIDS Conversion Report for Subject {} ===",
            subject_id
        ));

        let sessions = extract_sessions(&self.dicom_root.join(subject_id)).await?;
        if sessions.is_empty() {
            warn!("No sessions found for subject {}", subject_id);
            log.error(format!("No sessions found for subject {}", subject_id));
            return Err(anyhow!("No sessions found"));
        }

        let dates: Vec<String> = sessions.keys().cloned().collect();
        info!("Subject {} has {} unique sessions: {:?}", subject_id, dates.len(), dates);
        log.info(format!("Subject ID: {}", subject_id));
        log.info(format!("BIDS Subject: sub-{}", bids_subject(subject_id)));
        log.info(format!("Total Sessions Found: {}", dates.len()));
        log.info(format!("Session Dates: {:?}", dates));
        log.blank();
        res.sessions = dates;

        let mut converted_sessions = BTreeMap::new();
        for (date, entries) in &sessions {
            log.info(format!("--- Converting Session: ses-{} ---", date));
            let outcome = self
                .convert_session(subject_id, date, entries, &mut log)
                .instrument(info_span!("session", session = %date))
                .await;

            res.converted += outcome.count(AcquisitionStatus::Converted);
            res.skipped += outcome.count(AcquisitionStatus::Skipped);
            res.excluded += outcome.count(AcquisitionStatus::Excluded);
            res.failed += outcome.count(AcquisitionStatus::Failed);

            if outcome.success {
                let files = self.converted_files(subject_id, date).await;
                log.info(format!("Session ses-{} converted successfully", date));
                log.info(format!("Modalities: {:?}", files.keys().collect::<Vec<_>>()));
                converted_sessions.insert(date.clone(), files);
            } else {
                log.error(format!("Session ses-{} conversion FAILED", date));
                for failed in outcome
                    .acquisitions
                    .iter()
                    .filter(|a| a.status == AcquisitionStatus::Failed)
                {
                    res.reason.push(format!(
                        "ses-{} {}/{}: {}",
                        date,
                        failed.acquisition,
                        failed.timestamp,
                        failed.detail.as_deref().unwrap_or("failed")
                    ));
                }
            }
            log.blank();
        }

        log.info("=== CONVERSION SUMMARY ===");
        log.info(format!("Subject: {}", subject_id));
        log.info(format!("Total Sessions: {}", sessions.len()));
        log.info(format!("Successfully Converted Sessions: {}", converted_sessions.len()));
        for (date, categories) in &converted_sessions {
            log.info(format!("  ses-{}:", date));
            for (category, files) in categories {
                log.info(format!("    {}: {} files", category, files.len()));
            }
        }
        if res.reason.is_empty() {
            log.info("✅ CONVERSION SUCCESSFUL");
        } else {
            log.error("❌ CONVERSION FAILED");
        }
        Ok(())
    }

    /// Convert all acquisitions of one session.
    pub async fn convert_session(
        &self,
        subject_id: &str,
        session_date: &str,
        entries: &[SessionEntry],
        log: &mut SubjectLog,
    ) -> SessionOutcome {
        info!("Converting {} ses-{}", subject_id, session_date);
        let mut acquisitions = Vec::with_capacity(entries.len());

        for entry in entries {
            let outcome = match self.convert_acquisition(subject_id, session_date, entry, log).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(
                        "Error converting {}/{}: {:#}",
                        entry.acquisition, entry.timestamp, e
                    );
                    log.error(format!("    ❌ FAILED: {} ({:#})", entry.acquisition, e));
                    AcquisitionOutcome {
                        acquisition: entry.acquisition.clone(),
                        timestamp: entry.timestamp.clone(),
                        category: None,
                        suffix: None,
                        status: AcquisitionStatus::Failed,
                        detail: Some(format!("{:#}", e)),
                    }
                }
            };
            acquisitions.push(outcome);
        }

        let outcome = SessionOutcome {
            session_date: session_date.to_string(),
            success: !acquisitions.iter().any(|a| a.status == AcquisitionStatus::Failed),
            acquisitions,
        };
        info!(
            "Session ses-{} conversion complete: {} acquisitions converted",
            session_date,
            outcome.count(AcquisitionStatus::Converted)
        );
        outcome
    }

    async fn convert_acquisition(
        &self,
        subject_id: &str,
        session_date: &str,
        entry: &SessionEntry,
        log: &mut SubjectLog,
    ) -> Result<AcquisitionOutcome> {
        let mut outcome = AcquisitionOutcome {
            acquisition: entry.acquisition.clone(),
            timestamp: entry.timestamp.clone(),
            category: None,
            suffix: None,
            status: AcquisitionStatus::Excluded,
            detail: None,
        };

        let classification = self.mapping.classify(&entry.acquisition);
        if let Some(advisory) = classification.advisory() {
            warn!("{}", advisory);
        }
        if let Classification::Included {
            matched: MatchKind::Substring(key),
            ..
        } = &classification
        {
            info!("  {} matched table entry {} by substring", entry.acquisition, key);
        }
        let (category, suffix) = match classification {
            Classification::Excluded => {
                info!("  Skipping excluded acquisition: {}", entry.acquisition);
                log.info(format!("    Skipped (excluded): {}", entry.acquisition));
                return Ok(outcome);
            }
            Classification::Included {
                category, suffix, ..
            } => (category, suffix),
        };
        outcome.category = Some(category);
        outcome.suffix = Some(suffix.to_string());

        let source = self
            .dicom_root
            .join(subject_id)
            .join(&entry.acquisition)
            .join(&entry.timestamp);
        if !source.is_dir() {
            return Err(anyhow!("DICOM source does not exist: {}", source.display()));
        }

        let dicom_count = count_dicom_files(&source);
        if dicom_count == 0 {
            warn!("No DICOM files found in {}", source.display());
            log.info(format!("    Skipped (no DICOMs): {}", entry.acquisition));
            outcome.status = AcquisitionStatus::Skipped;
            outcome.detail = Some("no DICOM files".into());
            return Ok(outcome);
        }

        let target_dir = category_dir(&self.output_root, subject_id, session_date, category);
        tokio::fs::create_dir_all(&target_dir)
            .await
            .with_context(|| format!("Failed to create {}", target_dir.display()))?;
        let base_name = output_base_name(subject_id, session_date, suffix);

        info!(
            "  Converting {} DICOMs from {}/{}",
            dicom_count, entry.acquisition, entry.timestamp
        );
        let result = self.dcm2niix.convert(&source, &target_dir, &base_name).await?;

        if result.success {
            info!(
                "  ✅ Successfully converted {} -> {}/{} ({} ms)",
                entry.acquisition, category, suffix, result.elapsed_ms
            );
            debug!("  outputs: {:?} {:?}", result.nifti_files, result.json_files);
            log.info(format!(
                "    ✅ {} -> {}/{} ({} DICOMs)",
                entry.acquisition, category, suffix, dicom_count
            ));
            outcome.status = AcquisitionStatus::Converted;
        } else {
            let reason = result.error.unwrap_or_else(|| "dcm2niix failed".into());
            error!("  ❌ dcm2niix failed for {}: {}", entry.acquisition, reason);
            error!("     stdout: {}", result.stdout);
            error!("     stderr: {}", result.stderr);
            log.error(format!(
                "    ❌ FAILED: {} -> {}/{}",
                entry.acquisition, category, suffix
            ));
            log.error(format!("       Error: {}", result.stderr.trim()));
            outcome.status = AcquisitionStatus::Failed;
            outcome.detail = Some(reason);
        }
        Ok(outcome)
    }

    /// NIfTI files per category already present for a session.
    async fn converted_files(&self, subject_id: &str, session_date: &str) -> BTreeMap<String, Vec<String>> {
        let session_dir = self
            .output_root
            .join(format!("sub-{}", bids_subject(subject_id)))
            .join(format!("ses-{}", session_date));

        let mut categories = BTreeMap::new();
        let Ok(mut entries) = tokio::fs::read_dir(&session_dir).await else {
            return categories;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let files: Vec<String> = find_nifti_files(&path)
                .await
                .unwrap_or_default()
                .iter()
                .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
                .collect();
            if !files.is_empty() {
                categories.insert(entry.file_name().to_string_lossy().to_string(), files);
            }
        }
        categories
    }
}

/// `{root}/sub-{subject}/ses-{date}/{category}`
pub fn category_dir(output_root: &Path, subject_id: &str, session_date: &str, category: Category) -> PathBuf {
    output_root
        .join(format!("sub-{}", bids_subject(subject_id)))
        .join(format!("ses-{}", session_date))
        .join(category.as_str())
}

/// `sub-{subject}_ses-{date}_{suffix}`, without extension.
pub fn output_base_name(subject_id: &str, session_date: &str, suffix: &str) -> String {
    format!("sub-{}_ses-{}_{}", bids_subject(subject_id), session_date, suffix)
}

fn setup_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

pub fn summarize_status(converted: usize, reasons: &[String]) -> SubjectStatus {
    if reasons.is_empty() {
        SubjectStatus::Success
    } else if converted > 0 {
        SubjectStatus::Partial
    } else {
        SubjectStatus::Failed
    }
}

pub fn write_reports(csv_path: &Path, json_path: &Path, results: &[SubjectResult]) -> Result<()> {
    write_csv_report(csv_path, results)?;
    write_json_report(json_path, results)?;
    Ok(())
}

fn write_json_report(path: &Path, results: &[SubjectResult]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, results)?;
    Ok(())
}

fn write_csv_report(path: &Path, results: &[SubjectResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["Subject", "Status", "Reason", "Sessions", "Converted", "Skipped", "Excluded", "Failed", "Timestamp"])?;
    for r in results {
        wtr.write_record([
            &r.subject,
            &r.status.to_string(),
            &r.reason.join("; "),
            &r.sessions.join(" "),
            &r.converted.to_string(),
            &r.skipped.to_string(),
            &r.excluded.to_string(),
            &r.failed.to_string(),
            &r.timestamp.to_rfc3339(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn dicom_tree(entries: &[(&str, &str, &str, bool)]) -> TempDir {
        let tmp = tempdir().unwrap();
        for (subject, acquisition, timestamp, with_files) in entries {
            let dir = tmp.path().join("dicom").join(subject).join(acquisition).join(timestamp);
            fs::create_dir_all(&dir).unwrap();
            if *with_files {
                fs::write(dir.join("IM0001.dcm"), b"").unwrap();
            }
        }
        tmp
    }

    fn converter(tmp: &TempDir, exe: &str) -> BidsConverter {
        BidsConverter::new(
            tmp.path().join("dicom"),
            tmp.path().join("bids"),
            Dcm2niix::new(exe, None),
            Some(tmp.path().join("logs")),
        )
        .unwrap()
    }

    #[test]
    fn test_output_naming() {
        assert_eq!(
            output_base_name("027_S_6512", "20220331", "T1w"),
            "sub-027S6512_ses-20220331_T1w"
        );
        assert_eq!(
            category_dir(Path::new("/out"), "027_S_6512", "20220331", Category::Anat),
            PathBuf::from("/out/sub-027S6512/ses-20220331/anat")
        );
    }

    #[test]
    fn test_summarize_status() {
        assert_eq!(summarize_status(0, &[]), SubjectStatus::Success);
        assert_eq!(summarize_status(2, &["x".into()]), SubjectStatus::Partial);
        assert_eq!(summarize_status(0, &["x".into()]), SubjectStatus::Failed);
        assert_eq!(SubjectStatus::Partial.to_string(), "Partial");

        let partial = SubjectResult {
            status: summarize_status(1, &["x".into()]),
            ..Default::default()
        };
        assert!(!partial.succeeded());
        assert_eq!(serde_json::to_value(partial.status).unwrap(), "Partial");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_subject_converts_with_exclusions_and_skips() {
        let tmp = dicom_tree(&[
            ("027_S_6512", "MPRAGE", "2022-03-31_13_38_14.0", true),
            ("027_S_6512", "AAHead_Scout", "2022-03-31_13_30_00.0", true),
            ("027_S_6512", "Axial_DTI", "2022-03-31_14_00_00.0", false),
        ]);
        let conv = converter(&tmp, "true");

        let res = conv.convert_subject("027_S_6512").await;
        assert!(res.succeeded(), "{:?}", res.reason);
        assert_eq!(res.sessions, vec!["20220331"]);
        assert_eq!((res.converted, res.excluded, res.skipped, res.failed), (1, 1, 1, 0));
        assert!(tmp.path().join("bids/sub-027S6512/ses-20220331/anat").is_dir());
        assert!(!tmp.path().join("bids/sub-027S6512/ses-20220331/dwi").exists());
        assert!(tmp.path().join("logs/027_S_6512_conversion.log").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_acquisition_does_not_stop_session() {
        let tmp = dicom_tree(&[
            ("027_S_6512", "MPRAGE", "2022-03-31_13_38_14.0", true),
            ("027_S_6512", "Axial_DTI", "2022-03-31_14_00_00.0", true),
        ]);
        let conv = converter(&tmp, "false");

        let sessions = extract_sessions(&tmp.path().join("dicom/027_S_6512")).await.unwrap();
        let mut log = SubjectLog::disabled();
        let outcome = conv
            .convert_session("027_S_6512", "20220331", &sessions["20220331"], &mut log)
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.acquisitions.len(), 2);
        assert!(outcome
            .acquisitions
            .iter()
            .all(|a| a.status == AcquisitionStatus::Failed));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_batch_continues_past_failed_subjects() {
        let tmp = dicom_tree(&[
            ("027_S_6512", "MPRAGE", "2022-03-31_13_38_14.0", true),
            ("130_S_0002", "MPRAGE", "not-a-session", true),
        ]);
        let conv = converter(&tmp, "true");

        let subjects = conv.discover_subjects().await.unwrap();
        let results = conv.convert_all(&subjects).await;
        assert_eq!(results.len(), 2);
        assert!(results[0].succeeded());
        assert!(!results[1].succeeded());
        assert_eq!(results[1].reason, vec!["No sessions found"]);

        let csv_path = tmp.path().join("report.csv");
        let json_path = tmp.path().join("report.json");
        write_reports(&csv_path, &json_path, &results).unwrap();
        let csv_text = fs::read_to_string(csv_path).unwrap();
        assert_eq!(csv_text.lines().count(), 3);
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(json[1]["status"], "Failed");
    }

    #[tokio::test]
    async fn test_acquisition_index_counts_subjects() {
        let tmp = dicom_tree(&[
            ("027_S_6512", "MPRAGE", "2022-03-31_13_38_14.0", false),
            ("027_S_6512", "Mystery_Scan", "2022-03-31_13_38_14.0", false),
            ("130_S_0002", "MPRAGE", "2021-01-01_10_00_00.0", false),
            ("130_S_0002", "AAHead_Scout", "2021-01-01_10_00_00.0", false),
        ]);
        let conv = converter(&tmp, "true");
        let subjects = conv.discover_subjects().await.unwrap();

        let index = conv.acquisition_index(&subjects).await.unwrap();
        assert_eq!(index[0].acquisition, "MPRAGE");
        assert_eq!(index[0].subjects, 2);
        assert_eq!(index[0].classification, "anat/T1w");
        let scout = index.iter().find(|e| e.acquisition == "AAHead_Scout").unwrap();
        assert!(scout.excluded);
        let mystery = index.iter().find(|e| e.acquisition == "Mystery_Scan").unwrap();
        assert!(!mystery.recognized);
        assert_eq!(mystery.classification, "other/unknown");
    }

    #[tokio::test]
    async fn test_missing_dicom_root_is_an_error() {
        let tmp = tempdir().unwrap();
        let conv = converter(&tmp, "true");
        assert!(conv.discover_subjects().await.is_err());
    }
}

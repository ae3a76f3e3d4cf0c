//! Rename planning for letter-suffixed runs.
//!
//! Every (subject, session, category, base name) group is renumbered in letter
//! order with two-digit run suffixes. An unsuffixed file with the group's base
//! name is the first run and becomes `_01`:
//!
//! ```text
//! sub-1_ses-2_T1w.nii.gz   -> sub-1_ses-2_T1w_01.nii.gz
//! sub-1_ses-2_T1wa.nii.gz  -> sub-1_ses-2_T1w_02.nii.gz
//! sub-1_ses-2_T1wb.nii.gz  -> sub-1_ses-2_T1w_03.nii.gz
//! ```
//!
//! Groups are keyed by the full unsuffixed stem, so `dir-AP_dwi` and `dir-PA_dwi`
//! runs of one session are numbered separately. Sidecars (`.json`, `.bval`,
//! `.bvec`) that exist next to a volume get a paired entry with the same
//! substitution. Planning only reads the filesystem through the `exists` probe.

use crate::issues::{split_volume_name, IssueFile, IssueMap};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest group the two-digit scheme can number.
pub const MAX_RUNS: usize = 99;

/// Metadata files dcm2niix writes next to a volume.
pub const SIDECAR_EXTENSIONS: &[&str] = &[".json", ".bval", ".bvec"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlanEntry {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub old_filename: String,
    pub new_filename: String,
    pub subject: String,
    pub session: String,
    pub category: String,
    pub base_name: String,
    /// Empty for the unsuffixed base file.
    pub old_suffix: String,
    pub new_suffix: String,
}

/// Why a group was left out of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("suffix {suffix:?} of {filename} is not a single lowercase letter")]
    InvalidLetter { filename: String, suffix: String },
    #[error("{count} files exceed the {max} runs a two-digit suffix can number")]
    TooManyRuns { count: usize, max: usize },
    #[error("{filename} does not end in {expected}")]
    UnexpectedName { filename: String, expected: String },
    #[error("{} is already the target of another rename", .path.display())]
    TargetCollision { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedGroup {
    pub subject: String,
    pub session: String,
    pub category: String,
    pub base_name: String,
    pub error: GroupError,
}

#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    pub entries: Vec<RenamePlanEntry>,
    pub rejected: Vec<RejectedGroup>,
}

struct GroupKey<'a> {
    subject: &'a str,
    session: &'a str,
    category: &'a str,
    base_name: &'a str,
}

impl GroupKey<'_> {
    fn entry(&self, old_path: PathBuf, new_path: PathBuf, old_suffix: &str, new_suffix: &str) -> RenamePlanEntry {
        RenamePlanEntry {
            old_filename: file_name(&old_path),
            new_filename: file_name(&new_path),
            old_path,
            new_path,
            subject: self.subject.to_string(),
            session: self.session.to_string(),
            category: self.category.to_string(),
            base_name: self.base_name.to_string(),
            old_suffix: old_suffix.to_string(),
            new_suffix: new_suffix.to_string(),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn run_suffix(run: usize) -> String {
    format!("{:02}", run)
}

/// Build the plan against the real filesystem.
pub fn plan_renames(issues: &IssueMap) -> RenamePlan {
    plan_renames_with(issues, |path| path.exists())
}

/// Build the plan, asking `exists` about base files and sidecars.
pub fn plan_renames_with<F>(issues: &IssueMap, exists: F) -> RenamePlan
where
    F: Fn(&Path) -> bool,
{
    let mut plan = RenamePlan::default();
    let mut targets: HashSet<PathBuf> = HashSet::new();

    for (subject, sessions) in issues {
        for (session, categories) in sessions {
            for (category, files) in categories {
                let mut by_run: BTreeMap<(&str, PathBuf), Vec<&IssueFile>> = BTreeMap::new();
                for file in files {
                    by_run
                        .entry((file.base_name.as_str(), run_stem(file)))
                        .or_default()
                        .push(file);
                }

                for ((base_name, _), members) in by_run {
                    let key = GroupKey {
                        subject,
                        session,
                        category,
                        base_name,
                    };
                    let planned = plan_group(&key, members, &exists).and_then(|entries| {
                        let clash = entries
                            .iter()
                            .find(|e| targets.contains(&e.new_path))
                            .map(|e| e.new_path.clone());
                        match clash {
                            Some(path) => Err(GroupError::TargetCollision { path }),
                            None => Ok(entries),
                        }
                    });

                    match planned {
                        Ok(entries) => {
                            targets.extend(entries.iter().map(|e| e.new_path.clone()));
                            plan.entries.extend(entries);
                        }
                        Err(error) => plan.rejected.push(RejectedGroup {
                            subject: subject.clone(),
                            session: session.clone(),
                            category: category.clone(),
                            base_name: base_name.to_string(),
                            error,
                        }),
                    }
                }
            }
        }
    }
    plan
}

/// `{dir}/{stem without letter}`; the file path itself when it does not parse,
/// which leaves the member in a group of its own to be rejected.
fn run_stem(file: &IssueFile) -> PathBuf {
    split_volume_name(&file.filename)
        .and_then(|(stem, _)| stem.strip_suffix(file.suffix.as_str()))
        .map(|stem| file.full_path.with_file_name(stem))
        .unwrap_or_else(|| file.full_path.clone())
}

/// Plan one run group. Members are renumbered in letter order.
fn plan_group<F>(key: &GroupKey<'_>, mut members: Vec<&IssueFile>, exists: &F) -> Result<Vec<RenamePlanEntry>, GroupError>
where
    F: Fn(&Path) -> bool,
{
    for member in &members {
        let mut chars = member.suffix.chars();
        let single_lower = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_lowercase());
        if !single_lower {
            return Err(GroupError::InvalidLetter {
                filename: member.filename.clone(),
                suffix: member.suffix.clone(),
            });
        }
    }
    members.sort_by(|a, b| a.suffix.cmp(&b.suffix));

    // (directory, unsuffixed stem, extension) per member
    let mut parsed = Vec::with_capacity(members.len());
    for member in &members {
        let expected = format!("{}{}", key.base_name, member.suffix);
        let stem_and_ext = split_volume_name(&member.filename)
            .and_then(|(stem, ext)| stem.strip_suffix(member.suffix.as_str()).map(|s| (s, ext)))
            .filter(|(stem, _)| stem.ends_with(key.base_name));
        let Some((stem, ext)) = stem_and_ext else {
            return Err(GroupError::UnexpectedName {
                filename: member.filename.clone(),
                expected,
            });
        };
        let dir = member
            .full_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        parsed.push((dir, stem.to_string(), ext));
    }

    let (first_dir, first_stem, first_ext) = &parsed[0];
    let base_path = first_dir.join(format!("{}{}", first_stem, first_ext));
    let has_base = exists(&base_path);

    let runs = members.len() + usize::from(has_base);
    if runs > MAX_RUNS {
        return Err(GroupError::TooManyRuns {
            count: runs,
            max: MAX_RUNS,
        });
    }

    let mut entries = Vec::new();
    let mut push_with_sidecars = |old_path: PathBuf, dir: &Path, stem: &str, ext: &str, old_suffix: &str, run: usize| {
        let new_suffix = run_suffix(run);
        let new_stem = format!("{}_{}", stem, new_suffix);
        let new_path = dir.join(format!("{}{}", new_stem, ext));
        let sidecars = sidecar_paths(&old_path);
        entries.push(key.entry(old_path, new_path, old_suffix, &new_suffix));
        for (old_sidecar, sidecar_ext) in sidecars {
            if exists(&old_sidecar) {
                let new_sidecar = dir.join(format!("{}{}", new_stem, sidecar_ext));
                entries.push(key.entry(old_sidecar, new_sidecar, old_suffix, &new_suffix));
            }
        }
    };

    let mut run = 1;
    if has_base {
        push_with_sidecars(base_path.clone(), first_dir, first_stem, first_ext, "", run);
        run += 1;
    }
    for (member, (dir, stem, ext)) in members.iter().zip(&parsed) {
        push_with_sidecars(member.full_path.clone(), dir, stem, ext, &member.suffix, run);
        run += 1;
    }

    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(&entry.new_path) {
            return Err(GroupError::TargetCollision {
                path: entry.new_path.clone(),
            });
        }
    }
    Ok(entries)
}

/// Candidate sidecars of `x.nii.gz` / `x.nii`: `x.json`, `x.bval`, `x.bvec`.
pub fn sidecar_paths(volume: &Path) -> Vec<(PathBuf, &'static str)> {
    let Some((stem, _)) = volume
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(split_volume_name)
    else {
        return Vec::new();
    };
    SIDECAR_EXTENSIONS
        .iter()
        .map(|ext| (volume.with_file_name(format!("{}{}", stem, ext)), *ext))
        .collect()
}

/// Human-readable plan grouped by subject and session.
pub fn render_plan(plan: &RenamePlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "BIDS Naming Fix Rename Plan");
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out);
    let _ = writeln!(out, "Total files to rename: {}", plan.entries.len());
    let _ = writeln!(out);

    let mut current_subject: Option<&str> = None;
    let mut current_session: Option<&str> = None;
    for item in &plan.entries {
        if current_subject != Some(item.subject.as_str()) {
            current_subject = Some(&item.subject);
            current_session = None;
            let _ = writeln!(out, "\n{}:", item.subject);
        }
        if current_session != Some(item.session.as_str()) {
            current_session = Some(&item.session);
            let _ = writeln!(out, "  {}:", item.session);
        }
        let _ = writeln!(
            out,
            "    {}: {} -> {}",
            item.category, item.old_filename, item.new_filename
        );
    }

    if !plan.rejected.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Groups left unchanged: {}", plan.rejected.len());
        for group in &plan.rejected {
            let _ = writeln!(
                out,
                "  {}/{}/{} {}: {}",
                group.subject, group.session, group.category, group.base_name, group.error
            );
        }
    }
    out
}

pub fn save_plan(plan: &RenamePlan, path: &Path) -> Result<()> {
    fs::write(path, render_plan(plan))
        .with_context(|| format!("Failed to write rename plan {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const DIR: &str = "/bids/sub-1/ses-2/anat";

    fn issue(filename: &str, suffix: &str, base: &str) -> IssueFile {
        IssueFile {
            full_path: Path::new(DIR).join(filename),
            filename: filename.to_string(),
            suffix: suffix.to_string(),
            base_name: base.to_string(),
        }
    }

    fn issues(files: Vec<IssueFile>) -> IssueMap {
        let mut map = IssueMap::new();
        map.entry("sub-1".into())
            .or_default()
            .entry("ses-2".into())
            .or_default()
            .insert("anat".into(), files);
        map
    }

    fn on_disk(names: &[&str]) -> impl Fn(&Path) -> bool {
        let set: HashSet<PathBuf> = names.iter().map(|n| Path::new(DIR).join(n)).collect();
        move |p: &Path| set.contains(p)
    }

    fn renames(plan: &RenamePlan) -> Vec<(String, String)> {
        plan.entries
            .iter()
            .map(|e| (e.old_filename.clone(), e.new_filename.clone()))
            .collect()
    }

    #[test]
    fn test_letters_become_01_02_03_in_order() {
        // listed out of order on purpose
        let map = issues(vec![
            issue("sub-1_ses-2_T1wc.nii.gz", "c", "T1w"),
            issue("sub-1_ses-2_T1wa.nii.gz", "a", "T1w"),
            issue("sub-1_ses-2_T1wb.nii.gz", "b", "T1w"),
        ]);
        let plan = plan_renames_with(&map, on_disk(&[]));

        assert!(plan.rejected.is_empty());
        assert_eq!(
            renames(&plan),
            vec![
                ("sub-1_ses-2_T1wa.nii.gz".into(), "sub-1_ses-2_T1w_01.nii.gz".into()),
                ("sub-1_ses-2_T1wb.nii.gz".into(), "sub-1_ses-2_T1w_02.nii.gz".into()),
                ("sub-1_ses-2_T1wc.nii.gz".into(), "sub-1_ses-2_T1w_03.nii.gz".into()),
            ]
        );
        let suffixes: Vec<_> = plan.entries.iter().map(|e| e.new_suffix.as_str()).collect();
        assert_eq!(suffixes, ["01", "02", "03"]);
    }

    #[test]
    fn test_existing_base_file_takes_run_01() {
        let map = issues(vec![
            issue("sub-1_ses-2_T1wa.nii.gz", "a", "T1w"),
            issue("sub-1_ses-2_T1wb.nii.gz", "b", "T1w"),
        ]);
        let plan = plan_renames_with(&map, on_disk(&["sub-1_ses-2_T1w.nii.gz"]));

        assert_eq!(
            renames(&plan),
            vec![
                ("sub-1_ses-2_T1w.nii.gz".into(), "sub-1_ses-2_T1w_01.nii.gz".into()),
                ("sub-1_ses-2_T1wa.nii.gz".into(), "sub-1_ses-2_T1w_02.nii.gz".into()),
                ("sub-1_ses-2_T1wb.nii.gz".into(), "sub-1_ses-2_T1w_03.nii.gz".into()),
            ]
        );
        assert_eq!(plan.entries[0].old_suffix, "");
        assert_eq!(plan.entries[0].new_suffix, "01");
        assert_eq!(plan.entries[1].old_suffix, "a");
    }

    #[test]
    fn test_sidecars_are_paired_with_identical_suffix() {
        let map = issues(vec![
            issue("sub-1_ses-2_T1wa.nii.gz", "a", "T1w"),
            issue("sub-1_ses-2_T1wb.nii.gz", "b", "T1w"),
        ]);
        let plan = plan_renames_with(
            &map,
            on_disk(&[
                "sub-1_ses-2_T1w.nii.gz",
                "sub-1_ses-2_T1w.json",
                "sub-1_ses-2_T1wa.json",
                "sub-1_ses-2_T1wb.bval",
                "sub-1_ses-2_T1wb.bvec",
            ]),
        );

        assert_eq!(
            renames(&plan),
            vec![
                ("sub-1_ses-2_T1w.nii.gz".into(), "sub-1_ses-2_T1w_01.nii.gz".into()),
                ("sub-1_ses-2_T1w.json".into(), "sub-1_ses-2_T1w_01.json".into()),
                ("sub-1_ses-2_T1wa.nii.gz".into(), "sub-1_ses-2_T1w_02.nii.gz".into()),
                ("sub-1_ses-2_T1wa.json".into(), "sub-1_ses-2_T1w_02.json".into()),
                ("sub-1_ses-2_T1wb.nii.gz".into(), "sub-1_ses-2_T1w_03.nii.gz".into()),
                ("sub-1_ses-2_T1wb.bval".into(), "sub-1_ses-2_T1w_03.bval".into()),
                ("sub-1_ses-2_T1wb.bvec".into(), "sub-1_ses-2_T1w_03.bvec".into()),
            ]
        );
        assert_eq!(plan.entries[2].new_suffix, plan.entries[3].new_suffix);
        assert_eq!(plan.entries[5].new_suffix, "03");
    }

    #[test]
    fn test_dwi_direction_prefix_is_kept() {
        let map = issues(vec![issue("sub-1_ses-2_dir-PA_dwia.nii.gz", "a", "dwi")]);
        let plan = plan_renames_with(&map, on_disk(&["sub-1_ses-2_dir-PA_dwi.nii.gz"]));
        assert_eq!(
            renames(&plan),
            vec![
                ("sub-1_ses-2_dir-PA_dwi.nii.gz".into(), "sub-1_ses-2_dir-PA_dwi_01.nii.gz".into()),
                ("sub-1_ses-2_dir-PA_dwia.nii.gz".into(), "sub-1_ses-2_dir-PA_dwi_02.nii.gz".into()),
            ]
        );
    }

    #[test]
    fn test_base_names_are_planned_independently() {
        let map = issues(vec![
            issue("sub-1_ses-2_FLAIRa.nii.gz", "a", "FLAIR"),
            issue("sub-1_ses-2_T1wa.nii.gz", "a", "T1w"),
        ]);
        let plan = plan_renames_with(&map, on_disk(&[]));
        let suffixes: Vec<_> = plan.entries.iter().map(|e| e.new_suffix.as_str()).collect();
        assert_eq!(suffixes, ["01", "01"]);
    }

    #[test]
    fn test_multi_letter_suffix_rejects_group() {
        let map = issues(vec![
            issue("sub-1_ses-2_T1wa.nii.gz", "a", "T1w"),
            issue("sub-1_ses-2_T1waa.nii.gz", "aa", "T1w"),
            issue("sub-1_ses-2_FLAIRa.nii.gz", "a", "FLAIR"),
        ]);
        let plan = plan_renames_with(&map, on_disk(&[]));

        assert_eq!(plan.rejected.len(), 1);
        assert_eq!(plan.rejected[0].base_name, "T1w");
        assert!(matches!(plan.rejected[0].error, GroupError::InvalidLetter { .. }));
        // the FLAIR group is unaffected
        assert_eq!(renames(&plan).len(), 1);
    }

    #[test]
    fn test_group_over_99_runs_is_flagged() {
        let files: Vec<IssueFile> = (b'a'..=b'z')
            .map(|b| {
                let letter = (b as char).to_string();
                issue(&format!("sub-1_ses-2_T1w{}.nii.gz", letter), &letter, "T1w")
            })
            .collect();
        let plan = plan_renames_with(&issues(files.clone()), on_disk(&[]));
        assert_eq!(plan.entries.len(), 26);

        let mut big = Vec::new();
        for _ in 0..4 {
            big.extend(files.iter().cloned());
        }
        let plan = plan_renames_with(&issues(big), on_disk(&[]));
        assert!(plan.entries.is_empty());
        assert_eq!(
            plan.rejected[0].error,
            GroupError::TooManyRuns { count: 104, max: MAX_RUNS }
        );
    }

    #[test]
    fn test_unexpected_filename_rejects_group() {
        let map = issues(vec![issue("sub-1_ses-2_T1w_run-1.nii.gz", "a", "T1w")]);
        let plan = plan_renames_with(&map, on_disk(&[]));
        assert!(matches!(plan.rejected[0].error, GroupError::UnexpectedName { .. }));
    }

    #[test]
    fn test_new_paths_are_unique() {
        let map = issues(vec![
            issue("sub-1_ses-2_T1wa.nii.gz", "a", "T1w"),
            issue("sub-1_ses-2_T1wb.nii.gz", "b", "T1w"),
            issue("sub-1_ses-2_FLAIRa.nii.gz", "a", "FLAIR"),
        ]);
        let plan = plan_renames_with(&map, on_disk(&["sub-1_ses-2_T1wa.json"]));
        let unique: HashSet<_> = plan.entries.iter().map(|e| &e.new_path).collect();
        assert_eq!(unique.len(), plan.entries.len());
    }

    #[test]
    fn test_sidecar_paths() {
        let paths: Vec<PathBuf> = sidecar_paths(Path::new("/x/a_dwi.nii.gz"))
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/x/a_dwi.json"),
                PathBuf::from("/x/a_dwi.bval"),
                PathBuf::from("/x/a_dwi.bvec"),
            ]
        );
        assert_eq!(sidecar_paths(Path::new("/x/a_T1w.nii"))[0].0, PathBuf::from("/x/a_T1w.json"));
        assert!(sidecar_paths(Path::new("/x/a_T1w.json")).is_empty());
    }

    #[test]
    fn test_dwi_directions_are_numbered_separately() {
        let map = issues(vec![
            issue("sub-1_ses-2_dir-PA_dwia.nii.gz", "a", "dwi"),
            issue("sub-1_ses-2_dir-AP_dwia.nii.gz", "a", "dwi"),
        ]);
        let plan = plan_renames_with(
            &map,
            on_disk(&[
                "sub-1_ses-2_dir-AP_dwi.nii.gz",
                "sub-1_ses-2_dir-PA_dwi.nii.gz",
                "sub-1_ses-2_dir-PA_dwi.bval",
                "sub-1_ses-2_dir-PA_dwia.json",
                "sub-1_ses-2_dir-PA_dwia.bval",
                "sub-1_ses-2_dir-PA_dwia.bvec",
            ]),
        );

        assert!(plan.rejected.is_empty());
        assert_eq!(
            renames(&plan),
            vec![
                ("sub-1_ses-2_dir-AP_dwi.nii.gz".into(), "sub-1_ses-2_dir-AP_dwi_01.nii.gz".into()),
                ("sub-1_ses-2_dir-AP_dwia.nii.gz".into(), "sub-1_ses-2_dir-AP_dwi_02.nii.gz".into()),
                ("sub-1_ses-2_dir-PA_dwi.nii.gz".into(), "sub-1_ses-2_dir-PA_dwi_01.nii.gz".into()),
                ("sub-1_ses-2_dir-PA_dwi.bval".into(), "sub-1_ses-2_dir-PA_dwi_01.bval".into()),
                ("sub-1_ses-2_dir-PA_dwia.nii.gz".into(), "sub-1_ses-2_dir-PA_dwi_02.nii.gz".into()),
                ("sub-1_ses-2_dir-PA_dwia.json".into(), "sub-1_ses-2_dir-PA_dwi_02.json".into()),
                ("sub-1_ses-2_dir-PA_dwia.bval".into(), "sub-1_ses-2_dir-PA_dwi_02.bval".into()),
                ("sub-1_ses-2_dir-PA_dwia.bvec".into(), "sub-1_ses-2_dir-PA_dwi_02.bvec".into()),
            ]
        );
    }

    #[test]
    fn test_render_plan_groups_by_subject_and_session() {
        let map = issues(vec![issue("sub-1_ses-2_T1wa.nii.gz", "a", "T1w")]);
        let text = render_plan(&plan_renames_with(&map, on_disk(&[])));
        assert!(text.contains("Total files to rename: 1"));
        assert!(text.contains("\nsub-1:\n  ses-2:\n    anat: sub-1_ses-2_T1wa.nii.gz -> sub-1_ses-2_T1w_01.nii.gz"));
    }
}

//! Applies a rename plan entry by entry.
//!
//! Each entry is checked before it is touched: an existing target or a missing
//! source is recorded and skipped, and the rest of the plan still runs. Running
//! the same plan twice therefore reports every entry as "target exists".

use crate::planner::RenamePlanEntry;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameMode {
    /// Count what would succeed; the filesystem is not modified.
    Preview,
    Apply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameErrorKind {
    TargetExists,
    SourceMissing,
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameError {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub kind: RenameErrorKind,
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            RenameErrorKind::TargetExists => {
                write!(f, "Target file already exists: {}", self.new_path.display())
            }
            RenameErrorKind::SourceMissing => {
                write!(f, "Source file does not exist: {}", self.old_path.display())
            }
            RenameErrorKind::Io(e) => write!(
                f,
                "Error renaming {} -> {}: {}",
                self.old_path.display(),
                self.new_path.display(),
                e
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenameOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<RenameError>,
}

impl RenameOutcome {
    /// First `limit` error lines plus a "... and K more errors" line.
    pub fn error_summary(&self, limit: usize) -> Vec<String> {
        let mut lines: Vec<String> = self
            .errors
            .iter()
            .take(limit)
            .map(|e| format!("  - {}", e))
            .collect();
        if self.errors.len() > limit {
            lines.push(format!("  ... and {} more errors", self.errors.len() - limit));
        }
        lines
    }
}

/// Run the plan in order.
pub async fn execute_renames(plan: &[RenamePlanEntry], mode: RenameMode, show_progress: bool) -> RenameOutcome {
    let mut outcome = RenameOutcome::default();
    let pb = if show_progress {
        let pb = ProgressBar::new(plan.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("Renaming files {bar:40.green/white} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    for item in plan {
        pb.inc(1);
        match rename_one(item, mode).await {
            Ok(()) => outcome.succeeded += 1,
            Err(kind) => {
                outcome.failed += 1;
                outcome.errors.push(RenameError {
                    old_path: item.old_path.clone(),
                    new_path: item.new_path.clone(),
                    kind,
                });
            }
        }
    }
    pb.finish_and_clear();
    outcome
}

async fn rename_one(item: &RenamePlanEntry, mode: RenameMode) -> Result<(), RenameErrorKind> {
    if fs::try_exists(&item.new_path).await.unwrap_or(false) {
        return Err(RenameErrorKind::TargetExists);
    }
    if !fs::try_exists(&item.old_path).await.unwrap_or(false) {
        return Err(RenameErrorKind::SourceMissing);
    }
    if mode == RenameMode::Preview {
        return Ok(());
    }

    if let Some(parent) = item.new_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| RenameErrorKind::Io(e.to_string()))?;
    }
    fs::rename(&item.old_path, &item.new_path)
        .await
        .map_err(|e| RenameErrorKind::Io(e.to_string()))?;
    tracing::debug!(
        "Moved: {} -> {}",
        item.old_path.display(),
        item.new_path.display()
    );
    Ok(())
}

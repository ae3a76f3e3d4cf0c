use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide subscriber: stdout plus a plain-text log file.
///
/// `RUST_LOG` overrides the level chosen from `verbose`. Keep the returned guard
/// alive until exit so buffered file lines are flushed.
pub fn init_logger(log_file: &Path, verbose: bool) -> WorkerGuard {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "adni2bids_conversion.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    guard
}

/// Per-subject conversion report, one timestamped line per call.
///
/// Created by the orchestrator for each subject and handed down explicitly, so
/// nothing about it lives in global logger state.
pub struct SubjectLog {
    path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
}

impl SubjectLog {
    /// Open `{logs_dir}/{subject_id}_conversion.log`, truncating an older report.
    pub fn create(logs_dir: &Path, subject_id: &str) -> Result<Self> {
        fs::create_dir_all(logs_dir)
            .with_context(|| format!("Failed to create logs dir {}", logs_dir.display()))?;
        let path = logs_dir.join(format!("{}_conversion.log", subject_id));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create subject log {}", path.display()))?;
        Ok(Self {
            path: Some(path),
            writer: Some(BufWriter::new(file)),
        })
    }

    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Self {
            path: None,
            writer: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.line("INFO", message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.line("ERROR", message.as_ref());
    }

    pub fn blank(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writeln!(writer);
        }
    }

    fn line(&mut self, level: &str, message: &str) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Err(e) = writeln!(writer, "{} - {} - {}", stamp, level, message) {
            tracing::warn!("subject log write failed: {}", e);
            self.writer = None;
        }
    }

    pub fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
    }
}

impl Drop for SubjectLog {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_subject_log_writes_levelled_lines() {
        let tmp = tempdir().unwrap();
        let path = {
            let mut log = SubjectLog::create(&tmp.path().join("logs"), "027_S_6512").unwrap();
            log.info("Subject ID: 027_S_6512");
            log.error("No sessions found");
            log.path().unwrap().to_path_buf()
        };

        assert!(path.ends_with("027_S_6512_conversion.log"));
        let text = fs::read_to_string(path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO - Subject ID: 027_S_6512"));
        assert!(lines[1].ends_with("ERROR - No sessions found"));
    }

    #[test]
    fn test_disabled_log_is_silent() {
        let mut log = SubjectLog::disabled();
        log.info("ignored");
        assert!(log.path().is_none());
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default runtime configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/adni_bids_cli.toml";
/// Converter executable looked up on `PATH`.
pub const DEFAULT_DCM2NIIX: &str = "dcm2niix";
/// Directory receiving one report per subject.
pub const DEFAULT_LOGS_DIR: &str = "conversion_logs";
/// Process-wide log file.
pub const DEFAULT_LOG_FILE: &str = "adni2bids_conversion.log";
/// Default CSV path for the conversion summary.
pub const DEFAULT_REPORT_CSV: &str = "conversion_report.csv";
/// Default JSON path for the conversion summary.
pub const DEFAULT_REPORT_JSON: &str = "conversion_report.json";
/// Naming issues consumed by `fix-naming`.
pub const DEFAULT_ISSUES_FILE: &str = "naming_issues_data.json";
/// Human-readable rename plan written before any file is touched.
pub const DEFAULT_RENAME_PLAN_FILE: &str = "bids_rename_plan.txt";
/// Entries shown by the preview and by the error summary.
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

#[derive(Deserialize, Default, Debug)]
/// Runtime overrides loaded from the TOML config referenced by `main`.
pub struct RuntimeConfigFile {
    pub dcm2niix_path: Option<String>,
    pub dcm2niix_timeout_secs: Option<u64>,
    pub logs_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub report_csv: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    pub issues_file: Option<PathBuf>,
    pub rename_plan_file: Option<PathBuf>,
    pub preview_limit: Option<usize>,
}

/// Values the CLI may override; every field is optional.
#[derive(Default, Debug, Clone)]
pub struct CliOverrides {
    pub dcm2niix_path: Option<String>,
    pub dcm2niix_timeout_secs: Option<u64>,
    pub report_csv: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    pub issues_file: Option<PathBuf>,
    pub rename_plan_file: Option<PathBuf>,
    pub preview_limit: Option<usize>,
}

/// Final configuration used throughout the workflow.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub dcm2niix_path: String,
    pub dcm2niix_timeout: Option<Duration>,
    pub logs_dir: PathBuf,
    pub log_file: PathBuf,
    pub report_csv: PathBuf,
    pub report_json: PathBuf,
    pub issues_file: PathBuf,
    pub rename_plan_file: PathBuf,
    pub preview_limit: usize,
}

impl EffectiveConfig {
    /// Returns the crate-level defaults before CLI/runtime overrides are merged.
    pub fn defaults() -> Self {
        Self {
            dcm2niix_path: DEFAULT_DCM2NIIX.to_string(),
            dcm2niix_timeout: None,
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            report_csv: PathBuf::from(DEFAULT_REPORT_CSV),
            report_json: PathBuf::from(DEFAULT_REPORT_JSON),
            issues_file: PathBuf::from(DEFAULT_ISSUES_FILE),
            rename_plan_file: PathBuf::from(DEFAULT_RENAME_PLAN_FILE),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

/// Merge CLI overrides with a parsed runtime config, falling back to crate defaults.
///
/// CLI flags take precedence, followed by the runtime file, and finally `EffectiveConfig::defaults()`.
pub fn merge_config(cli: &CliOverrides, file: Option<RuntimeConfigFile>) -> EffectiveConfig {
    let mut cfg = EffectiveConfig::defaults();
    let f = file.unwrap_or_default();

    cfg.dcm2niix_path = sanitize_optional_string(cli.dcm2niix_path.clone())
        .or(sanitize_optional_string(f.dcm2niix_path))
        .unwrap_or(cfg.dcm2niix_path);
    cfg.dcm2niix_timeout = cli
        .dcm2niix_timeout_secs
        .or(f.dcm2niix_timeout_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);
    cfg.logs_dir = f.logs_dir.unwrap_or(cfg.logs_dir);
    cfg.log_file = f.log_file.unwrap_or(cfg.log_file);
    cfg.report_csv = cli.report_csv.clone().or(f.report_csv).unwrap_or(cfg.report_csv);
    cfg.report_json = cli.report_json.clone().or(f.report_json).unwrap_or(cfg.report_json);
    cfg.issues_file = cli.issues_file.clone().or(f.issues_file).unwrap_or(cfg.issues_file);
    cfg.rename_plan_file = cli
        .rename_plan_file
        .clone()
        .or(f.rename_plan_file)
        .unwrap_or(cfg.rename_plan_file);
    cfg.preview_limit = cli.preview_limit.or(f.preview_limit).unwrap_or(cfg.preview_limit);

    cfg
}

/// Attempts to read the runtime config file and deserialize CLI overrides.
///
/// Returns `Ok(None)` when the file is missing so defaults are preserved.
pub fn load_runtime_config(path: Option<&Path>) -> Result<Option<RuntimeConfigFile>> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    };

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).context("Failed to read runtime config")?;
    let parsed: RuntimeConfigFile =
        toml::from_str(&content).context("Failed to parse runtime config")?;
    Ok(Some(parsed))
}

/// Trims whitespace and drops empty strings.
pub fn sanitize_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let cfg = merge_config(&CliOverrides::default(), None);
        assert_eq!(cfg.dcm2niix_path, "dcm2niix");
        assert_eq!(cfg.dcm2niix_timeout, None);
        assert_eq!(cfg.issues_file, PathBuf::from("naming_issues_data.json"));
        assert_eq!(cfg.rename_plan_file, PathBuf::from("bids_rename_plan.txt"));
        assert_eq!(cfg.preview_limit, 10);
    }

    #[test]
    fn test_cli_beats_file_beats_default() {
        let file = RuntimeConfigFile {
            dcm2niix_path: Some("/opt/bin/dcm2niix".into()),
            dcm2niix_timeout_secs: Some(600),
            logs_dir: Some("logs".into()),
            report_csv: Some("file.csv".into()),
            ..Default::default()
        };
        let cli = CliOverrides {
            dcm2niix_path: Some("  ".into()),
            report_csv: Some("cli.csv".into()),
            ..Default::default()
        };

        let cfg = merge_config(&cli, Some(file));
        assert_eq!(cfg.dcm2niix_path, "/opt/bin/dcm2niix");
        assert_eq!(cfg.dcm2niix_timeout, Some(Duration::from_secs(600)));
        assert_eq!(cfg.logs_dir, PathBuf::from("logs"));
        assert_eq!(cfg.report_csv, PathBuf::from("cli.csv"));
        assert_eq!(cfg.report_json, PathBuf::from(DEFAULT_REPORT_JSON));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let cli = CliOverrides {
            dcm2niix_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(merge_config(&cli, None).dcm2niix_timeout, None);
    }

    #[test]
    fn test_load_runtime_config() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");
        assert!(load_runtime_config(Some(&missing)).unwrap().is_none());

        let path = tmp.path().join("cfg.toml");
        fs::write(&path, "dcm2niix_path = \"/usr/local/bin/dcm2niix\"\npreview_limit = 25\n").unwrap();
        let parsed = load_runtime_config(Some(&path)).unwrap().unwrap();
        assert_eq!(parsed.dcm2niix_path.as_deref(), Some("/usr/local/bin/dcm2niix"));
        assert_eq!(parsed.preview_limit, Some(25));

        fs::write(&path, "preview_limit = \"many\"").unwrap();
        assert!(load_runtime_config(Some(&path)).is_err());
    }
}

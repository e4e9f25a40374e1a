//! Environment-driven settings, read once at startup.
//!
//! - `RELEASE_OPS_LOG`: tracing filter (EnvFilter syntax), default `info`
//! - `RELEASE_OPS_LOG_FORMAT`: `text` (default) or `json`
//! - `RELEASE_OPS_DIR`: directory the tools run in, default the current one

use crate::Result;
use anyhow::{Context, bail};
use std::fs;
use std::path::PathBuf;

pub const LOG_ENV: &str = "RELEASE_OPS_LOG";
pub const LOG_FORMAT_ENV: &str = "RELEASE_OPS_LOG_FORMAT";
pub const DIR_ENV: &str = "RELEASE_OPS_DIR";

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub log_format: LogFormat,
    pub working_dir: PathBuf,
    /// Unrecognized `RELEASE_OPS_LOG_FORMAT` value, reported once logging is up.
    pub ignored_log_format: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir().context("read current directory")?;
        let settings = Self::from_lookup(|key| std::env::var(key).ok(), cwd);
        settings.check_working_dir()?;
        Ok(settings)
    }

    /// The tools run in `working_dir`, so it must be an existing directory.
    fn check_working_dir(&self) -> Result<()> {
        let dir = self.working_dir.display();
        let meta = fs::metadata(&self.working_dir)
            .with_context(|| format!("working directory {} ({}) is not accessible", dir, DIR_ENV))?;
        if !meta.is_dir() {
            bail!("working directory {} ({}) is not a directory", dir, DIR_ENV);
        }
        Ok(())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>, cwd: PathBuf) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_filter = non_empty(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let (log_format, ignored_log_format) = match non_empty(LOG_FORMAT_ENV) {
            None => (LogFormat::Text, None),
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "text" => (LogFormat::Text, None),
                "json" => (LogFormat::Json, None),
                _ => (LogFormat::Text, Some(v)),
            },
        };

        let working_dir = match non_empty(DIR_ENV).map(PathBuf::from) {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd.join(dir),
            None => cwd,
        };

        Settings {
            log_filter,
            log_format,
            working_dir,
            ignored_log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned(), PathBuf::from("/work"))
    }

    #[test]
    fn defaults() {
        assert_eq!(
            settings(&[]),
            Settings {
                log_filter: "info".to_string(),
                log_format: LogFormat::Text,
                working_dir: PathBuf::from("/work"),
                ignored_log_format: None,
            }
        );
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            (LOG_ENV, "release_ops=debug"),
            (LOG_FORMAT_ENV, "JSON"),
            (DIR_ENV, "/srv/pkg"),
        ]);
        assert_eq!(s.log_filter, "release_ops=debug");
        assert_eq!(s.log_format, LogFormat::Json);
        assert_eq!(s.working_dir, PathBuf::from("/srv/pkg"));
    }

    #[test]
    fn relative_dir_is_joined_to_cwd() {
        let s = settings(&[(DIR_ENV, "pkg")]);
        assert_eq!(s.working_dir, PathBuf::from("/work/pkg"));
    }

    #[test]
    fn blank_values_fall_back() {
        let s = settings(&[(LOG_ENV, "  "), (DIR_ENV, "")]);
        assert_eq!(s.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(s.working_dir, PathBuf::from("/work"));
    }

    #[test]
    fn working_dir_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("setup.cfg");
        fs::write(&file, b"").unwrap();

        let with_dir = |dir: &std::path::Path| {
            settings(&[(DIR_ENV, dir.to_str().unwrap())]).check_working_dir()
        };

        assert!(with_dir(tmp.path()).is_ok());

        let missing = with_dir(&tmp.path().join("nope")).unwrap_err();
        assert!(format!("{:#}", missing).contains("is not accessible"), "{missing:#}");
        assert!(format!("{:#}", missing).contains(DIR_ENV));

        let not_dir = with_dir(&file).unwrap_err();
        assert!(not_dir.to_string().contains("is not a directory"), "{not_dir:#}");
    }

    #[test]
    fn unknown_format_falls_back_to_text() {
        let s = settings(&[(LOG_FORMAT_ENV, "yaml")]);
        assert_eq!(s.log_format, LogFormat::Text);
        assert_eq!(s.ignored_log_format.as_deref(), Some("yaml"));
    }
}

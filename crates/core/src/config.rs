//! `config.toml` sections plus the on-disk layout under the user's home.
//!
//! Loading never fails: a missing or broken file falls back to defaults and
//! the outcome is returned as a [`ConfigSource`] so the caller can log it once
//! a subscriber exists.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ShellError;
use crate::severity::Severity;

const APP_DIR: &str = "botshell";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Chatbot".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Lines kept by the log sink.
    pub log_capacity: usize,
    /// Lines kept by the stdout/stderr capture.
    pub stream_capacity: usize,
    pub min_severity: Severity,
    pub show_time: bool,
    pub show_target: bool,
    /// Optional file that receives a copy of captured output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_file: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            log_capacity: 50,
            stream_capacity: 50,
            min_severity: Severity::Warning,
            show_time: false,
            show_target: false,
            mirror_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    pub poll_interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive for the log file. `RUST_LOG` wins when set.
    pub filter: String,
    /// Overrides `~/.botshell/logs/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "botshell=debug,botshell_core=debug".to_string(),
            directory: None,
            max_files: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub window: WindowConfig,
    pub console: ConsoleConfig,
    pub shell: LoopConfig,
    pub logging: LoggingConfig,
}

impl ShellConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.shell.poll_interval_ms.max(1))
    }

    pub fn log_directory(&self) -> PathBuf {
        self.logging.directory.clone().unwrap_or_else(log_dir)
    }
}

/// How [`load`] arrived at its config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file existed; defaults were written there.
    Created(PathBuf),
    /// Defaults are in use because `path` could not be read, parsed or created.
    Defaults { path: PathBuf, reason: String },
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => tracing::info!("Loaded config from {}", path.display()),
            ConfigSource::Created(path) => {
                tracing::info!("Created default config at {}", path.display())
            }
            ConfigSource::Defaults { path, reason } => {
                tracing::warn!("Using default config ({}): {}", path.display(), reason)
            }
        }
    }
}

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn home() -> Option<PathBuf> {
    env_dir(if cfg!(windows) { "USERPROFILE" } else { "HOME" })
}

/// `%APPDATA%\botshell\config.toml` on Windows, otherwise
/// `$XDG_CONFIG_HOME/botshell/config.toml` or `~/.config/botshell/config.toml`.
pub fn config_path() -> PathBuf {
    let base = env_dir(if cfg!(windows) { "APPDATA" } else { "XDG_CONFIG_HOME" })
        .or_else(|| home().map(|h| h.join(".config")));
    match base {
        Some(base) => base.join(APP_DIR).join(CONFIG_FILE),
        None => PathBuf::from(".botshell").join(CONFIG_FILE),
    }
}

/// `~/.botshell/logs`, relative to the working directory without a home.
pub fn log_dir() -> PathBuf {
    home()
        .unwrap_or_default()
        .join(".botshell")
        .join("logs")
}

pub fn parse_config(contents: &str) -> Result<ShellConfig, ShellError> {
    toml::from_str(contents).map_err(|e| ShellError::Config(e.to_string()))
}

/// Write `config` as TOML, creating parent directories.
pub fn save_config(config: &ShellConfig, path: &Path) -> Result<(), ShellError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| ShellError::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Read `path`, or the platform default when `None`.
///
/// Only the platform default is created on first run; an explicit path that
/// does not exist falls back to defaults.
pub fn load(path: Option<&Path>) -> (ShellConfig, ConfigSource) {
    let (path, create) = match path {
        Some(p) => (p.to_path_buf(), false),
        None => (config_path(), true),
    };

    let fallback = |path: PathBuf, reason: String| {
        (ShellConfig::default(), ConfigSource::Defaults { path, reason })
    };

    match std::fs::read_to_string(&path) {
        Ok(text) => match parse_config(&text) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(e) => fallback(path, e.to_string()),
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound && create => {
            let config = ShellConfig::default();
            match save_config(&config, &path) {
                Ok(()) => (config, ConfigSource::Created(path)),
                Err(e) => fallback(path, e.to_string()),
            }
        }
        Err(e) => fallback(path, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("botshell-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[shell]\npoll_interval_ms = 25\n").unwrap();
        assert_eq!(config.shell.poll_interval_ms, 25);
        assert_eq!(config.console.log_capacity, 50);
        assert_eq!(config.console.min_severity, Severity::Warning);
        assert_eq!(config.window.title, "Chatbot");
    }

    #[test]
    fn test_partial_section_keeps_other_keys() {
        let config = parse_config("[console]\nmin_severity = \"error\"\n").unwrap();
        assert_eq!(config.console.min_severity, Severity::Error);
        assert_eq!(config.console.log_capacity, 50);
        assert_eq!(config.console.stream_capacity, 50);
        assert!(!config.console.show_time);

        let config = parse_config("[logging]\nmax_files = 7\n").unwrap();
        assert_eq!(config.logging.max_files, 7);
        assert_eq!(config.logging.filter, "botshell=debug,botshell_core=debug");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(parse_config("shell = 3"), Err(ShellError::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch("roundtrip");
        let path = dir.join("nested").join(CONFIG_FILE);
        let mut config = ShellConfig::default();
        config.window.title = "Test bot - ver. 1.2".into();
        config.console.mirror_file = Some(dir.join("mirror.log"));

        save_config(&config, &path).unwrap();
        let (loaded, source) = load(Some(&path));

        assert_eq!(source, ConfigSource::File(path.clone()));
        assert_eq!(loaded.window.title, "Test bot - ver. 1.2");
        assert_eq!(loaded.console.mirror_file, Some(dir.join("mirror.log")));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_broken_file_reports_why_defaults_are_used() {
        let dir = scratch("broken");
        let path = dir.join(CONFIG_FILE);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[console]\nlog_capacity = \"lots\"\n").unwrap();

        let (config, source) = load(Some(&path));

        assert_eq!(config.console.log_capacity, 50);
        match source {
            ConfigSource::Defaults { path: p, reason } => {
                assert_eq!(p, path);
                assert!(reason.contains("lots"), "{}", reason);
            }
            other => panic!("unexpected source {:?}", other),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_explicit_missing_path_is_not_created() {
        let path = scratch("absent").join(CONFIG_FILE);
        let (_, source) = load(Some(&path));
        assert!(matches!(source, ConfigSource::Defaults { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_poll_interval_never_zero() {
        let mut config = ShellConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
        config.shell.poll_interval_ms = 0;
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }
}

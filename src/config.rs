//! Configuration management for deploy-fs
//!
//! Configuration is read from `DEPLOY_FS_*` environment variables with
//! fallback defaults:
//!
//! - `DEPLOY_FS_FILE_MODE`: octal mode for written files (default `644`)
//! - `DEPLOY_FS_DIR_MODE`: octal mode for created directories (default `755`)
//! - `DEPLOY_FS_TEMP_ROOT`: parent of staging directories (default: system temp dir)
//! - `DEPLOY_FS_TEMP_PATTERN`: staging directory name pattern (default `deploy-fs-*`)
//! - `DEPLOY_FS_TIMEOUT`: per-command timeout in seconds (default `30`)
//! - `DEPLOY_FS_LOG_LEVEL`: trace, debug, info, warn or error (default `info`)
//! - `DEPLOY_FS_LOG_JSON`: `true` for JSON log lines (default `false`)

use crate::context::Context;
use crate::fs::FileMode;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FILE_MODE: FileMode = FileMode::new(0o644);
pub const DEFAULT_DIR_MODE: FileMode = FileMode::new(0o755);
pub const DEFAULT_TEMP_PATTERN: &str = "deploy-fs-*";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";
const MAX_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Modes applied when writing staged files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteModes {
    pub file_mode: FileMode,
    pub dir_mode: FileMode,
}

impl Default for WriteModes {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FsConfig {
    pub file_mode: FileMode,
    pub dir_mode: FileMode,
    /// Empty means the system temp dir
    pub temp_root: PathBuf,
    pub temp_pattern: String,
    pub timeout_secs: u64,
    pub log_level: String,
    pub log_json: bool,
}

fn mode_from_env(key: &str, default: FileMode) -> Result<FileMode, ConfigError> {
    match env::var(key) {
        Ok(raw) => FileMode::parse_octal(&raw).ok_or_else(|| ConfigError::ParseError {
            field: key.to_string(),
            error: format!("'{}' is not an octal file mode", raw),
        }),
        Err(_) => Ok(default),
    }
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            temp_root: PathBuf::new(),
            temp_pattern: DEFAULT_TEMP_PATTERN.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
        }
    }
}

impl FsConfig {
    /// Loads configuration from `DEPLOY_FS_*` environment variables.
    ///
    /// Unset variables fall back to defaults; set but unparsable values are
    /// reported rather than silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file_mode = mode_from_env("DEPLOY_FS_FILE_MODE", DEFAULT_FILE_MODE)?;
        let dir_mode = mode_from_env("DEPLOY_FS_DIR_MODE", DEFAULT_DIR_MODE)?;

        let temp_root = env::var("DEPLOY_FS_TEMP_ROOT")
            .map(PathBuf::from)
            .unwrap_or_default();

        let temp_pattern =
            env::var("DEPLOY_FS_TEMP_PATTERN").unwrap_or_else(|_| DEFAULT_TEMP_PATTERN.to_string());

        let timeout_secs = match env::var("DEPLOY_FS_TIMEOUT") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::ParseError {
                field: "DEPLOY_FS_TIMEOUT".to_string(),
                error: e.to_string(),
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let log_level = env::var("DEPLOY_FS_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = match env::var("DEPLOY_FS_LOG_JSON") {
            Ok(raw) => raw.parse::<bool>().map_err(|e| ConfigError::ParseError {
                field: "DEPLOY_FS_LOG_JSON".to_string(),
                error: e.to_string(),
            })?,
            Err(_) => false,
        };

        Ok(Self {
            file_mode,
            dir_mode,
            temp_root,
            temp_pattern,
            timeout_secs,
            log_level,
            log_json,
        })
    }

    /// [`from_env`](Self::from_env) followed by [`validate`](Self::validate)
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` for out-of-range modes or
    /// timeouts, a temp pattern containing a path separator, or an unknown
    /// log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, mode) in [("file mode", self.file_mode), ("dir mode", self.dir_mode)] {
            if mode.bits() > FileMode::MAX {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid {}: {} exceeds {:o}",
                    field,
                    mode,
                    FileMode::MAX
                )));
            }
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Timeout must be at least 1 second".to_string(),
            ));
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.temp_pattern.chars().any(std::path::is_separator) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temp pattern '{}' must not contain a path separator",
                self.temp_pattern
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn write_modes(&self) -> WriteModes {
        WriteModes {
            file_mode: self.file_mode,
            dir_mode: self.dir_mode,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// A fresh context bounded by the configured timeout
    pub fn context(&self) -> Context {
        Context::with_timeout(self.timeout())
    }

    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("file_mode".to_string(), self.file_mode.to_string());
        map.insert("dir_mode".to_string(), self.dir_mode.to_string());
        map.insert("temp_root".to_string(), self.temp_root_display());
        map.insert("temp_pattern".to_string(), self.temp_pattern.clone());
        map.insert("timeout_secs".to_string(), self.timeout_secs.to_string());
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());

        map
    }

    fn temp_root_display(&self) -> String {
        if self.temp_root.as_os_str().is_empty() {
            "<system temp dir>".to_string()
        } else {
            self.temp_root.display().to_string()
        }
    }
}

impl fmt::Display for FsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "deploy-fs configuration:")?;
        writeln!(f, "  File Mode: {}", self.file_mode)?;
        writeln!(f, "  Dir Mode: {}", self.dir_mode)?;
        writeln!(f, "  Temp Root: {}", self.temp_root_display())?;
        writeln!(f, "  Temp Pattern: {}", self.temp_pattern)?;
        writeln!(f, "  Timeout: {}s", self.timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    const ALL_KEYS: [&str; 7] = [
        "DEPLOY_FS_FILE_MODE",
        "DEPLOY_FS_DIR_MODE",
        "DEPLOY_FS_TEMP_ROOT",
        "DEPLOY_FS_TEMP_PATTERN",
        "DEPLOY_FS_TIMEOUT",
        "DEPLOY_FS_LOG_LEVEL",
        "DEPLOY_FS_LOG_JSON",
    ];

    #[test]
    #[serial]
    fn test_defaults_from_env() {
        let _guards: Vec<_> = ALL_KEYS.iter().map(|k| EnvGuard::unset(k)).collect();

        let config = FsConfig::from_env().unwrap();

        assert_eq!(config.file_mode, DEFAULT_FILE_MODE);
        assert_eq!(config.dir_mode, DEFAULT_DIR_MODE);
        assert!(config.temp_root.as_os_str().is_empty());
        assert_eq!(config.temp_pattern, DEFAULT_TEMP_PATTERN);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(!config.log_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("DEPLOY_FS_FILE_MODE", "600"),
            EnvGuard::set("DEPLOY_FS_DIR_MODE", "0700"),
            EnvGuard::set("DEPLOY_FS_TEMP_ROOT", "/var/tmp"),
            EnvGuard::set("DEPLOY_FS_TEMP_PATTERN", "stage-*"),
            EnvGuard::set("DEPLOY_FS_TIMEOUT", "120"),
            EnvGuard::set("DEPLOY_FS_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("DEPLOY_FS_LOG_JSON", "true"),
        ];

        let config = FsConfig::from_env().unwrap();

        assert_eq!(config.file_mode, FileMode::new(0o600));
        assert_eq!(config.dir_mode, FileMode::new(0o700));
        assert_eq!(config.temp_root, PathBuf::from("/var/tmp"));
        assert_eq!(config.temp_pattern, "stage-*");
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
    }

    #[test]
    #[serial]
    fn test_load_rejects_unknown_log_level() {
        let mut guards: Vec<_> = ALL_KEYS.iter().map(|k| EnvGuard::unset(k)).collect();
        guards.push(EnvGuard::set("DEPLOY_FS_LOG_LEVEL", "verbose"));

        let err = FsConfig::load().unwrap_err();

        assert!(err.to_string().contains("Invalid log level: verbose"));
    }

    #[test]
    #[serial]
    fn test_invalid_log_json_is_parse_error() {
        let mut guards: Vec<_> = ALL_KEYS.iter().map(|k| EnvGuard::unset(k)).collect();
        guards.push(EnvGuard::set("DEPLOY_FS_LOG_JSON", "yes"));

        assert!(matches!(
            FsConfig::from_env(),
            Err(ConfigError::ParseError { ref field, .. }) if field == "DEPLOY_FS_LOG_JSON"
        ));
    }

    #[test]
    #[serial]
    fn test_invalid_mode_is_parse_error() {
        let _guard = EnvGuard::set("DEPLOY_FS_FILE_MODE", "rw-r--r--");

        let err = FsConfig::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { ref field, .. } if field == "DEPLOY_FS_FILE_MODE"));
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_is_parse_error() {
        let _guards = vec![
            EnvGuard::unset("DEPLOY_FS_FILE_MODE"),
            EnvGuard::unset("DEPLOY_FS_DIR_MODE"),
            EnvGuard::set("DEPLOY_FS_TIMEOUT", "soon"),
        ];

        assert!(matches!(
            FsConfig::from_env(),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_validate_mode_range() {
        let config = FsConfig {
            file_mode: FileMode::new(0o1777),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_timeout_range() {
        let zero = FsConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let too_long = FsConfig {
            timeout_secs: MAX_TIMEOUT_SECS + 1,
            ..Default::default()
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_validate_temp_pattern() {
        let config = FsConfig {
            temp_pattern: "nested/dir-*".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_log_level() {
        let config = FsConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_write_modes_and_timeout() {
        let config = FsConfig::default();

        assert_eq!(config.write_modes(), WriteModes::default());
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.context().deadline().is_some());
    }

    #[test]
    fn test_display_map() {
        let map = FsConfig::default().to_display_map();

        assert_eq!(map.get("file_mode").unwrap(), "0644");
        assert_eq!(map.get("dir_mode").unwrap(), "0755");
        assert_eq!(map.get("temp_root").unwrap(), "<system temp dir>");
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn test_display() {
        let text = FsConfig::default().to_string();
        assert!(text.contains("File Mode: 0644"));
        assert!(text.contains("Temp Pattern: deploy-fs-*"));
    }
}

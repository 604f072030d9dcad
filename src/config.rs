//! Optional user configuration. Everything lives in a single data directory
//! beneath the user's home; when `config.toml` is absent the defaults apply.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-desk";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library_management.db";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Overrides the database location.
    pub database: Option<PathBuf>,
    /// Filter directive handed to the log subscriber, e.g. `info` or
    /// `library_desk=debug`.
    pub log_level: String,
    pub validation: ValidationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            log_level: "info".to_string(),
            validation: ValidationPolicy::default(),
        }
    }
}

/// Checks applied on top of the plain presence validation. Duplicate primary
/// keys are always refused by SQLite, so only reference checks are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationPolicy {
    /// Refuse to issue a book when the student or book row is missing.
    pub reject_dangling_references: bool,
}

impl Config {
    /// Load `config.toml` from the data directory, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&data_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load a specific config file; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Parse configuration text. Unknown keys are an error.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse configuration")
    }

    /// Resolve where the SQLite file lives.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DB_FILE_NAME)),
        }
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(data_dir()?.join(LOG_DIR_NAME))
    }
}

/// Resolve the absolute path of the application data directory.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.log_level, "info");
        assert!(config.database.is_none());
        assert!(!config.validation.reject_dangling_references);
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::from_toml_str(
            r#"
            database = "/tmp/library.db"
            log_level = "debug"

            [validation]
            reject_dangling_references = true
            "#,
        )
        .unwrap();
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/library.db"));
        assert_eq!(config.log_level, "debug");
        assert!(config.validation.reject_dangling_references);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("colour = \"blue\"").is_err());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let config = Config::load_from(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(config.log_level, "info");
    }
}

use crate::error::{ProfileError, Result};
use crate::models::Environment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "profile.yml";

/// Profile transfer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extension appended to exported artifacts
    pub file_extension: String,
    /// File name used when an export is not given one
    pub default_file_name: String,
    /// Directory exports are written to; the working directory when unset
    pub export_dir: Option<PathBuf>,
    /// Profile database path
    pub database: Option<PathBuf>,
    /// Replaces the detected host metadata in exported documents
    pub environment: Option<Environment>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_extension: "txt".to_string(),
            default_file_name: "bukurs-profile-export".to_string(),
            export_dir: None,
            database: None,
            environment: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        // An empty file deserializes as null
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents)
            .map_err(|e| ProfileError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from `path`, or the default location when `None`
    ///
    /// A missing file yields the defaults, a broken one too, with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path(),
        };

        if !config_path.exists() {
            log::debug!("No config at {:?}, using defaults", config_path);
            return Self::default();
        }

        match Self::load_from_path(&config_path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config from {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    pub fn default_path() -> PathBuf {
        crate::utils::get_config_dir().join(CONFIG_FILE_NAME)
    }

    /// Save configuration to a file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Host metadata for new exports
    pub fn environment(&self) -> Environment {
        self.environment.clone().unwrap_or_else(Environment::detect)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(crate::utils::get_default_db_path)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.file_extension, "txt");
        assert_eq!(config.default_file_name, "bukurs-profile-export");
        assert_eq!(config.environment(), Environment::detect());
    }

    #[test]
    fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path();

        let original = Config {
            file_extension: "json".to_string(),
            export_dir: Some(PathBuf::from("/tmp/exports")),
            environment: Some(Environment {
                browser_name: "firefox".to_string(),
                ..Environment::default()
            }),
            ..Config::default()
        };

        original.save_to_path(config_path).unwrap();
        let loaded = Config::load_from_path(config_path).unwrap();

        assert_eq!(original, loaded);
        assert_eq!(loaded.environment().browser_name, "firefox");
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "invalid: yaml: content:").unwrap();

        match Config::load_from_path(temp_file.path()) {
            Err(ProfileError::Config(message)) => {
                assert!(message.starts_with(&temp_file.path().display().to_string()))
            }
            other => panic!("expected a config error, got {:?}", other),
        }
        // The lenient loader falls back instead
        assert_eq!(Config::load(Some(temp_file.path())), Config::default());
    }

    #[test]
    fn test_load_partial_config() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "file_extension: dat\n").unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.file_extension, "dat");
        assert_eq!(config.default_file_name, "bukurs-profile-export");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.yml")));
        assert_eq!(config, Config::default());
    }
}

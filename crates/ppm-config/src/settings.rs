use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use which::which;

/// Environment directory used when nothing is configured
pub const DEFAULT_ENV_PATH: &str = ".ppm.env";

/// Manifest file used when neither `-c` nor the settings file name one
pub const DEFAULT_MANIFEST_PATH: &str = "pyproject.toml";

/// Keys accepted by `ppm config get/set`
pub const SETTING_KEYS: &[&str] = &["python-path", "env-path", "manifest-path"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Unknown config key: {0}. Supported keys: python-path, env-path, manifest-path")]
    UnknownKey(String),

    #[error("No Python interpreter found. Install python3 or set python-path with `ppm config set python-path <path>`")]
    PythonNotFound,
}

/// Tool settings stored in `~/.config/ppm/ppm.toml`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,
}

impl Settings {
    pub fn path() -> Result<PathBuf, ConfigError> {
        // Honor explicit override via PPM_CONFIG for tests / isolated runs.
        if let Ok(env_path) = std::env::var("PPM_CONFIG") {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        #[cfg(not(target_os = "windows"))]
        let base = dirs::home_dir()
            .ok_or(ConfigError::NoHomeDir)?
            .join(".config");

        #[cfg(target_os = "windows")]
        let base = dirs::config_dir().ok_or(ConfigError::NoHomeDir)?;

        Ok(base.join("ppm").join("ppm.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Settings::default())
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::path()?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "python-path" => self.python_path.clone(),
            "env-path" => self.env_path.clone(),
            "manifest-path" => self.manifest_path.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "python-path" => self.python_path = Some(value),
            "env-path" => self.env_path = Some(value),
            "manifest-path" => self.manifest_path = Some(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.python_path.is_none() && self.env_path.is_none() && self.manifest_path.is_none()
    }

    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        SETTING_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    pub fn get_env_path(&self) -> PathBuf {
        PathBuf::from(self.env_path.as_deref().unwrap_or(DEFAULT_ENV_PATH))
    }

    pub fn get_manifest_path(&self) -> PathBuf {
        PathBuf::from(
            self.manifest_path
                .as_deref()
                .unwrap_or(DEFAULT_MANIFEST_PATH),
        )
    }

    /// Host interpreter used for global operations and for creating environments
    pub fn resolve_host_python(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.python_path {
            let configured = PathBuf::from(path);
            if configured.exists() {
                return Ok(configured);
            }
            // Bare names like "python3.12" are looked up on PATH
            if let Ok(found) = which(path) {
                return Ok(found);
            }
        }

        which("python3")
            .or_else(|_| which("python"))
            .map_err(|_| ConfigError::PythonNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default_is_empty() {
        let settings = Settings::default();
        assert!(settings.is_empty());
        assert_eq!(settings.get_env_path(), PathBuf::from(".ppm.env"));
        assert_eq!(settings.get_manifest_path(), PathBuf::from("pyproject.toml"));
    }

    #[test]
    fn test_settings_set_get() {
        let mut settings = Settings::default();
        assert!(settings.set("env-path", "venv".to_string()).is_ok());
        assert_eq!(settings.get("env-path"), Some("venv".to_string()));
        assert_eq!(settings.get_env_path(), PathBuf::from("venv"));
        assert!(!settings.is_empty());
    }

    #[test]
    fn test_settings_unknown_key() {
        let mut settings = Settings::default();
        let result = settings.set("cache-path", "value".to_string());
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
        assert_eq!(settings.get("cache-path"), None);
    }

    #[test]
    fn test_values_iter_follows_key_order() {
        let settings = Settings {
            python_path: None,
            env_path: Some("env".to_string()),
            manifest_path: Some("custom.toml".to_string()),
        };
        let values = settings.values_iter();
        assert_eq!(
            values,
            vec![
                ("env-path", "env".to_string()),
                ("manifest-path", "custom.toml".to_string())
            ]
        );
    }

    #[test]
    fn test_save_and_load_from_path() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("nested").join("ppm.toml");
        let settings = Settings {
            python_path: Some("/usr/bin/python3".to_string()),
            ..Default::default()
        };
        assert!(settings.save_to_path(&path).is_ok());

        let loaded = Settings::load_from_path(&path);
        assert!(loaded.is_ok_and(|s| s == settings));
    }

    #[test]
    fn test_file_keys_match_cli_keys() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("ppm.toml");
        assert!(fs::write(&path, "env-path = \"venvs/app\"\n").is_ok());
        let loaded = Settings::load_from_path(&path);
        assert!(loaded.is_ok_and(|s| s.get("env-path").as_deref() == Some("venvs/app")));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let loaded = Settings::load_from_path(&temp_dir.path().join("missing.toml"));
        assert!(loaded.is_ok_and(|s| s.is_empty()));
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("ppm.toml");
        assert!(fs::write(&path, "env-path = [").is_ok());
        assert!(matches!(
            Settings::load_from_path(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_configured_python_path_is_used_when_present() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let fake_python = temp_dir.path().join("python3");
        assert!(fs::write(&fake_python, "").is_ok());
        let settings = Settings {
            python_path: Some(fake_python.to_string_lossy().to_string()),
            ..Default::default()
        };
        assert!(settings
            .resolve_host_python()
            .is_ok_and(|p| p == fake_python));
    }
}

//! Configuration management for ppm
//!
//! Holds the tool's own settings file and the helpers that locate the
//! interpreter and installer inside an isolated environment.

pub mod settings;
pub mod venv_paths;

pub use settings::{ConfigError, Settings, DEFAULT_ENV_PATH, DEFAULT_MANIFEST_PATH, SETTING_KEYS};
pub use venv_paths::{
    environment_exists, resolve_installer_exe, resolve_python_exe, VenvPathError, PYTHON_BIN_DIR,
};

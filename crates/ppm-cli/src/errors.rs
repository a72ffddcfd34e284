//! Centralized error types for ppm commands

use ppm_config::{ConfigError, VenvPathError};
use ppm_manifest::ManifestError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("No environment found at {}", .0.display())]
    NoEnvironment(PathBuf),

    #[error("Script {} not found", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Dependency resolution does not converge: '{0}' is still reported missing after it was installed")]
    DependencyCycle(String),

    #[error("Package {0} not found in dependencies")]
    PackageNotFound(String),

    #[error("Command failed: {command} (exit {status:?})")]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PackageError {
    /// Process exit code for this failure. Installer failures keep the installer's code.
    pub fn exit_code(&self) -> i32 {
        match self {
            PackageError::CommandFailed {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Captured diagnostic text of a failed installer call
    pub fn captured_stderr(&self) -> Option<&str> {
        match self {
            PackageError::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => {
                Some(stderr.trim_end())
            }
            _ => None,
        }
    }
}

impl From<VenvPathError> for PackageError {
    fn from(err: VenvPathError) -> Self {
        match err {
            VenvPathError::VenvNotFound(path) => PackageError::NoEnvironment(path),
            VenvPathError::PathResolution(msg) => PackageError::Environment(msg),
        }
    }
}

//! Path resolution inside isolated Python environments
//!
//! An environment created by `python -m venv` keeps its interpreter and its
//! installer under a platform-specific directory:
//! - `bin/` on Unix/macOS
//! - `Scripts/` on Windows

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The name of the binaries/scripts directory in a Python venv
/// "Scripts" on Windows, "bin" on Unix
#[cfg(windows)]
pub const PYTHON_BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const PYTHON_BIN_DIR: &str = "bin";

#[cfg(not(windows))]
const PYTHON_EXE_CANDIDATES: &[&str] = &["python", "python3"];
#[cfg(windows)]
const PYTHON_EXE_CANDIDATES: &[&str] = &["python.exe", "python3.exe"];

#[cfg(not(windows))]
const INSTALLER_EXE_CANDIDATES: &[&str] = &["pip", "pip3"];
#[cfg(windows)]
const INSTALLER_EXE_CANDIDATES: &[&str] = &["pip.exe", "pip3.exe"];

/// Error type for venv path resolution
#[derive(Debug, Clone, Error)]
pub enum VenvPathError {
    /// The venv path does not exist or is not a directory
    #[error("Virtual environment not found: {}", .0.display())]
    VenvNotFound(PathBuf),
    /// Failed to find a required directory or file
    #[error("{0}")]
    PathResolution(String),
}

/// Whether an environment has been materialized at `venv_path`
pub fn environment_exists(venv_path: &Path) -> bool {
    venv_path.is_dir()
}

/// Resolve the Python executable path for a virtual environment
///
/// - **Unix/macOS**: `.ppm.env/bin/python` or `.ppm.env/bin/python3`
/// - **Windows**: `.ppm.env\Scripts\python.exe`
pub fn resolve_python_exe(venv_path: &Path) -> Result<PathBuf, VenvPathError> {
    resolve_bin_exe(venv_path, PYTHON_EXE_CANDIDATES, "python")
}

/// Resolve the installer (pip) executable path for a virtual environment
pub fn resolve_installer_exe(venv_path: &Path) -> Result<PathBuf, VenvPathError> {
    resolve_bin_exe(venv_path, INSTALLER_EXE_CANDIDATES, "pip")
}

fn resolve_bin_exe(
    venv_path: &Path,
    candidates: &[&str],
    fallback_stem: &str,
) -> Result<PathBuf, VenvPathError> {
    if !venv_path.is_dir() {
        return Err(VenvPathError::VenvNotFound(venv_path.to_path_buf()));
    }

    let bin_dir = venv_path.join(PYTHON_BIN_DIR);
    if !bin_dir.is_dir() {
        return Err(VenvPathError::PathResolution(format!(
            "{} directory not found: {}",
            PYTHON_BIN_DIR,
            bin_dir.display()
        )));
    }

    for exe in candidates {
        let candidate = bin_dir.join(exe);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    // Fallback: versioned names such as python3.12 or pip3.12
    if let Ok(entries) = fs::read_dir(&bin_dir) {
        let mut matches: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| name.starts_with(fallback_stem))
                    && p.is_file()
            })
            .collect();
        matches.sort();
        if let Some(candidate) = matches.into_iter().next() {
            return Ok(candidate);
        }
    }

    Err(VenvPathError::PathResolution(format!(
        "{} executable not found in {}",
        fallback_stem,
        bin_dir.display()
    )))
}

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, validating or saving a manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Manifest not found: {}. Run `ppm init` to create one", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to edit manifest: {0}")]
    Edit(#[from] toml_edit::TomlError),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

//! Package references (`name` or `name==version`) and name normalization

use crate::errors::ManifestError;
use std::fmt;

/// Characters that end the name part of a requirement string
const SPEC_DELIMITERS: &[char] = &['=', '<', '>', '!', '~', ';', '[', '@', ' ', '\t'];

/// A package name plus an optional exact version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    pub name: String,
    pub version: Option<String>,
}

impl PackageRef {
    /// Parse `name` or `name==version`
    pub fn parse(input: &str) -> Result<Self, ManifestError> {
        let input = input.trim();
        let (name, version) = match input.split_once("==") {
            Some((name, version)) => (name.trim(), Some(version.trim())),
            None => (input, None),
        };

        if name.is_empty() || name.contains(|c: char| SPEC_DELIMITERS.contains(&c)) {
            return Err(ManifestError::Invalid(format!(
                "'{}' is not a package name or name==version",
                input
            )));
        }
        if version.is_some_and(str::is_empty) {
            return Err(ManifestError::Invalid(format!(
                "'{}' is missing a version after '=='",
                input
            )));
        }

        Ok(PackageRef {
            name: name.to_string(),
            version: version.map(str::to_string),
        })
    }

    pub fn pinned(name: &str, version: &str) -> Self {
        PackageRef {
            name: name.to_string(),
            version: Some(version.to_string()),
        }
    }

    /// Normalized bare name, used for every name comparison
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    /// Whether a manifest/installed entry refers to this package.
    /// With a version this is an exact pin match, otherwise a bare-name match.
    pub fn matches_spec(&self, spec: &str) -> bool {
        if normalize_name(bare_name(spec)) != self.key() {
            return false;
        }
        match &self.version {
            Some(version) => spec
                .split_once("==")
                .is_some_and(|(_, v)| v.trim() == version),
            None => true,
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}=={}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Name part of a requirement string (`requests==2.26.0` -> `requests`)
pub fn bare_name(spec: &str) -> &str {
    let spec = spec.trim();
    spec.split(SPEC_DELIMITERS).next().unwrap_or(spec).trim()
}

/// PEP 503 normalization: lowercase, runs of `-`, `_`, `.` become one `-`
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut last_was_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !last_was_separator {
                normalized.push('-');
            }
            last_was_separator = true;
        } else {
            normalized.extend(c.to_lowercase());
            last_was_separator = false;
        }
    }
    normalized
}

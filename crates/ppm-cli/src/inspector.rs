//! Installed-set inspection
//!
//! Snapshots of what is installed in a target (`pip freeze`) and of the
//! requirements the installer reports as unmet (`pip check`).

use crate::environment::{CommandOutput, Gateway, InstallerCommand, Target};
use crate::errors::PackageError;
use crate::logger;
use crate::package_spec::freeze_entry_name;
use once_cell::sync::Lazy;
use ppm_manifest::{bare_name, normalize_name};
use regex::Regex;
use std::collections::{HashMap, HashSet};

static REQUIRES_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"requires ([^,\s]+),"));

/// Installed packages of a target, as reported by `pip freeze`
#[derive(Debug, Clone, Default)]
pub struct InstalledSet {
    entries: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl InstalledSet {
    pub fn from_freeze(stdout: &str) -> Self {
        let mut set = InstalledSet::default();
        for line in stdout.lines() {
            let Some(name) = freeze_entry_name(line) else {
                continue;
            };
            set.by_name
                .entry(normalize_name(name))
                .or_insert(set.entries.len());
            set.entries.push(line.trim().to_string());
        }
        set
    }

    /// Installed entry for the package named by `spec` (bare name or any requirement string)
    pub fn find(&self, spec: &str) -> Option<&str> {
        self.by_name
            .get(&normalize_name(bare_name(spec)))
            .map(|&idx| self.entries[idx].as_str())
    }

    pub fn contains_name(&self, spec: &str) -> bool {
        self.find(spec).is_some()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How to read the exit status of `pip check`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Exit 0: no broken requirements
    Clean,
    /// Exit 1 with a report: requirements are broken, the check itself worked
    ProblemsFound,
    /// Any other outcome: the check could not run
    Failed,
}

impl CheckStatus {
    pub fn classify(output: &CommandOutput) -> Self {
        match output.status {
            Some(0) => CheckStatus::Clean,
            Some(1) if !output.stdout.trim().is_empty() => CheckStatus::ProblemsFound,
            _ => CheckStatus::Failed,
        }
    }
}

/// Snapshot the installed packages of `target`
pub fn list_installed<G: Gateway + ?Sized>(
    gateway: &G,
    target: &Target,
) -> Result<InstalledSet, PackageError> {
    let output = gateway.run_installer(target, InstallerCommand::Freeze, &[])?;
    if !output.success() {
        return Err(PackageError::Environment(format!(
            "Failed to get installed packages (exit code: {:?}): {}",
            output.status,
            output.stderr.trim()
        )));
    }

    let installed = InstalledSet::from_freeze(&output.stdout);
    logger::debug(&format!(
        "{} package(s) installed in {}",
        installed.len(),
        target
    ));
    Ok(installed)
}

/// Package names the installer reports as required but not installed.
///
/// Deduplicated by normalized name, in report order.
pub fn parse_missing_dependencies(report: &str) -> Result<Vec<String>, PackageError> {
    let pattern = (*REQUIRES_PATTERN)
        .as_ref()
        .map_err(|e| PackageError::Environment(format!("Invalid check report pattern: {}", e)))?;

    let mut seen = HashSet::new();
    Ok(pattern
        .captures_iter(report)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|name| seen.insert(normalize_name(name)))
        .collect())
}

/// Run `pip check` on `target` and return the missing requirements
pub fn check_missing_dependencies<G: Gateway + ?Sized>(
    gateway: &G,
    target: &Target,
) -> Result<Vec<String>, PackageError> {
    let output = gateway.run_installer(target, InstallerCommand::Check, &[])?;

    match CheckStatus::classify(&output) {
        CheckStatus::Clean => Ok(Vec::new()),
        CheckStatus::ProblemsFound => {
            let missing = parse_missing_dependencies(&output.stdout)?;
            if missing.is_empty() {
                // Only version conflicts; nothing ppm can install
                logger::warn(&format!(
                    "Installer reported dependency problems:\n{}",
                    output.stdout.trim_end()
                ));
            } else {
                logger::debug(&format!("Missing dependencies: {}", missing.join(", ")));
            }
            Ok(missing)
        }
        CheckStatus::Failed => Err(PackageError::Environment(format!(
            "Failed to check for missing dependencies (exit code: {:?}): {}",
            output.status,
            output.stderr.trim()
        ))),
    }
}

//! Reconciliation engine
//!
//! Aligns what the manifest declares, what the user requested and what is
//! installed in the target. Installs run in passes: each pass fetches the
//! installed set, installs what is absent and asks the installer which
//! requirements are still missing. Missing names become the next passes until
//! nothing is reported or a name comes back after it was already attempted.
//! The manifest is written once per command, after the last pass.

mod install;
mod uninstall;


use crate::environment::{Gateway, Target};
use ppm_manifest::ManifestStore;
use std::path::Path;

/// Result of an install reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Pins the installer reported as newly installed
    pub installed: Vec<String>,
    /// Requested entries skipped with the installed entry they matched
    pub already_installed: Vec<(String, String)>,
    /// Missing requirements picked up after `pip check`
    pub resolved_missing: Vec<String>,
    pub environment_created: bool,
    pub manifest_saved: bool,
}

impl InstallReport {
    pub fn is_noop(&self) -> bool {
        self.installed.is_empty() && self.resolved_missing.is_empty()
    }
}

/// Result of an uninstall reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallReport {
    /// Specs handed to the installer
    pub uninstalled: Vec<String>,
    /// Requested names with no manifest entry
    pub not_found: Vec<String>,
    pub manifest_saved: bool,
}

/// Runs install and uninstall reconciliation against one target.
///
/// The manifest is only consulted for isolated targets. `project_env` is the
/// project's environment directory, whichever target the command runs against.
pub struct Reconciler<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
    target: &'a Target,
    project_env: &'a Path,
    manifest: Option<&'a mut ManifestStore>,
}

impl<'a, G: Gateway + ?Sized> Reconciler<'a, G> {
    pub fn new(
        gateway: &'a G,
        target: &'a Target,
        project_env: &'a Path,
        manifest: Option<&'a mut ManifestStore>,
    ) -> Self {
        let manifest = if target.is_global() { None } else { manifest };
        Reconciler {
            gateway,
            target,
            project_env,
            manifest,
        }
    }

    fn save_manifest(&mut self) -> Result<bool, crate::errors::PackageError> {
        match self.manifest.as_deref_mut() {
            Some(store) => Ok(store.save_if_changed()?),
            None => Ok(false),
        }
    }
}

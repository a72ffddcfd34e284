//! Command handlers
//!
//! Each handler returns the process exit code or a [`PackageError`]; `main`
//! turns errors into messages and exit codes.

pub mod config;
pub mod init;
pub mod install;
pub mod list;
pub mod run;
pub mod shell;
pub mod uninstall;

use crate::environment::{SystemGateway, Target};
use crate::errors::PackageError;
use crate::logger;
use crate::GlobalOpts;
use ppm_config::Settings;
use ppm_manifest::ManifestStore;
use std::path::PathBuf;

/// Settings and paths resolved once per invocation
pub struct CommandContext {
    pub settings: Settings,
    pub manifest_path: PathBuf,
    pub env_path: PathBuf,
    pub gateway: SystemGateway,
}

impl CommandContext {
    /// Resolve paths from flags, then the settings file, then defaults
    pub fn load(opts: &GlobalOpts) -> Result<Self, PackageError> {
        let settings = Settings::load()?;
        Ok(Self::from_settings(settings, opts))
    }

    pub fn from_settings(settings: Settings, opts: &GlobalOpts) -> Self {
        let manifest_path = opts
            .manifest
            .clone()
            .unwrap_or_else(|| settings.get_manifest_path());
        let env_path = opts.env.clone().unwrap_or_else(|| settings.get_env_path());

        // A missing interpreter only matters once something needs it
        let host_python = match settings.resolve_host_python() {
            Ok(path) => Some(path),
            Err(e) => {
                logger::debug(&format!("Host interpreter unavailable: {}", e));
                None
            }
        };

        logger::debug(&format!(
            "Manifest: {}, environment: {}",
            manifest_path.display(),
            env_path.display()
        ));

        CommandContext {
            settings,
            manifest_path,
            env_path,
            gateway: SystemGateway::new(host_python),
        }
    }

    pub fn target(&self, global: bool) -> Target {
        Target::from_flag(global, &self.env_path)
    }

    /// Manifest for isolated targets; global targets never read it
    pub fn manifest_for(&self, target: &Target) -> Result<Option<ManifestStore>, PackageError> {
        if target.is_global() {
            return Ok(None);
        }
        Ok(Some(ManifestStore::load(&self.manifest_path)?))
    }
}

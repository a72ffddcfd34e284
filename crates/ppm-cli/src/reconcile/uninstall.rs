use super::{Reconciler, UninstallReport};
use crate::environment::{Gateway, InstallerCommand, Target};
use crate::errors::PackageError;
use crate::logger;
use ppm_manifest::PackageRef;

impl<G: Gateway + ?Sized> Reconciler<'_, G> {
    /// Uninstall `names` (bare names or exact pins).
    ///
    /// In an isolated target each name is looked up in the manifest first;
    /// names without an entry are reported and skipped. The manifest is saved
    /// once, after every name succeeded.
    ///
    /// The project environment must exist, also for the global target.
    pub fn uninstall(&mut self, names: &[String]) -> Result<UninstallReport, PackageError> {
        let project = Target::Isolated(self.project_env.to_path_buf());
        if !self.gateway.environment_exists(&project) {
            return Err(PackageError::NoEnvironment(self.project_env.to_path_buf()));
        }

        let mut report = UninstallReport::default();

        if let Target::Global = self.target {
            let mut args = vec!["-y".to_string()];
            args.extend(names.iter().cloned());
            self.uninstall_specs(&args)?;
            report.uninstalled.extend(names.iter().cloned());
            return Ok(report);
        }

        let references = names
            .iter()
            .map(|name| PackageRef::parse(name))
            .collect::<Result<Vec<_>, _>>()?;

        for (name, reference) in names.iter().zip(&references) {
            let Some(spec) = self
                .manifest
                .as_deref()
                .and_then(|store| store.find_dependency(reference))
                .map(str::to_string)
            else {
                logger::warn(&PackageError::PackageNotFound(name.clone()).to_string());
                report.not_found.push(name.clone());
                continue;
            };

            if let Some(store) = self.manifest.as_deref_mut() {
                store.remove_dependency(&spec);
            }
            self.uninstall_specs(&["-y".to_string(), spec.clone()])?;
            report.uninstalled.push(spec);
        }

        report.manifest_saved = self.save_manifest()?;
        Ok(report)
    }

    fn uninstall_specs(&self, args: &[String]) -> Result<(), PackageError> {
        let output = self
            .gateway
            .run_installer(self.target, InstallerCommand::Uninstall, args)?;
        if output.success() {
            Ok(())
        } else {
            Err(PackageError::CommandFailed {
                command: InstallerCommand::Uninstall.describe(args),
                status: output.status,
                stderr: output.stderr,
            })
        }
    }
}

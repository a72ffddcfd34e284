use super::{InstallReport, Reconciler};
use crate::environment::{Gateway, InstallerCommand, Target};
use crate::errors::PackageError;
use crate::inspector::{check_missing_dependencies, list_installed};
use crate::logger;
use crate::package_spec::parse_successfully_installed;
use ppm_manifest::{bare_name, normalize_name};
use std::collections::{HashSet, VecDeque};

impl<G: Gateway + ?Sized> Reconciler<'_, G> {
    /// Install `requested`, or every manifest dependency when it is empty.
    ///
    /// # Errors
    ///
    /// Returns `CommandFailed` when the installer rejects an entry,
    /// `DependencyCycle` when a missing requirement keeps coming back, and
    /// `Environment`/`NoEnvironment` when the target cannot be queried.
    pub fn install(&mut self, requested: &[String]) -> Result<InstallReport, PackageError> {
        let mut report = InstallReport::default();

        if let Target::Isolated(path) = self.target {
            report.environment_created = self.gateway.ensure_environment(path)?;
        }

        let work_list = self.initial_work_list(requested);
        if work_list.is_empty() {
            logger::debug("Nothing to install");
            return Ok(report);
        }

        let outcome = self.run_passes(work_list, &mut report);
        report.manifest_saved = self.save_manifest()?;
        outcome.map(|()| report)
    }

    /// Install passes until no requirement is missing. Pins are recorded in
    /// memory only; the caller persists them once, whatever the outcome.
    fn run_passes(
        &mut self,
        work_list: Vec<String>,
        report: &mut InstallReport,
    ) -> Result<(), PackageError> {
        let mut attempted: HashSet<String> = HashSet::new();
        let mut queued: HashSet<String> = work_list
            .iter()
            .map(|entry| normalize_name(bare_name(entry)))
            .collect();
        let mut passes: VecDeque<Vec<String>> = VecDeque::from([work_list]);

        while let Some(pass) = passes.pop_front() {
            self.run_pass(&pass, report)?;
            for entry in &pass {
                let key = normalize_name(bare_name(entry));
                queued.remove(&key);
                attempted.insert(key);
            }

            for name in check_missing_dependencies(self.gateway, self.target)? {
                let key = normalize_name(bare_name(&name));
                if attempted.contains(&key) {
                    return Err(PackageError::DependencyCycle(name));
                }
                if queued.insert(key) {
                    logger::info(&format!("Resolving missing dependency {}", name));
                    report.resolved_missing.push(name.clone());
                    passes.push_back(vec![name]);
                }
            }
        }

        Ok(())
    }

    /// Requested entries, else the manifest dependencies; one entry per package
    fn initial_work_list(&self, requested: &[String]) -> Vec<String> {
        let entries: &[String] = if requested.is_empty() {
            match self.manifest.as_deref() {
                Some(store) => store.dependencies(),
                None => &[],
            }
        } else {
            requested
        };

        let mut seen = HashSet::new();
        entries
            .iter()
            .filter(|entry| seen.insert(normalize_name(bare_name(entry))))
            .cloned()
            .collect()
    }

    /// One pass over `entries`
    fn run_pass(
        &mut self,
        entries: &[String],
        report: &mut InstallReport,
    ) -> Result<(), PackageError> {
        logger::step(&format!("Install pass over: {}", entries.join(", ")));
        let installed = list_installed(self.gateway, self.target)?;

        for entry in entries {
            if let Some(existing) = installed.find(entry) {
                logger::info(&format!("{} is already installed ({})", entry, existing));
                report
                    .already_installed
                    .push((entry.clone(), existing.to_string()));
                continue;
            }

            let args = vec![entry.clone(), "--no-deps".to_string()];
            let output = self
                .gateway
                .run_installer(self.target, InstallerCommand::Install, &args)?;

            if !output.success() {
                return Err(PackageError::CommandFailed {
                    command: InstallerCommand::Install.describe(&args),
                    status: output.status,
                    stderr: output.stderr,
                });
            }

            match self.manifest.as_deref_mut() {
                Some(store) => {
                    for pin in parse_successfully_installed(&output.stdout) {
                        store.add_dependency(&pin);
                        report.installed.push(pin);
                    }
                }
                None => report.installed.push(entry.clone()),
            }
        }

        Ok(())
    }
}

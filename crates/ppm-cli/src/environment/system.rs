use super::{CommandOutput, Gateway, InstallerCommand, Program, Target};
use crate::errors::PackageError;
use crate::logger;
use ppm_config::{environment_exists, resolve_installer_exe, resolve_python_exe};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Gateway backed by real child processes
#[derive(Debug, Clone)]
pub struct SystemGateway {
    host_python: Option<PathBuf>,
}

impl SystemGateway {
    pub fn new(host_python: Option<PathBuf>) -> Self {
        SystemGateway { host_python }
    }

    fn host_python(&self) -> Result<&Path, PackageError> {
        self.host_python.as_deref().ok_or_else(|| {
            PackageError::Environment(
                "No host Python interpreter found. Set one with `ppm config set python-path <path>`"
                    .to_string(),
            )
        })
    }

    fn installer_command(&self, target: &Target) -> Result<Command, PackageError> {
        match target {
            Target::Global => {
                let mut cmd = Command::new(self.host_python()?);
                cmd.args(["-m", "pip"]);
                Ok(cmd)
            }
            Target::Isolated(path) => Ok(Command::new(resolve_installer_exe(path)?)),
        }
    }

    fn interpreter_command(&self, target: &Target) -> Result<Command, PackageError> {
        match target {
            Target::Global => Ok(Command::new(self.host_python()?)),
            Target::Isolated(path) => Ok(Command::new(resolve_python_exe(path)?)),
        }
    }
}

impl Gateway for SystemGateway {
    fn run_installer(
        &self,
        target: &Target,
        command: InstallerCommand,
        args: &[String],
    ) -> Result<CommandOutput, PackageError> {
        let description = command.describe(args);
        let mut cmd = self.installer_command(target)?;
        cmd.arg(command.as_str()).args(args);

        logger::debug(&format!("Running: {} ({})", description, target));

        let mutating = matches!(
            command,
            InstallerCommand::Install | InstallerCommand::Uninstall
        );
        if mutating {
            logger::spinner_start(&description);
        }
        let output = cmd.output();
        if mutating {
            logger::spinner_stop();
        }

        let output = output.map_err(|e| {
            PackageError::Environment(format!("Failed to run {}: {}", description, e))
        })?;
        logger::capture_output(&description, &output);

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn environment_exists(&self, target: &Target) -> bool {
        match target {
            Target::Global => true,
            Target::Isolated(path) => environment_exists(path),
        }
    }

    fn ensure_environment(&self, path: &Path) -> Result<bool, PackageError> {
        if environment_exists(path) {
            logger::debug(&format!("Using existing environment: {}", path.display()));
            return Ok(false);
        }

        let python = self.host_python()?;
        logger::info(&format!("Creating environment at {}", path.display()));
        logger::spinner_start(&format!("Creating environment {}", path.display()));

        let output = Command::new(python)
            .args(["-m", "venv"])
            .arg(path)
            .output();
        logger::spinner_stop();

        let output = output.map_err(|e| {
            PackageError::Environment(format!("Failed to run {} -m venv: {}", python.display(), e))
        })?;
        logger::capture_output(&format!("{} -m venv {}", python.display(), path.display()), &output);

        if !output.status.success() {
            return Err(PackageError::Environment(format!(
                "Failed to create environment at {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        logger::success(&format!("Created environment {}", path.display()));
        Ok(true)
    }

    fn run_interactive(
        &self,
        target: &Target,
        program: Program,
        args: &[String],
    ) -> Result<i32, PackageError> {
        let mut cmd = match program {
            Program::Installer => self.installer_command(target)?,
            Program::Interpreter => self.interpreter_command(target)?,
        };
        logger::debug(&format!("Running {:?} in {} with {:?}", program, target, args));

        let status = cmd
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| PackageError::Environment(format!("Failed to launch {:?}: {}", program, e)))?;

        Ok(status.code().unwrap_or(1))
    }
}

//! Environment gateway
//!
//! Every installer and interpreter invocation goes through a [`Gateway`]. The
//! destination is a [`Target`]: the host interpreter, or an isolated
//! environment directory.

pub mod system;

pub use system::SystemGateway;

use crate::errors::PackageError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where installer operations run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The host interpreter (`python -m pip`)
    Global,
    /// An environment directory with its own interpreter and pip
    Isolated(PathBuf),
}

impl Target {
    pub fn from_flag(global: bool, env_path: &Path) -> Self {
        if global {
            Target::Global
        } else {
            Target::Isolated(env_path.to_path_buf())
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Target::Global)
    }

    pub fn env_path(&self) -> Option<&Path> {
        match self {
            Target::Global => None,
            Target::Isolated(path) => Some(path),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Global => write!(f, "global environment"),
            Target::Isolated(path) => write!(f, "environment {}", path.display()),
        }
    }
}

/// Installer subcommands ppm relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallerCommand {
    Install,
    Uninstall,
    List,
    Check,
    Freeze,
}

impl InstallerCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            InstallerCommand::Install => "install",
            InstallerCommand::Uninstall => "uninstall",
            InstallerCommand::List => "list",
            InstallerCommand::Check => "check",
            InstallerCommand::Freeze => "freeze",
        }
    }

    /// Human-readable command line, used in logs and error messages
    pub fn describe(self, args: &[String]) -> String {
        let mut line = format!("pip {}", self.as_str());
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Program of a target launched with inherited stdio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    Installer,
    Interpreter,
}

/// Captured result of an installer call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

pub trait Gateway {
    /// Run an installer subcommand against `target` and capture its output.
    ///
    /// A non-zero exit is returned to the caller, not turned into an error.
    /// Only a failure to start the installer is an error.
    fn run_installer(
        &self,
        target: &Target,
        command: InstallerCommand,
        args: &[String],
    ) -> Result<CommandOutput, PackageError>;

    /// The global target always exists
    fn environment_exists(&self, target: &Target) -> bool;

    /// Create the environment at `path` unless it exists. Returns whether it created one.
    fn ensure_environment(&self, path: &Path) -> Result<bool, PackageError>;

    /// Run the installer or interpreter of `target` attached to the terminal
    fn run_interactive(
        &self,
        target: &Target,
        program: Program,
        args: &[String],
    ) -> Result<i32, PackageError>;
}

//! In-memory gateway used by unit tests

use crate::environment::{CommandOutput, Gateway, InstallerCommand, Program, Target};
use crate::errors::PackageError;
use ppm_manifest::{bare_name, normalize_name};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

struct IndexEntry {
    name: String,
    version: String,
    requires: Vec<String>,
}

/// Simulates pip against one environment.
///
/// `pip check` output is computed from the requirements of installed packages
/// unless scripted outputs are queued with [`FakeGateway::with_check_output`].
pub struct FakeGateway {
    env_exists: Cell<bool>,
    created: Cell<bool>,
    installed: RefCell<Vec<String>>,
    index: HashMap<String, IndexEntry>,
    failing: HashMap<String, i32>,
    freeze_failure: Option<i32>,
    check_script: RefCell<VecDeque<CommandOutput>>,
    calls: RefCell<Vec<(InstallerCommand, Vec<String>)>>,
    watched: Option<PathBuf>,
    snapshots: RefCell<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        FakeGateway {
            env_exists: Cell::new(true),
            created: Cell::new(false),
            installed: RefCell::new(Vec::new()),
            index: HashMap::new(),
            failing: HashMap::new(),
            freeze_failure: None,
            check_script: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
            watched: None,
            snapshots: RefCell::new(Vec::new()),
        }
    }

    pub fn without_environment(self) -> Self {
        self.env_exists.set(false);
        self
    }

    /// Make `name==version` installable, requiring `requires`
    pub fn with_package(mut self, name: &str, version: &str, requires: &[&str]) -> Self {
        self.index.insert(
            normalize_name(name),
            IndexEntry {
                name: name.to_string(),
                version: version.to_string(),
                requires: requires.iter().map(|r| r.to_string()).collect(),
            },
        );
        self
    }

    pub fn with_installed(self, spec: &str) -> Self {
        self.installed.borrow_mut().push(spec.to_string());
        self
    }

    /// Installing or uninstalling `name` exits with `code`
    pub fn failing(mut self, name: &str, code: i32) -> Self {
        self.failing.insert(normalize_name(name), code);
        self
    }

    pub fn with_freeze_failure(mut self, code: i32) -> Self {
        self.freeze_failure = Some(code);
        self
    }

    pub fn with_check_output(self, status: Option<i32>, stdout: &str) -> Self {
        self.check_script.borrow_mut().push_back(CommandOutput {
            status,
            stdout: stdout.to_string(),
            stderr: String::new(),
        });
        self
    }

    /// Record the content of `path` every time `pip check` runs
    pub fn watching(mut self, path: &Path) -> Self {
        self.watched = Some(path.to_path_buf());
        self
    }

    pub fn snapshots(&self) -> Vec<String> {
        self.snapshots.borrow().clone()
    }

    pub fn installed(&self) -> Vec<String> {
        self.installed.borrow().clone()
    }

    pub fn environment_created(&self) -> bool {
        self.created.get()
    }

    pub fn calls(&self) -> Vec<(InstallerCommand, Vec<String>)> {
        self.calls.borrow().clone()
    }

    /// Arguments of every call to `command`
    pub fn calls_to(&self, command: InstallerCommand) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|(c, _)| *c == command)
            .map(|(_, args)| args.clone())
            .collect()
    }

    fn is_installed(&self, name: &str) -> bool {
        let key = normalize_name(name);
        self.installed
            .borrow()
            .iter()
            .any(|spec| normalize_name(bare_name(spec)) == key)
    }

    fn install(&self, args: &[String]) -> CommandOutput {
        let spec = args.first().cloned().unwrap_or_default();
        let key = normalize_name(bare_name(&spec));

        if let Some(code) = self.failing.get(&key) {
            return failure(*code, &format!("ERROR: Could not install packages: {}", spec));
        }
        let Some(entry) = self.index.get(&key) else {
            return failure(
                1,
                &format!("ERROR: No matching distribution found for {}", spec),
            );
        };

        let version = spec
            .split_once("==")
            .map_or(entry.version.clone(), |(_, v)| v.to_string());
        self.installed
            .borrow_mut()
            .retain(|installed| normalize_name(bare_name(installed)) != key);
        self.installed
            .borrow_mut()
            .push(format!("{}=={}", entry.name, version));

        CommandOutput {
            status: Some(0),
            stdout: format!(
                "Collecting {}\nInstalling collected packages: {}\nSuccessfully installed {}-{}\n",
                spec, entry.name, entry.name, version
            ),
            stderr: String::new(),
        }
    }

    fn uninstall(&self, args: &[String]) -> CommandOutput {
        let mut stdout = String::new();
        for spec in args.iter().filter(|a| !a.starts_with('-')) {
            let key = normalize_name(bare_name(spec));
            if let Some(code) = self.failing.get(&key) {
                return failure(*code, &format!("ERROR: Cannot uninstall {}", spec));
            }
            if self.is_installed(spec) {
                self.installed
                    .borrow_mut()
                    .retain(|installed| normalize_name(bare_name(installed)) != key);
                stdout.push_str(&format!("  Successfully uninstalled {}\n", spec));
            } else {
                stdout.push_str(&format!("WARNING: Skipping {} as it is not installed.\n", spec));
            }
        }
        CommandOutput {
            status: Some(0),
            stdout,
            stderr: String::new(),
        }
    }

    fn check(&self) -> CommandOutput {
        if let Some(path) = &self.watched {
            self.snapshots
                .borrow_mut()
                .push(fs::read_to_string(path).unwrap_or_default());
        }
        if let Some(scripted) = self.check_script.borrow_mut().pop_front() {
            return scripted;
        }

        let mut report = String::new();
        for spec in self.installed.borrow().iter() {
            let Some(entry) = self.index.get(&normalize_name(bare_name(spec))) else {
                continue;
            };
            for dep in entry.requires.iter().filter(|d| !self.is_installed(d)) {
                report.push_str(&format!(
                    "{} {} requires {}, which is not installed.\n",
                    entry.name, entry.version, dep
                ));
            }
        }

        if report.is_empty() {
            CommandOutput {
                status: Some(0),
                stdout: "No broken requirements found.\n".to_string(),
                stderr: String::new(),
            }
        } else {
            CommandOutput {
                status: Some(1),
                stdout: report,
                stderr: String::new(),
            }
        }
    }
}

fn failure(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        status: Some(code),
        stdout: String::new(),
        stderr: format!("{}\n", stderr),
    }
}

impl Gateway for FakeGateway {
    fn run_installer(
        &self,
        target: &Target,
        command: InstallerCommand,
        args: &[String],
    ) -> Result<CommandOutput, PackageError> {
        if !self.environment_exists(target) {
            if let Some(path) = target.env_path() {
                return Err(PackageError::NoEnvironment(path.to_path_buf()));
            }
        }
        self.calls.borrow_mut().push((command, args.to_vec()));

        Ok(match command {
            InstallerCommand::Install => self.install(args),
            InstallerCommand::Uninstall => self.uninstall(args),
            InstallerCommand::Check => self.check(),
            InstallerCommand::Freeze => match self.freeze_failure {
                Some(code) => failure(code, "ERROR: freeze failed"),
                None => CommandOutput {
                    status: Some(0),
                    stdout: self
                        .installed
                        .borrow()
                        .iter()
                        .map(|spec| format!("{}\n", spec))
                        .collect(),
                    stderr: String::new(),
                },
            },
            InstallerCommand::List => CommandOutput {
                status: Some(0),
                ..Default::default()
            },
        })
    }

    fn environment_exists(&self, target: &Target) -> bool {
        target.is_global() || self.env_exists.get()
    }

    fn ensure_environment(&self, _path: &Path) -> Result<bool, PackageError> {
        if self.env_exists.get() {
            return Ok(false);
        }
        self.env_exists.set(true);
        self.created.set(true);
        Ok(true)
    }

    fn run_interactive(
        &self,
        target: &Target,
        _program: Program,
        _args: &[String],
    ) -> Result<i32, PackageError> {
        if self.environment_exists(target) {
            Ok(0)
        } else {
            Err(PackageError::NoEnvironment(
                target.env_path().unwrap_or(Path::new("")).to_path_buf(),
            ))
        }
    }
}

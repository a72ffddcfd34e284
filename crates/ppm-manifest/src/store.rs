//! Manifest store - loading, dependency mutation and persistence
//!
//! A store is loaded once per command, mutated in memory and written back at
//! most once. Saving a loaded manifest only rewrites `project.dependencies`
//! in the original text; comments, key order and other tables are kept as is.

use crate::errors::ManifestError;
use crate::package_ref::{bare_name, normalize_name, PackageRef};
use crate::types::PyProject;
use std::io::Write;
use std::path::{Path, PathBuf};
use toml_edit::{Array, DocumentMut, Item, Value};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
    document: PyProject,
    /// Text of the file as loaded; `None` for a store that was never written
    source: Option<DocumentMut>,
    dirty: bool,
}

impl ManifestStore {
    /// Load and validate the manifest at `path`
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        debug!("Loading manifest from {:?}", path);
        if !path.exists() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let document: PyProject = toml::from_str(&content)?;
        document.validate().map_err(ManifestError::Invalid)?;
        let source: DocumentMut = content.parse()?;

        info!(
            "Manifest loaded: {} ({} dependencies)",
            document.project.name,
            document.project.dependencies.len()
        );

        Ok(ManifestStore {
            path: path.to_path_buf(),
            document,
            source: Some(source),
            dirty: false,
        })
    }

    /// New store for a document that has not been written yet
    pub fn create(path: &Path, document: PyProject) -> Self {
        ManifestStore {
            path: path.to_path_buf(),
            document,
            source: None,
            dirty: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &PyProject {
        &self.document
    }

    pub fn dependencies(&self) -> &[String] {
        &self.document.project.dependencies
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record a pin. Returns whether the dependency list changed.
    ///
    /// An entry for the same package with another pin is replaced in place so
    /// the list keeps one entry per package.
    pub fn add_dependency(&mut self, spec: &str) -> bool {
        let spec = spec.trim();
        let deps = &mut self.document.project.dependencies;
        if deps.iter().any(|dep| dep == spec) {
            return false;
        }

        let key = normalize_name(bare_name(spec));
        if let Some(existing) = deps
            .iter_mut()
            .find(|dep| normalize_name(bare_name(dep)) == key)
        {
            debug!("Replacing dependency {} with {}", existing, spec);
            *existing = spec.to_string();
        } else {
            deps.push(spec.to_string());
        }
        self.dirty = true;
        true
    }

    /// Remove an exact entry. Returns whether it was present.
    pub fn remove_dependency(&mut self, spec: &str) -> bool {
        let deps = &mut self.document.project.dependencies;
        match deps.iter().position(|dep| dep == spec) {
            Some(idx) => {
                deps.remove(idx);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// First entry matching `reference` (exact pin if it has a version, bare name otherwise)
    pub fn find_dependency(&self, reference: &PackageRef) -> Option<&str> {
        self.dependencies()
            .iter()
            .find(|dep| reference.matches_spec(dep))
            .map(String::as_str)
    }

    /// Write the manifest with an atomic temp-file rename
    pub fn save(&mut self) -> Result<(), ManifestError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = match self.source.as_mut() {
            Some(source) => {
                write_dependencies(source, &self.document.project.dependencies)?;
                source.to_string()
            }
            None => toml::to_string_pretty(&self.document)?,
        };

        let temp_path = self.path.with_extension("toml.tmp");
        {
            let file = std::fs::File::create(&temp_path)?;
            let mut writer = std::io::BufWriter::new(file);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }
        std::fs::rename(&temp_path, &self.path)?;

        if self.source.is_none() {
            self.source = Some(content.parse()?);
        }
        self.dirty = false;
        info!("Manifest saved to {:?}", self.path);
        Ok(())
    }

    /// Save only when the in-memory document changed. Returns whether it wrote.
    pub fn save_if_changed(&mut self) -> Result<bool, ManifestError> {
        if !self.dirty {
            debug!("Manifest unchanged, skipping save");
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

/// Bring `project.dependencies` of `source` in line with `deps`.
///
/// Entries that stay keep their formatting; a changed pin is rewritten at its
/// position and new entries are appended.
fn write_dependencies(source: &mut DocumentMut, deps: &[String]) -> Result<(), ManifestError> {
    let project = source
        .get_mut("project")
        .and_then(Item::as_table_like_mut)
        .ok_or_else(|| ManifestError::Invalid("missing [project] table".to_string()))?;

    match project.get_mut("dependencies").and_then(Item::as_array_mut) {
        Some(array) => sync_array(array, deps),
        None => {
            let mut array = Array::new();
            sync_array(&mut array, deps);
            project.insert("dependencies", toml_edit::value(array));
        }
    }
    Ok(())
}

fn sync_array(array: &mut Array, deps: &[String]) {
    let same_package =
        |a: &str, b: &str| normalize_name(bare_name(a)) == normalize_name(bare_name(b));

    array.retain(|item| {
        item.as_str()
            .is_some_and(|entry| deps.iter().any(|dep| same_package(dep, entry)))
    });

    for (idx, dep) in deps.iter().enumerate() {
        let existing = array.get(idx).and_then(Value::as_str).map(str::to_string);
        match existing {
            Some(existing) if existing == *dep => {}
            Some(existing) if same_package(&existing, dep) => {
                let mut value = Value::from(dep.as_str());
                if let Some(old) = array.get(idx) {
                    *value.decor_mut() = old.decor().clone();
                }
                array.replace_formatted(idx, value);
            }
            _ => array.insert(idx, dep.as_str()),
        }
    }
    while array.len() > deps.len() {
        array.remove(array.len() - 1);
    }
}

use serde::{Deserialize, Serialize};

/// Typed view of a `pyproject.toml`.
///
/// Only the fields ppm manages are typed; every other table and key is kept
/// in the flattened `extra` tables and written back unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PyProject {
    #[serde(
        rename = "build-system",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub build_system: Option<BuildSystem>,
    pub project: Project,
    #[serde(flatten)]
    pub extra: toml::Table,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BuildSystem {
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(
        rename = "build-backend",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub build_backend: Option<String>,
    #[serde(flatten)]
    pub extra: toml::Table,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Author>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<Readme>,
    /// Ordered `name==version` pins
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// `authors` entries: ppm writes plain strings, PEP 621 files use tables
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Table(toml::Table),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Readme {
    File(String),
    Table(toml::Table),
}

impl PyProject {
    /// Document written by `ppm init`
    pub fn new_project(name: &str, authors: &[String], description: &str) -> Self {
        PyProject {
            build_system: Some(BuildSystem {
                requires: vec!["setuptools>=61.0".to_string()],
                build_backend: Some("setuptools.build_meta".to_string()),
                extra: toml::Table::new(),
            }),
            project: Project {
                name: name.to_string(),
                version: Some("0.1.0".to_string()),
                authors: Some(authors.iter().cloned().map(Author::Name).collect()),
                description: Some(description.to_string()),
                readme: Some(Readme::File("README.md".to_string())),
                dependencies: Vec::new(),
                extra: toml::Table::new(),
            },
            extra: toml::Table::new(),
        }
    }

    /// Checks serde cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.project.name.trim().is_empty() {
            return Err("[project] name must not be empty".to_string());
        }
        if let Some(dep) = self.project.dependencies.iter().find(|d| d.trim().is_empty()) {
            return Err(format!("[project] dependencies contains an empty entry: {:?}", dep));
        }
        Ok(())
    }
}

//! ppm manifest management
//!
//! Typed model of a project's `pyproject.toml` and the store that loads,
//! mutates and persists its dependency list.

pub mod errors;
pub mod package_ref;
pub mod store;
pub mod types;

pub use errors::ManifestError;
pub use package_ref::{bare_name, normalize_name, PackageRef};
pub use store::ManifestStore;
pub use types::{Author, BuildSystem, Project, PyProject, Readme};

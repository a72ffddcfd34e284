//! ppm library - expose modules for testing
//!
//! The binary in `main.rs` is a thin argument parser over these modules.

pub mod commands;
pub mod common;
pub mod environment;
pub mod errors;
pub mod inspector;
pub mod package_spec;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod testing;

pub use common::GlobalOpts;
pub use ppm_logger as logger;

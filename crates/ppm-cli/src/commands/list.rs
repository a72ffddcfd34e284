use super::CommandContext;
use crate::environment::{Gateway, Program};
use crate::errors::PackageError;
use crate::logger;

/// Arguments for `pip list`
pub fn list_args(outdated: bool) -> Vec<String> {
    let mut args = vec!["list".to_string()];
    if outdated {
        args.push("--outdated".to_string());
    }
    args
}

/// Show installed packages with the installer's own output
pub fn handle_list(ctx: &CommandContext, global: bool, outdated: bool) -> Result<i32, PackageError> {
    let target = ctx.target(global);
    if !ctx.gateway.environment_exists(&target) {
        if let Some(path) = target.env_path() {
            return Err(PackageError::NoEnvironment(path.to_path_buf()));
        }
    }

    logger::debug(&format!("Listing packages in {}", target));
    ctx.gateway
        .run_interactive(&target, Program::Installer, &list_args(outdated))
}

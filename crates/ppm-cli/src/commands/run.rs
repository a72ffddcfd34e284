use super::CommandContext;
use crate::environment::{Gateway, Program, Target};
use crate::errors::PackageError;
use crate::logger;
use std::path::Path;

/// Run a script with the environment interpreter, creating the environment if needed
pub fn handle_run(
    ctx: &CommandContext,
    script: &Path,
    args: &[String],
) -> Result<i32, PackageError> {
    if !script.exists() {
        return Err(PackageError::ScriptNotFound(script.to_path_buf()));
    }

    ctx.gateway.ensure_environment(&ctx.env_path)?;

    let mut argv = vec![script.display().to_string()];
    argv.extend(args.iter().cloned());

    logger::debug(&format!("Running {}", argv.join(" ")));
    let target = Target::Isolated(ctx.env_path.clone());
    ctx.gateway
        .run_interactive(&target, Program::Interpreter, &argv)
}

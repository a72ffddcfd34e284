use super::CommandContext;
use crate::environment::{Gateway, Program};
use crate::errors::PackageError;

/// Start the interactive interpreter of the target. An isolated target must
/// already exist.
pub fn handle_cli(ctx: &CommandContext, global: bool) -> Result<i32, PackageError> {
    let target = ctx.target(global);
    ctx.gateway.run_interactive(&target, Program::Interpreter, &[])
}

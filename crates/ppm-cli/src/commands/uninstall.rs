use super::CommandContext;
use crate::errors::PackageError;
use crate::reconcile::Reconciler;
use colored::*;
use std::time::Instant;

pub fn handle_uninstall(
    ctx: &CommandContext,
    names: &[String],
    global: bool,
) -> Result<i32, PackageError> {
    let target = ctx.target(global);
    let mut manifest = ctx.manifest_for(&target)?;

    let start = Instant::now();
    let report = Reconciler::new(&ctx.gateway, &target, &ctx.env_path, manifest.as_mut())
        .uninstall(names)?;
    let elapsed = start.elapsed().as_millis();

    for spec in &report.uninstalled {
        println!(" {} {}", "-".bold().red(), spec);
    }
    let summary = match report.uninstalled.len() {
        0 => "No packages removed".to_string(),
        1 => format!("Removed 1 package in {}ms", elapsed),
        n => format!("Removed {} packages in {}ms", n, elapsed),
    };
    println!("{}", summary.dimmed());
    Ok(0)
}

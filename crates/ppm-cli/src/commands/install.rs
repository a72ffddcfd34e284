use super::CommandContext;
use crate::errors::PackageError;
use crate::logger;
use crate::reconcile::{InstallReport, Reconciler};
use colored::*;
use std::time::Instant;

/// Install packages, or sync the environment with the manifest when `names` is empty
pub fn handle_install(
    ctx: &CommandContext,
    names: &[String],
    global: bool,
) -> Result<i32, PackageError> {
    let target = ctx.target(global);
    // Load before touching the environment so a broken manifest aborts early
    let mut manifest = ctx.manifest_for(&target)?;

    let start = Instant::now();
    let report =
        Reconciler::new(&ctx.gateway, &target, &ctx.env_path, manifest.as_mut()).install(names)?;
    print_report(&report, start.elapsed().as_millis());

    if report.manifest_saved {
        logger::debug(&format!("Updated {}", ctx.manifest_path.display()));
    }
    Ok(0)
}

fn print_report(report: &InstallReport, elapsed_ms: u128) {
    for (requested, existing) in &report.already_installed {
        if requested == existing {
            println!(" {} {} is already installed", "=".dimmed(), requested);
        } else {
            println!(
                " {} {} is already installed ({})",
                "=".dimmed(),
                requested,
                existing.dimmed()
            );
        }
    }
    for pin in &report.installed {
        println!(" {} {}", "+".bold().green(), pin);
    }

    let summary = match report.installed.len() {
        0 => format!("Audited packages in {}ms", elapsed_ms),
        1 => format!("Installed 1 package in {}ms", elapsed_ms),
        n => format!("Installed {} packages in {}ms", n, elapsed_ms),
    };
    println!("{}", summary.dimmed());
}

use super::CommandContext;
use crate::environment::Gateway;
use crate::errors::PackageError;
use crate::logger;
use colored::*;
use ppm_manifest::{ManifestError, ManifestStore, PyProject};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Values for a new manifest; missing ones are prompted for
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    pub name: Option<String>,
    pub authors: Option<String>,
    pub description: Option<String>,
}

/// Split a comma-separated author list, dropping empty entries
pub fn parse_authors(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(str::to_string)
        .collect()
}

fn prompt<R: BufRead>(input: &mut R, question: &str, default: Option<&str>) -> io::Result<String> {
    match default {
        Some(default) => {
            let hint = format!("({}) ›", default);
            print!("{} {} {} ", "?".bold().cyan(), question, hint.as_str().dimmed());
        }
        None => print!("{} {} {} ", "?".bold().cyan(), question, "›".dimmed()),
    }
    io::stdout().flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;
    let response = response.trim();
    if response.is_empty() {
        Ok(default.unwrap_or_default().to_string())
    } else {
        Ok(response.to_string())
    }
}

fn confirm_overwrite<R: BufRead>(input: &mut R, path: &Path) -> io::Result<bool> {
    if std::env::var("PPM_INIT_YES").is_ok() {
        logger::debug("Skipping confirmation (PPM_INIT_YES set)");
        return Ok(true);
    }
    print!(
        "{} File '{}' already exists. Overwrite? {} ",
        "?".bold().cyan(),
        path.display(),
        "[y/n] ›".dimmed()
    );
    io::stdout().flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Fill in the values not given on the command line
pub fn collect_values<R: BufRead>(
    input: &mut R,
    args: InitArgs,
    default_name: &str,
) -> Result<(String, Vec<String>, String), PackageError> {
    let name = match args.name {
        Some(name) => name,
        None => prompt(input, "Project name:", Some(default_name))?,
    };
    if name.trim().is_empty() {
        return Err(ManifestError::Invalid("project name cannot be empty".to_string()).into());
    }
    let authors = match args.authors {
        Some(authors) => authors,
        None => prompt(input, "Authors (comma separated):", None)?,
    };
    let description = match args.description {
        Some(description) => description,
        None => prompt(input, "Description:", None)?,
    };
    Ok((name.trim().to_string(), parse_authors(&authors), description))
}

/// Write a new manifest at `path` unless an existing one should be kept.
///
/// Returns the project name when a manifest was written, `None` when the
/// overwrite was declined.
pub fn write_manifest<R: BufRead>(
    input: &mut R,
    path: &Path,
    args: InitArgs,
    default_name: &str,
) -> Result<Option<String>, PackageError> {
    if path.exists() && !confirm_overwrite(input, path)? {
        logger::info(&format!("Keeping existing {}", path.display()));
        return Ok(None);
    }

    let (name, authors, description) = collect_values(input, args, default_name)?;
    let mut store = ManifestStore::create(path, PyProject::new_project(&name, &authors, &description));
    store.save()?;
    logger::success(&format!("Created {}", path.display()));
    Ok(Some(name))
}

/// Create the manifest and the project environment
pub fn handle_init(ctx: &CommandContext, args: InitArgs) -> Result<i32, PackageError> {
    let path = &ctx.manifest_path;
    logger::debug(&format!("Initializing manifest at {}", path.display()));

    let default_name = std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let stdin = io::stdin();
    let written = write_manifest(&mut stdin.lock(), path, args, &default_name)?;

    ctx.gateway.ensure_environment(&ctx.env_path)?;

    println!();
    match written {
        Some(name) => println!("{}  Project {} initialized!", "✔".green(), name.bold()),
        None => println!(
            "{}  Environment ready for {}",
            "✔".green(),
            path.display().to_string().bold()
        ),
    }
    println!();
    println!("Next steps:");
    println!("  1. Install packages: ppm install <package>");
    println!("  2. Run a script: ppm run <script.py>");
    Ok(0)
}

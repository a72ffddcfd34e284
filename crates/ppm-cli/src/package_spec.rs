//! Parsing of package specifiers reported by the installer

use crate::logger;
use ppm_manifest::bare_name;

const SUCCESS_PREFIX: &str = "Successfully installed";

/// Extract `name==version` pins from pip's "Successfully installed a-1.0 b-2.0" lines.
///
/// pip joins name and version with the last `-`, so names keep their own
/// dashes (`typing-extensions-4.8.0` -> `typing-extensions==4.8.0`).
pub fn parse_successfully_installed(stdout: &str) -> Vec<String> {
    let mut pins = Vec::new();
    for line in stdout.lines() {
        let Some(packages) = line.trim_start().strip_prefix(SUCCESS_PREFIX) else {
            continue;
        };
        for token in packages.split_whitespace() {
            match token.rsplit_once('-') {
                Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                    pins.push(format!("{}=={}", name, version));
                }
                _ => logger::debug(&format!(
                    "Ignoring unrecognized installed package token '{}'",
                    token
                )),
            }
        }
    }
    pins
}

/// Package name of one `pip freeze` line.
///
/// Handles `name==version`, `name @ url` and editable `-e url#egg=name` lines;
/// comments and blank lines have no name.
pub fn freeze_entry_name(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if let Some(editable) = line.strip_prefix("-e") {
        return editable
            .split_once("#egg=")
            .map(|(_, egg)| egg.split('&').next().unwrap_or(egg).trim())
            .filter(|name| !name.is_empty());
    }

    let name = bare_name(line);
    (!name.is_empty()).then_some(name)
}

use crate::errors::PackageError;
use crate::logger;
use crate::GlobalOpts;
use clap::Subcommand;
use colored::*;
use ppm_config::{Settings, SETTING_KEYS};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show all configured values
    Show,
    /// Print one value
    Get { key: String },
    /// Set a value (python-path, env-path, manifest-path)
    Set { key: String, value: String },
    /// Print the settings file path
    Path,
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<i32, PackageError> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let settings = Settings::load()?;
            println!("{}", "Configuration:".bold().green());
            if settings.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in settings.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
            Ok(0)
        }
        ConfigAction::Get { key } => {
            let settings = Settings::load()?;
            if !SETTING_KEYS.contains(&key.as_str()) {
                return Err(ppm_config::ConfigError::UnknownKey(key).into());
            }
            match settings.get(&key) {
                Some(value) => {
                    println!("{}", value);
                    Ok(0)
                }
                None => {
                    logger::warn(&format!("{} is not set", key));
                    Ok(1)
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings.set(&key, value.clone())?;
            settings.save()?;
            logger::success(&format!("Set {} = {}", key, value));
            Ok(0)
        }
        ConfigAction::Path => {
            let path = Settings::path()?;
            logger::debug(&format!("Reading config from: {}", path.display()));
            println!("{}", path.display());
            Ok(0)
        }
    }
}

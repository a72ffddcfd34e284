//! Common types shared across commands

use clap::Parser;
use std::path::PathBuf;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "PATH",
        help = "Manifest file to use (default: pyproject.toml)"
    )]
    pub manifest: Option<PathBuf>,

    #[arg(
        long = "env",
        global = true,
        value_name = "PATH",
        help = "Environment directory (default: .ppm.env)"
    )]
    pub env: Option<PathBuf>,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

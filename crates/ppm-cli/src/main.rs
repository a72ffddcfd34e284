use clap::{CommandFactory, Parser, Subcommand};
use ppm::{
    commands::{
        config::{self, ConfigAction},
        init::{self, InitArgs},
        install, list, run, shell, uninstall, CommandContext,
    },
    errors::PackageError,
    logger, GlobalOpts,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ppm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "A package manager similar to npm, but for Python",
    long_about = "ppm keeps the dependencies of pyproject.toml in sync with an isolated Python environment."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create pyproject.toml and the project environment
    Init {
        /// Project name (prompted when omitted)
        name: Option<String>,
        /// Comma-separated authors
        authors: Option<String>,
        description: Option<String>,
    },
    /// Install packages, or every manifest dependency when none are given
    Install {
        names: Vec<String>,
        /// Install into the host interpreter; the manifest is not touched
        #[arg(short, long)]
        global: bool,
    },
    /// Uninstall packages (name or name==version)
    Uninstall {
        #[arg(required = true)]
        names: Vec<String>,
        #[arg(short, long)]
        global: bool,
    },
    /// List installed packages
    List {
        #[arg(short, long)]
        global: bool,
        /// Only show outdated packages
        #[arg(long, alias = "outdated")]
        deprecated: bool,
    },
    /// Run a script with the environment interpreter
    Run {
        script: PathBuf,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Start an interactive interpreter
    Cli {
        #[arg(short, long)]
        global: bool,
    },
    /// Configure ppm
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PPM_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch(command: Commands, opts: &GlobalOpts) -> Result<i32, PackageError> {
    if let Commands::Config { action } = command {
        return config::handle_config(action, opts);
    }

    let ctx = CommandContext::load(opts)?;
    match command {
        Commands::Init {
            name,
            authors,
            description,
        } => init::handle_init(
            &ctx,
            InitArgs {
                name,
                authors,
                description,
            },
        ),
        Commands::Install { names, global } => install::handle_install(&ctx, &names, global),
        Commands::Uninstall { names, global } => {
            uninstall::handle_uninstall(&ctx, &names, global)
        }
        Commands::List { global, deprecated } => list::handle_list(&ctx, global, deprecated),
        Commands::Run { script, args } => run::handle_run(&ctx, &script, &args),
        Commands::Cli { global } => shell::handle_cli(&ctx, global),
        Commands::Config { .. } => Ok(0),
    }
}

fn main() {
    let cli = Cli::parse();

    init_tracing();
    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        std::process::exit(1);
    };

    match dispatch(command, &cli.global) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            logger::error(&e.to_string());
            if let Some(stderr) = e.captured_stderr() {
                eprintln!("{}", stderr);
            }
            if matches!(e, PackageError::CommandFailed { .. }) {
                logger::show_log_path();
            }
            std::process::exit(e.exit_code());
        }
    }
}

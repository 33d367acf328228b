//! Command-line front end for the Gyre orbit tracer.
//!
//! ```text
//! gyre [--log-level L] run <driver> [options...]
//! gyre [--log-level L] launch --workers N [options...]
//! gyre boxes
//! ```
//!
//! Row output goes to stdout (or the worker files); diagnostics go to
//! stderr through `tracing`.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exit code for errors fatal to the whole run.
pub(crate) const FATAL_EXIT: u8 = 2;

/// Gyron orbit tracer
#[derive(Parser, Debug)]
#[command(name = "gyre")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A gyron-tracing engine for electromagnetic fields", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a driver with the given shared options
    Run(commands::run::RunArgs),
    /// Spawn local worker processes over a sharded ensemble
    Launch(commands::launch::LaunchArgs),
    /// List every field, pusher, observer and driver with its options
    Boxes,
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("gyre: cannot initialise logging: {e:#}");
        return ExitCode::from(FATAL_EXIT);
    }

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Launch(args) => commands::launch::execute(args, &cli.log_level),
        Commands::Boxes => commands::boxes::execute(),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("gyre: {e:#}");
            ExitCode::from(FATAL_EXIT)
        }
    }
}

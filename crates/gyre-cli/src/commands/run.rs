//! `gyre run <driver> [options...]`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use gyre_core::Options;
use gyre_engine::DriverKind;
use tracing::{error, info};

/// Arguments of `gyre run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Driver: single, sequential, parallel or worker
    pub driver: String,

    /// Shared options, e.g. -tfinal=1 -samples=512 -ensemble-file=tasks.txt
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub options: Vec<String>,
}

pub fn execute(args: RunArgs) -> Result<ExitCode> {
    let shared = Options::from_args(&args.options);
    let kind = DriverKind::from_name(&args.driver)?;
    let driver = kind
        .build(&shared)
        .with_context(|| format!("cannot configure driver '{}'", kind.name()))?;

    info!(driver = driver.name(), args = %shared, "run started");
    let start = Instant::now();

    let mut out = BufWriter::new(io::stdout());
    let status = driver
        .run(&shared, &mut out)
        .with_context(|| format!("driver '{}' failed", kind.name()))?;
    out.flush().context("cannot flush standard output")?;

    for failure in &status.failures {
        error!("{failure}");
    }
    info!(
        tasks = status.tasks,
        failed = status.failures.len(),
        elapsed_s = start.elapsed().as_secs_f64(),
        "run finished"
    );
    Ok(ExitCode::from(status.exit_code() as u8))
}

//! `gyre launch --workers N [options...]`: a local stand-in for an MPI
//! launcher. Each child runs `gyre run worker` with `GYRE_RANK` and
//! `GYRE_SIZE` set; the children share nothing.

use std::io;
use std::process::{Child, Command, ExitCode};

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::{error, info, warn};

use crate::FATAL_EXIT;

/// Arguments of `gyre launch`.
#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Number of worker processes
    #[arg(short = 'n', long)]
    pub workers: usize,

    /// Shared options passed to every worker, e.g. -prefix=shard -tfinal=1
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub options: Vec<String>,
}

pub fn execute(args: LaunchArgs, log_level: &str) -> Result<ExitCode> {
    if args.workers == 0 {
        bail!("--workers must be at least 1");
    }
    let exe = std::env::current_exe().context("cannot locate the gyre executable")?;

    let children = spawn_workers(args.workers, |rank| {
        Command::new(&exe)
            .arg("--log-level")
            .arg(log_level)
            .arg("run")
            .arg("worker")
            .args(&args.options)
            .env("GYRE_RANK", rank.to_string())
            .env("GYRE_SIZE", args.workers.to_string())
            .spawn()
    })?;

    let mut worst: u8 = 0;
    let mut pending = children.into_iter();
    while let Some((rank, mut child)) = pending.next() {
        let status = match child.wait() {
            Ok(status) => status,
            Err(e) => {
                reap(&mut pending.collect::<Vec<_>>());
                return Err(anyhow::Error::new(e).context(format!("cannot wait for worker {rank}")));
            }
        };
        let code = match status.code() {
            Some(code) => u8::try_from(code).unwrap_or(FATAL_EXIT),
            None => FATAL_EXIT,
        };
        if code != 0 {
            error!(rank, %status, "worker failed");
        }
        worst = worst.max(code);
    }
    info!(workers = args.workers, exit_code = worst, "all workers finished");
    Ok(ExitCode::from(worst))
}

/// Spawn ranks `0..workers` with `spawn`. If one fails, every worker
/// already running is killed and reaped before the error is returned.
fn spawn_workers<F>(workers: usize, mut spawn: F) -> Result<Vec<(usize, Child)>>
where
    F: FnMut(usize) -> io::Result<Child>,
{
    let mut children: Vec<(usize, Child)> = Vec::with_capacity(workers);
    for rank in 0..workers {
        match spawn(rank) {
            Ok(child) => {
                info!(rank, pid = child.id(), "worker spawned");
                children.push((rank, child));
            }
            Err(e) => {
                reap(&mut children);
                return Err(anyhow::Error::new(e).context(format!("cannot spawn worker {rank}")));
            }
        }
    }
    Ok(children)
}

fn reap(children: &mut Vec<(usize, Child)>) {
    for (rank, mut child) in children.drain(..) {
        if let Err(e) = child.kill() {
            warn!(rank, error = %e, "cannot kill worker");
        }
        if let Err(e) = child.wait() {
            warn!(rank, error = %e, "cannot reap worker");
        }
    }
}

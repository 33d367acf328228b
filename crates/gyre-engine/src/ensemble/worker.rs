//! One process per shard, output to a per-worker file.
//!
//! A worker of rank `r` reads `<prefix>-<r>` and writes
//! `<prefix>-<r>.out`. Workers share nothing and never communicate, so
//! the result does not depend on their relative speed.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use gyre_core::{ConfigError, Options};
use tracing::{info, warn};

use super::sequential::Sequential;
use super::{read_ensemble, EnsembleStrategy};
use crate::config::EnsembleConfig;
use crate::driver::DriverError;
use crate::header::write_run_header;
use crate::task::RunStatus;

/// Suffix appended to the shard path to name the worker's output file.
pub const OUTPUT_SUFFIX: &str = ".out";

// ── WorkerRank ─────────────────────────────────────────────────────

/// Position of this process among the workers of a distributed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerRank {
    /// Zero-based rank, `< size`.
    pub rank: usize,
    /// Number of workers.
    pub size: usize,
}

impl WorkerRank {
    /// Environment variable pairs consulted, in priority order.
    pub const ENV_VARS: [(&'static str, &'static str); 4] = [
        ("GYRE_RANK", "GYRE_SIZE"),
        ("OMPI_COMM_WORLD_RANK", "OMPI_COMM_WORLD_SIZE"),
        ("PMI_RANK", "PMI_SIZE"),
        ("SLURM_PROCID", "SLURM_NTASKS"),
    ];

    /// A single worker.
    pub fn singleton() -> Self {
        Self { rank: 0, size: 1 }
    }

    /// Create, checking `rank < size`.
    pub fn new(rank: usize, size: usize) -> Result<Self, ConfigError> {
        if rank >= size {
            return Err(ConfigError::InvalidSetting {
                setting: "rank",
                reason: format!("rank {rank} is not below worker count {size}"),
            });
        }
        Ok(Self { rank, size })
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve through `lookup`: the first variable pair whose rank is
    /// set wins; with none set the worker is a singleton.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        for (rank_var, size_var) in Self::ENV_VARS {
            let Some(rank) = lookup(rank_var) else {
                continue;
            };
            let rank = parse_count(rank_var, &rank)?;
            let size = match lookup(size_var) {
                Some(size) => parse_count(size_var, &size)?,
                None => {
                    return Err(ConfigError::MissingOption {
                        option: size_var.to_string(),
                    })
                }
            };
            return Self::new(rank, size);
        }
        Ok(Self::singleton())
    }
}

fn parse_count(var: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
            option: var.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// `<prefix>-<rank>`.
pub fn shard_path(prefix: &Path, rank: usize) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!("-{rank}"));
    PathBuf::from(name)
}

/// `<shard>.out`.
pub fn output_path(shard: &Path) -> PathBuf {
    let mut name = shard.as_os_str().to_os_string();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

// ── RedirectedOutput ───────────────────────────────────────────────

/// Scoped ownership of a worker's output file.
///
/// Opened before any output is produced. Flushed and closed exactly
/// once: by [`finish`](Self::finish), or on drop if `finish` was never
/// reached.
pub struct RedirectedOutput {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl RedirectedOutput {
    /// Create (truncate) the file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, DriverError> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| DriverError::resource(&path, e))?;
        info!(path = %path.display(), "worker output redirected");
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The open sink.
    pub fn writer(&mut self) -> Result<&mut (dyn Write + Send), DriverError> {
        match self.writer.as_mut() {
            Some(w) => Ok(w),
            None => Err(DriverError::Output {
                reason: format!("{} already closed", self.path.display()),
            }),
        }
    }

    /// Flush and close, reporting any failure.
    pub fn finish(mut self) -> Result<(), DriverError> {
        self.close()
    }

    fn close(&mut self) -> Result<(), DriverError> {
        match self.writer.take() {
            Some(writer) => {
                let file = writer
                    .into_inner()
                    .map_err(|e| DriverError::resource(&self.path, e.into_error()))?;
                file.sync_all()
                    .map_err(|e| DriverError::resource(&self.path, e))?;
                info!(path = %self.path.display(), "worker output closed");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for RedirectedOutput {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "worker output could not be closed cleanly");
        }
    }
}

// ── DistributedWorker ──────────────────────────────────────────────

/// Runs this process's shard sequentially into its own output file.
#[derive(Clone, Debug)]
pub struct DistributedWorker {
    prefix: PathBuf,
    rank: WorkerRank,
    config: EnsembleConfig,
}

impl DistributedWorker {
    /// Worker `rank` over shards named from `prefix`.
    pub fn new(prefix: impl Into<PathBuf>, rank: WorkerRank, config: EnsembleConfig) -> Self {
        Self {
            prefix: prefix.into(),
            rank,
            config,
        }
    }

    /// This worker's shard file.
    pub fn shard_path(&self) -> PathBuf {
        shard_path(&self.prefix, self.rank.rank)
    }

    /// This worker's output file.
    pub fn output_path(&self) -> PathBuf {
        output_path(&self.shard_path())
    }

    /// Read the shard, then write header and task blocks to the output
    /// file.
    ///
    /// # Errors
    ///
    /// [`DriverError::Resource`] if the shard cannot be read or the
    /// output file cannot be created or closed. Task failures are
    /// reported in the returned status instead.
    pub fn run(&self, shared: &Options) -> Result<RunStatus, DriverError> {
        let shard = self.shard_path();
        let file = File::open(&shard).map_err(|e| DriverError::resource(&shard, e))?;
        let tasks =
            read_ensemble(BufReader::new(file)).map_err(|e| DriverError::resource(&shard, e))?;
        info!(
            rank = self.rank.rank,
            size = self.rank.size,
            shard = %shard.display(),
            tasks = tasks.len(),
            "worker shard loaded"
        );

        let mut output = RedirectedOutput::create(self.output_path())?;
        let status = {
            let out = output.writer()?;
            write_run_header(out, shared)?;
            Sequential::new(self.config.clone()).run(shared.source(), &tasks, out)?
        };
        output.finish()?;
        Ok(status)
    }
}

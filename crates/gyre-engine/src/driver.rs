//! Top-level drivers and their closed registry.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use gyre_core::{ConfigError, Options};
use tracing::info;

use crate::config::EnsembleConfig;
use crate::ensemble::parallel::ThreadParallel;
use crate::ensemble::sequential::Sequential;
use crate::ensemble::worker::{DistributedWorker, WorkerRank};
use crate::ensemble::{read_ensemble, EnsembleStrategy, Task};
use crate::header::write_run_header;
use crate::task::RunStatus;

// ── DriverError ────────────────────────────────────────────────────

/// Errors fatal to a whole driver run (as opposed to one task).
#[derive(Debug)]
pub enum DriverError {
    /// A required file could not be opened, read, written or closed.
    Resource {
        /// The file involved.
        path: PathBuf,
        /// The I/O failure.
        reason: String,
    },
    /// The shared options are invalid for this driver.
    Config(ConfigError),
    /// Writing to the run's output sink failed.
    Output {
        /// The I/O failure.
        reason: String,
    },
}

impl DriverError {
    /// Resource error for `path`.
    pub fn resource(path: &Path, reason: impl fmt::Display) -> Self {
        Self::Resource {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Process exit code for a fatal driver error.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource { path, reason } => write!(f, "{}: {reason}", path.display()),
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Output { reason } => write!(f, "output failed: {reason}"),
        }
    }
}

impl Error for DriverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for DriverError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for DriverError {
    fn from(e: io::Error) -> Self {
        Self::Output {
            reason: e.to_string(),
        }
    }
}

// ── Driver ─────────────────────────────────────────────────────────

/// A top-level run strategy. Owns the orbit integrator settings.
pub trait Driver {
    /// Registry name.
    fn name(&self) -> &str;

    /// Run against the shared options, writing to `out`.
    ///
    /// Drivers that own their output (the distributed worker) leave
    /// `out` untouched.
    fn run(&self, shared: &Options, out: &mut (dyn Write + Send))
        -> Result<RunStatus, DriverError>;
}

/// One gyron configured entirely by the shared options.
struct SingleDriver {
    config: EnsembleConfig,
}

impl Driver for SingleDriver {
    fn name(&self) -> &str {
        "single"
    }

    fn run(
        &self,
        shared: &Options,
        out: &mut (dyn Write + Send),
    ) -> Result<RunStatus, DriverError> {
        write_run_header(out, shared)?;
        let tasks = [Task::new(0, "")];
        Sequential::new(self.config.clone()).run(shared.source(), &tasks, out)
    }
}

/// Ensemble from `-ensemble-file=`, run by `strategy`.
struct EnsembleDriver<S> {
    name: &'static str,
    ensemble_file: PathBuf,
    strategy: S,
}

impl<S: EnsembleStrategy> Driver for EnsembleDriver<S> {
    fn name(&self) -> &str {
        self.name
    }

    fn run(
        &self,
        shared: &Options,
        out: &mut (dyn Write + Send),
    ) -> Result<RunStatus, DriverError> {
        let path = &self.ensemble_file;
        let file = File::open(path).map_err(|e| DriverError::resource(path, e))?;
        let tasks = read_ensemble(BufReader::new(file)).map_err(|e| DriverError::resource(path, e))?;
        info!(
            driver = self.name,
            strategy = self.strategy.name(),
            file = %path.display(),
            tasks = tasks.len(),
            "ensemble loaded"
        );
        write_run_header(out, shared)?;
        self.strategy.run(shared.source(), &tasks, out)
    }
}

/// This process's shard of a distributed ensemble.
struct WorkerDriver {
    worker: DistributedWorker,
}

impl Driver for WorkerDriver {
    fn name(&self) -> &str {
        "worker"
    }

    fn run(
        &self,
        shared: &Options,
        _out: &mut (dyn Write + Send),
    ) -> Result<RunStatus, DriverError> {
        self.worker.run(shared)
    }
}

// ── DriverKind ─────────────────────────────────────────────────────

/// Every driver this build knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverKind {
    /// One gyron from the shared options.
    Single,
    /// Ensemble file, tasks in order.
    Sequential,
    /// Ensemble file, thread pool.
    Parallel,
    /// Distributed shard, one process per rank.
    Worker,
}

impl DriverKind {
    /// All variants, in help order.
    pub const ALL: [DriverKind; 4] = [
        DriverKind::Single,
        DriverKind::Sequential,
        DriverKind::Parallel,
        DriverKind::Worker,
    ];

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            DriverKind::Single => "single",
            DriverKind::Sequential => "sequential",
            DriverKind::Parallel => "parallel",
            DriverKind::Worker => "worker",
        }
    }

    /// Look a driver up by name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| ConfigError::UnknownVariant {
                kind: "driver",
                name: name.to_string(),
                available: Self::ALL.iter().map(|k| k.name()).collect(),
            })
    }

    /// Usage text.
    pub fn help(self) -> &'static str {
        match self {
            DriverKind::Single => {
                "driver -> single\n\
                 Traces one gyron configured by the shared options.\n\
                 \x20 -elapsed              Append the elapsed wall-clock time.\n\
                 \x20 -peek-beyond-tfinal   Observe once at the first step past tfinal."
            }
            DriverKind::Sequential => {
                "driver -> sequential\n\
                 Traces one gyron per line of the ensemble file, in order. Each line\n\
                 holds private options appended after the shared ones.\n\
                 \x20 -ensemble-file=       Ensemble file (required)."
            }
            DriverKind::Parallel => {
                "driver -> parallel\n\
                 As sequential, on a thread pool. Task blocks are written whole, in\n\
                 completion order.\n\
                 \x20 -ensemble-file=       Ensemble file (required).\n\
                 \x20 -threads=             Worker threads (default: available cores)."
            }
            DriverKind::Worker => {
                "driver -> worker\n\
                 Traces the shard <prefix>-<rank> into <prefix>-<rank>.out. Rank and\n\
                 size come from GYRE_RANK/GYRE_SIZE, OMPI_COMM_WORLD_RANK/_SIZE,\n\
                 PMI_RANK/PMI_SIZE or SLURM_PROCID/SLURM_NTASKS.\n\
                 \x20 -prefix=              Shard file prefix (required)."
            }
        }
    }

    /// Construct the driver from the shared options.
    pub fn build(self, shared: &Options) -> Result<Box<dyn Driver>, ConfigError> {
        let config = EnsembleConfig::from_options(shared)?;
        Ok(match self {
            DriverKind::Single => Box::new(SingleDriver { config }),
            DriverKind::Sequential => Box::new(EnsembleDriver {
                name: self.name(),
                ensemble_file: shared.require::<PathBuf>("ensemble-file")?,
                strategy: Sequential::new(config),
            }),
            DriverKind::Parallel => Box::new(EnsembleDriver {
                name: self.name(),
                ensemble_file: shared.require::<PathBuf>("ensemble-file")?,
                strategy: ThreadParallel::new(config),
            }),
            DriverKind::Worker => Box::new(WorkerDriver {
                worker: DistributedWorker::new(
                    shared.require::<PathBuf>("prefix")?,
                    WorkerRank::from_env()?,
                    config,
                ),
            }),
        })
    }
}

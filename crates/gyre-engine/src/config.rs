//! Driver-level settings shared by every ensemble strategy.

use gyre_core::{ConfigError, Options};

/// Settings read from the shared options, not per task.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnsembleConfig {
    /// `-peek-beyond-tfinal`: observe once past the time limit.
    pub peek_beyond: bool,
    /// `-elapsed`: append the elapsed-time line to each task block.
    pub elapsed: bool,
    /// `-threads=`: worker threads for [`ThreadParallel`]. `None` =
    /// auto-detect (`available_parallelism`, clamped to `[1, 64]`).
    ///
    /// [`ThreadParallel`]: crate::ThreadParallel
    pub threads: Option<usize>,
}

impl EnsembleConfig {
    /// Read from the shared options.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        Ok(Self {
            peek_beyond: options.flag("peek-beyond-tfinal"),
            elapsed: options.flag("elapsed"),
            threads: options.get("threads")?,
        })
    }

    /// Resolve the thread count, applying auto-detection if `None`.
    pub fn resolved_thread_count(&self) -> usize {
        match self.threads {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_driver_flags() {
        let c = EnsembleConfig::from_options(&Options::parse(
            "-elapsed -peek-beyond-tfinal -threads=3",
        ))
        .unwrap();
        assert!(c.elapsed);
        assert!(c.peek_beyond);
        assert_eq!(c.resolved_thread_count(), 3);
    }

    #[test]
    fn thread_count_clamps_zero() {
        let c = EnsembleConfig {
            threads: Some(0),
            ..EnsembleConfig::default()
        };
        assert_eq!(c.resolved_thread_count(), 1);
    }

    #[test]
    fn auto_thread_count_is_at_least_one() {
        assert!(EnsembleConfig::default().resolved_thread_count() >= 1);
    }
}

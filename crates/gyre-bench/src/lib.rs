//! Benchmark profiles for the Gyre orbit tracer.
//!
//! - [`SHARED_PROFILE`]: shared options used by every benchmark.
//! - [`random_ensemble`]: deterministic ensemble of private lines via seed.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::f64::consts::TAU;

use gyre_engine::Task;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Shared options: 128 steps per orbit, a row every 16 steps.
pub const SHARED_PROFILE: &str = "-tfinal=1 -samples=128 -skip=15 -vref=1e4";

/// `n` private lines with random start position, pitch and gyrophase.
///
/// Roughly one task in four uses the guiding-centre pusher.
pub fn random_ensemble(n: usize, seed: u64) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let qu: f64 = rng.random_range(0.0..0.5);
            let pitch: f64 = rng.random_range(-0.9..0.9);
            let gyrophase: f64 = rng.random_range(0.0..TAU);
            let mut line = format!("-qu={qu} -pitch={pitch} -gyrophase={gyrophase}");
            if rng.random_bool(0.25) {
                line.push_str(" -pusher=guiding-centre");
            }
            line
        })
        .collect()
}

/// [`random_ensemble`] as engine tasks.
pub fn random_tasks(n: usize, seed: u64) -> Vec<Task> {
    random_ensemble(n, seed)
        .into_iter()
        .enumerate()
        .map(|(i, line)| Task::new(i, line))
        .collect()
}

//! Subcommand implementations.

pub mod boxes;
pub mod launch;
pub mod run;

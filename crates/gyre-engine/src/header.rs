//! Run and task header lines.

use std::io::{self, Write};

use gyre_core::Options;

use crate::task::TaskId;

/// Write the run header: banner, version, shared arguments.
pub fn write_run_header(out: &mut dyn Write, shared: &Options) -> io::Result<()> {
    writeln!(out, "# gyre -- a gyron-tracing engine for electromagnetic fields.")?;
    writeln!(out, "# version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "# args: {}", shared.source())
}

/// Write the line opening a task block.
pub fn write_task_header(out: &mut dyn Write, task: TaskId, private: &str) -> io::Result<()> {
    if private.is_empty() {
        writeln!(out, "# {task}")
    } else {
        writeln!(out, "# {task}: {private}")
    }
}

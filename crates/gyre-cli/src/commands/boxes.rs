//! `gyre boxes`: usage of every registered variant.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use gyre_engine::DriverKind;
use gyre_field::FieldKind;
use gyre_obs::ObserverKind;
use gyre_pusher::{PusherKind, StepperKind};

pub fn execute() -> Result<ExitCode> {
    let mut out = io::stdout().lock();
    write_boxes(&mut out)?;
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn write_boxes(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Boxes are selected with -field=, -pusher= and -observer=;")?;
    writeln!(out, "drivers with `gyre run <driver>`.\n")?;
    for kind in FieldKind::ALL {
        writeln!(out, "{}\n", kind.help())?;
    }
    writeln!(out, "{}\n", PusherKind::settings_help())?;
    for kind in PusherKind::ALL {
        writeln!(out, "{}\n", kind.help())?;
    }
    let steppers: Vec<String> = StepperKind::ALL
        .iter()
        .map(|s| format!("{} (order {})", s.name(), s.order()))
        .collect();
    writeln!(out, "steppers: {}\n", steppers.join(", "))?;
    for kind in ObserverKind::ALL {
        writeln!(out, "{}\n", kind.help())?;
    }
    for kind in DriverKind::ALL {
        writeln!(out, "{}\n", kind.help())?;
    }
    Ok(())
}

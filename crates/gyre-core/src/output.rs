//! Output row types.
//!
//! A pusher fixes its [`FieldNames`] at construction; every
//! [`OutputRow`] it emits afterwards has exactly that many values, in
//! that order.

use std::io::{self, Write};

use smallvec::SmallVec;

/// One observed sample: time first, then pusher-defined quantities.
pub type OutputRow = SmallVec<[f64; 16]>;

/// Ordered column names of the rows a pusher emits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldNames(SmallVec<[&'static str; 16]>);

impl FieldNames {
    /// Start from a base column set.
    pub fn new(base: &[&'static str]) -> Self {
        Self(base.iter().copied().collect())
    }

    /// Append columns when `enabled`.
    pub fn extend_if(&mut self, enabled: bool, names: &[&'static str]) {
        if enabled {
            self.0.extend(names.iter().copied());
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names in order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    /// The `# fields: ...` header line, without trailing newline.
    pub fn header_line(&self) -> String {
        format!("# fields: {}", self.0.join(" "))
    }
}

/// How numeric values are rendered in rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberFormat {
    /// Shortest representation that round-trips.
    #[default]
    Plain,
    /// Scientific notation with 16 fractional digits (`-phires`).
    Scientific16,
}

impl NumberFormat {
    /// Write `row` as one space-separated line.
    pub fn write_row(self, out: &mut dyn Write, row: &[f64]) -> io::Result<()> {
        let mut line = String::with_capacity(row.len() * 24);
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            match self {
                NumberFormat::Plain => line.push_str(&value.to_string()),
                NumberFormat::Scientific16 => line.push_str(&format!("{value:.16e}")),
            }
        }
        line.push('\n');
        out.write_all(line.as_bytes())
    }
}

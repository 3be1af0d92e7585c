//! Output formatting for sweep results.
//!
//! This module writes [`SweepPoint`]s in two formats:
//! - CSV: `size_bytes,random_offset_ns,sequential_offset_ns`, offsets with two
//!   fractional digits. This is the default and the format plotting scripts
//!   expect.
//! - JSON: one object per line

mod csv;
mod json;

use std::io::Write;

use clap::ValueEnum;

use crate::error::Result;
use crate::sweep::SweepPoint;

pub use csv::{format_csv_row, CSV_HEADER};
pub use json::to_json_line;

/// Output format for sweep points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// JSON lines.
    Json,
}

/// Writes sweep points to a stream, flushing after each row.
#[derive(Debug)]
pub struct PointWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> PointWriter<W> {
    /// Writer emitting `format` to `out`.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Write the CSV header. Does nothing for JSON output.
    pub fn write_header(&mut self) -> Result<()> {
        if self.format == OutputFormat::Csv {
            writeln!(self.out, "{}", CSV_HEADER)?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Write one point.
    pub fn write_point(&mut self, point: &SweepPoint) -> Result<()> {
        let line = match self.format {
            OutputFormat::Csv => format_csv_row(point),
            OutputFormat::Json => to_json_line(point)?,
        };
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

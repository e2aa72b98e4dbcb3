//! Append-only CSV row log
//!
//! The first logged row fixes the column order. A fresh log gets that
//! row's keys as its header. Appending to a log that already has content
//! writes no header; appending to a new or empty file writes one.
//!
//! ```text
//! TIME,POWER_TMP2,THERMO_X_TEMP
//! 63856281600,41,35.2
//! 63856281601,41.5,
//! ```
//!
//! A later row without one of the columns writes an empty cell. Keys that
//! were not in the first row are not logged.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::errors::{LogError, LogResult};
use crate::reading::Row;

const SEPARATOR: char = ',';

/// Writes rows to a comma-separated log
pub struct RowLogger<W: Write> {
    writer: W,
    columns: Option<Vec<String>>,
    write_header: bool,
    rows: usize,
}

impl RowLogger<BufWriter<File>> {
    /// Truncate `path` and log with a header
    pub fn create(path: impl AsRef<Path>) -> LogResult<Self> {
        let file = File::create(path.as_ref())?;
        debug!("Logging rows to {}", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file), true))
    }

    /// Append to `path`; the header is written only if the file is empty
    pub fn append(path: impl AsRef<Path>) -> LogResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        let empty = file.metadata()?.len() == 0;
        debug!("Appending rows to {}", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file), empty))
    }
}

impl<W: Write> RowLogger<W> {
    /// Log to an arbitrary writer
    pub fn new(writer: W, write_header: bool) -> Self {
        Self {
            writer,
            columns: None,
            write_header,
            rows: 0,
        }
    }

    /// Column order, once the first row has been seen
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Rows written so far
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Write one row, emitting the header first if this is a fresh log
    pub fn log(&mut self, row: &Row) -> LogResult<()> {
        if self.columns.is_none() {
            let columns: Vec<String> = row.keys().map(str::to_string).collect();
            if self.write_header {
                writeln!(self.writer, "{}", columns.join(&SEPARATOR.to_string()))?;
            }
            self.columns = Some(columns);
        }

        let line = self
            .columns
            .iter()
            .flatten()
            .map(|column| row.get(column).map(|v| v.to_string()).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string());
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Re-read a log written with a header
pub fn read_log(path: impl AsRef<Path>) -> LogResult<Vec<Row>> {
    parse_log(BufReader::new(File::open(path)?))
}

/// Parse header plus rows from any reader
pub fn parse_log<R: BufRead>(reader: R) -> LogResult<Vec<Row>> {
    let mut lines = reader.lines().enumerate();

    let header: Vec<String> = match lines.next() {
        Some((_, line)) => line?.split(SEPARATOR).map(str::to_string).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for (index, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(SEPARATOR).collect();
        if cells.len() != header.len() {
            return Err(LogError::Malformed {
                line: index + 1,
                reason: format!("expected {} cells, found {}", header.len(), cells.len()),
            });
        }

        let mut row = Row::new(f64::NAN);
        for (column, cell) in header.iter().zip(cells) {
            if cell.is_empty() {
                continue;
            }
            let value = cell.parse::<f64>().map_err(|e| LogError::Malformed {
                line: index + 1,
                reason: format!("column {}: {}", column, e),
            })?;
            row.insert(column.as_str(), value);
        }
        rows.push(row);
    }
    Ok(rows)
}

//! The 13-column record CSV.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use medrec_model::{OUTPUT_COLUMNS, OutputRow};
use tracing::info;

use crate::error::{OutputError, Result};

/// Default location of the record CSV, relative to the working directory.
pub const DEFAULT_OUTPUT_CSV: &str = "output/Sample_Data.csv";

/// Writes the column header followed by one line per row, in slice order.
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow]) -> csv::Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the record CSV to `path`, creating parent directories.
pub fn write_output_csv(path: &Path, rows: &[OutputRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_rows(file, rows).map_err(|source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = rows.len(), "wrote output records");
    Ok(())
}

/// Reads record rows back by column name; column order does not matter.
pub fn read_rows<R: Read>(reader: R) -> csv::Result<Vec<OutputRow>> {
    ReaderBuilder::new()
        .from_reader(reader)
        .deserialize()
        .collect()
}

/// Reads a record CSV previously written by [`write_output_csv`].
pub fn read_output_csv(path: &Path) -> Result<Vec<OutputRow>> {
    let file = File::open(path).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows(file).map_err(|source| OutputError::CsvRead {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = rows.len(), "read output records");
    Ok(rows)
}

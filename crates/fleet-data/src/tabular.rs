//! Tabular spreadsheet backend behind a small trait seam.
//!
//! The pipeline never touches spreadsheet bytes directly; it reads named
//! sheets of string cells and writes rows through these traits. The shipped
//! backend is CSV, where one file is one sheet named after the file stem.

use std::path::Path;

use fleet_core::error::{FleetError, Result};
use tracing::debug;

// ── Sheet ─────────────────────────────────────────────────────────────────────

/// One sheet of raw cell text, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet label; for CSV files the file stem.
    pub name: String,
    /// All rows of the sheet, preamble and header included.
    pub rows: Vec<Vec<String>>,
}

// ── Traits ────────────────────────────────────────────────────────────────────

/// Reads every sheet of a spreadsheet file as raw cell text.
pub trait TableReader {
    fn read_sheets(&self, path: &Path) -> Result<Vec<Sheet>>;
}

/// Writes finished rows as one sheet of a spreadsheet file.
pub trait TableWriter {
    fn write(&self, rows: &[Vec<String>], path: &Path, sheet: &str) -> Result<()>;
}

// ── CSV backend ───────────────────────────────────────────────────────────────

/// CSV-backed [`TableReader`].
pub struct CsvTableReader;

impl TableReader for CsvTableReader {
    /// Read the whole file as a single sheet named after the file stem.
    ///
    /// Records may have unequal lengths (the export preamble rows usually
    /// do). A UTF-8 BOM on the first cell is stripped so header matching
    /// works on files saved by Excel.
    fn read_sheets(&self, path: &Path) -> Result<Vec<Sheet>> {
        let file = std::fs::File::open(path).map_err(|source| FleetError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        if let Some(first_cell) = rows.first_mut().and_then(|row| row.first_mut()) {
            if let Some(stripped) = first_cell.strip_prefix('\u{feff}') {
                *first_cell = stripped.to_string();
            }
        }

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("Sheet1")
            .to_string();

        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(vec![Sheet { name, rows }])
    }
}

/// CSV-backed [`TableWriter`].
pub struct CsvTableWriter;

impl CsvTableWriter {
    fn write_rows(tmp: &Path, rows: &[Vec<String>]) -> std::io::Result<()> {
        let mut writer = csv::Writer::from_path(tmp)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl TableWriter for CsvTableWriter {
    /// Write `rows` to `path` as CSV.
    ///
    /// CSV files carry no sheet structure, so the sheet label only appears in
    /// the debug log. The rows go to a temp file first and are renamed into
    /// place, so a failed write never leaves a partial report behind.
    fn write(&self, rows: &[Vec<String>], path: &Path, sheet: &str) -> Result<()> {
        debug!(
            "Writing {} rows to {} (sheet {})",
            rows.len(),
            path.display(),
            sheet
        );

        let tmp = path.with_extension("csv.tmp");
        Self::write_rows(&tmp, rows)
            .and_then(|_| std::fs::rename(&tmp, path))
            .map_err(|source| FleetError::OutputWrite {
                path: path.to_path_buf(),
                source,
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

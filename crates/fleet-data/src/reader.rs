//! Telemetry export discovery and loading.
//!
//! Ituran export files carry a fixed name prefix, a 7-row preamble before
//! the header, and Hebrew column names. This module finds the files in the
//! input directory, maps the columns of every sheet, and normalizes the data
//! rows into [`RawEvent`]s for aggregation.

use std::path::{Path, PathBuf};

use fleet_core::models::{RawEvent, RawRow};
use fleet_core::normalize::normalize_row;
use fleet_core::Result;
use tracing::{debug, warn};

use crate::tabular::{Sheet, TableReader};

/// File-name prefix the vendor gives every telemetry export.
pub const EXPORT_FILE_PREFIX: &str = "ייצוא-Excel-דוח";

/// Spreadsheet suffix of the shipped tabular backend.
pub const EXPORT_FILE_SUFFIX: &str = ".csv";

/// Zero-based index of the header row; the 7 rows above it are preamble.
pub const HEADER_ROW_INDEX: usize = 7;

/// Message-time column header.
pub const COL_TIMESTAMP: &str = "זמן הודעה";
/// Vehicle identification tag column header.
pub const COL_VEHICLE_TAG: &str = "תג זיהוי";
/// Distance-in-km column header.
pub const COL_DISTANCE: &str = "מרחק בק\"מ";
/// Street address column header.
pub const COL_ADDRESS: &str = "כתובת";
/// Driver name column header.
pub const COL_DRIVER: &str = "שם נהג";

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Find all export files directly under `input_dir`, sorted by file name.
///
/// Only the directory's top level is scanned; the vendor never nests
/// exports. An unreadable directory is a run-level failure.
pub fn find_export_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in walkdir::WalkDir::new(input_dir)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.starts_with(EXPORT_FILE_PREFIX) && name.ends_with(EXPORT_FILE_SUFFIX) {
            files.push(entry.into_path());
        }
    }

    debug!(
        "Found {} export files in {}",
        files.len(),
        input_dir.display()
    );
    Ok(files)
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Counters describing one load pass over the export files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Export files read.
    pub files_read: usize,
    /// Sheets whose header could be mapped.
    pub sheets_read: usize,
    /// Data rows seen below the mapped headers.
    pub rows_read: u64,
    /// Data rows dropped by normalization.
    pub rows_discarded: u64,
}

/// Load every sheet of every export file and normalize the data rows.
///
/// Events come back in ingestion order: files in the given (sorted) order,
/// sheets and rows in file order. The aggregator relies on this ordering for
/// its address trails. Sheets whose header lacks the message-time or
/// vehicle-tag column are skipped with a warning; rows that fail
/// normalization are counted and dropped.
pub fn load_events(
    files: &[PathBuf],
    reader: &dyn TableReader,
) -> Result<(Vec<RawEvent>, LoadStats)> {
    let mut events: Vec<RawEvent> = Vec::new();
    let mut stats = LoadStats::default();

    for path in files {
        let sheets = reader.read_sheets(path)?;
        stats.files_read += 1;
        for sheet in &sheets {
            load_sheet(path, sheet, &mut events, &mut stats);
        }
    }

    debug!(
        "Loaded {} events from {} files ({} rows discarded)",
        events.len(),
        stats.files_read,
        stats.rows_discarded
    );
    Ok((events, stats))
}

/// Normalize one sheet's data rows into `events`.
fn load_sheet(path: &Path, sheet: &Sheet, events: &mut Vec<RawEvent>, stats: &mut LoadStats) {
    let Some(header) = sheet.rows.get(HEADER_ROW_INDEX) else {
        warn!(
            "Sheet {} in {} is too short to hold a header row; skipping",
            sheet.name,
            path.display()
        );
        return;
    };

    let Some(columns) = ColumnMap::from_header(header) else {
        warn!(
            "Sheet {} in {} lacks the message-time or vehicle-tag column; skipping",
            sheet.name,
            path.display()
        );
        return;
    };

    let mut rows_read = 0u64;
    let mut rows_discarded = 0u64;

    for row in &sheet.rows[HEADER_ROW_INDEX + 1..] {
        rows_read += 1;
        match normalize_row(&columns.to_raw_row(row)) {
            Some(event) => events.push(event),
            None => rows_discarded += 1,
        }
    }

    stats.sheets_read += 1;
    stats.rows_read += rows_read;
    stats.rows_discarded += rows_discarded;

    debug!(
        "Sheet {}: {} rows read, {} discarded",
        sheet.name, rows_read, rows_discarded
    );
}

// ── ColumnMap ─────────────────────────────────────────────────────────────────

/// Header-cell positions of the columns a data row is read from.
struct ColumnMap {
    timestamp: usize,
    vehicle_tag: usize,
    distance: Option<usize>,
    address: Option<usize>,
    driver: Option<usize>,
}

impl ColumnMap {
    /// Map the header row to column indices.
    ///
    /// The message-time and vehicle-tag columns are required; the rest fall
    /// back to `None`, which surfaces as absent cells downstream (a missing
    /// distance column simply zeroes every distance).
    fn from_header(header: &[String]) -> Option<Self> {
        let index_of =
            |name: &str| header.iter().position(|cell| normalize_header(cell) == name);

        Some(ColumnMap {
            timestamp: index_of(COL_TIMESTAMP)?,
            vehicle_tag: index_of(COL_VEHICLE_TAG)?,
            distance: index_of(COL_DISTANCE),
            address: index_of(COL_ADDRESS),
            driver: index_of(COL_DRIVER),
        })
    }

    /// Pick this map's cells out of one data row.
    fn to_raw_row(&self, row: &[String]) -> RawRow {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).cloned();

        RawRow {
            vehicle_tag: cell(Some(self.vehicle_tag)),
            timestamp: cell(Some(self.timestamp)),
            distance_km: cell(self.distance),
            address: cell(self.address),
            driver_name: cell(self.driver),
        }
    }
}

/// Strip the artifacts Excel leaves on header cells (BOM, stray spaces).
pub(crate) fn normalize_header(cell: &str) -> &str {
    cell.trim_start_matches('\u{feff}').trim()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

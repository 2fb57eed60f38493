//! Main report pipeline.
//!
//! Orchestrates export discovery, loading, daily and per-vehicle
//! aggregation, roster overrides and report output, returning a
//! [`RunSummary`] ready for the CLI layer.

use std::path::PathBuf;

use chrono::NaiveDate;
use fleet_core::models::{DriverRoster, VehicleReport};
use fleet_core::{FleetError, Result};

use crate::aggregator::{apply_roster, fold_daily, fold_vehicles, retain_moving};
use crate::reader::{find_export_files, load_events};
use crate::report::{
    build_report, event_date_range, report_file_name, report_rows, REPORT_SHEET_NAME,
};
use crate::roster::load_driver_roster;
use crate::tabular::{TableReader, TableWriter};

// ── Public types ──────────────────────────────────────────────────────────────

/// Where one report run reads from and writes to.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory scanned for Ituran export files.
    pub input_dir: PathBuf,
    /// Directory the report file is written into.
    pub output_dir: PathBuf,
    /// Driver roster file, or `None` to skip the override step.
    pub roster_path: Option<PathBuf>,
}

/// The complete output of [`analyze_files`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Final vehicle rows, in output order.
    pub reports: Vec<VehicleReport>,
    /// Full path of the written report file.
    pub output_path: PathBuf,
    /// First and last calendar day among the loaded events.
    pub date_range: (NaiveDate, NaiveDate),
    /// Number of vehicles in the written report.
    pub vehicles_reported: usize,
    /// Export files read.
    pub files_read: usize,
    /// Sheets whose header could be mapped.
    pub sheets_read: usize,
    /// Data rows seen below the mapped headers.
    pub rows_read: u64,
    /// Data rows dropped by normalization.
    pub rows_discarded: u64,
    /// Wall-clock seconds spent reading the export files.
    pub load_seconds: f64,
    /// Wall-clock seconds spent folding events into vehicle rows.
    pub aggregate_seconds: f64,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full report pipeline.
///
/// 1. Discover export files under the input directory.
/// 2. Load their sheets and normalize the data rows into events.
/// 3. Load the driver roster, when one is configured.
/// 4. Fold events into per-vehicle-per-day aggregates, then into one row
///    per vehicle, dropping vehicles with no recorded movement.
/// 5. Apply roster overrides and put the rows into output order.
/// 6. Write the report under a date-range file name and return a
///    [`RunSummary`].
///
/// Nothing is written unless at least one vehicle survives step 4.
pub fn analyze_files(
    config: &ReportConfig,
    reader: &dyn TableReader,
    writer: &dyn TableWriter,
) -> Result<RunSummary> {
    // ── Step 1: Discover export files ─────────────────────────────────────────
    let files = find_export_files(&config.input_dir)?;
    if files.is_empty() {
        return Err(FleetError::NoInputFiles(config.input_dir.clone()));
    }

    // ── Step 2: Load events ───────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let (events, stats) = load_events(&files, reader)?;
    let load_seconds = load_start.elapsed().as_secs_f64();
    if events.is_empty() {
        return Err(FleetError::EmptyAfterAggregation);
    }

    // ── Step 3: Roster ────────────────────────────────────────────────────────
    let roster: DriverRoster = match &config.roster_path {
        Some(path) => load_driver_roster(path, reader)?,
        None => DriverRoster::new(),
    };

    // ── Step 4: Aggregate ─────────────────────────────────────────────────────
    let aggregate_start = std::time::Instant::now();
    let days = fold_daily(&events);
    let vehicles = retain_moving(fold_vehicles(&days));
    let aggregate_seconds = aggregate_start.elapsed().as_secs_f64();
    if vehicles.is_empty() {
        return Err(FleetError::EmptyAfterAggregation);
    }

    // ── Step 5: Order and label ───────────────────────────────────────────────
    let reports = build_report(apply_roster(vehicles, &roster));

    // ── Step 6: Write the report ──────────────────────────────────────────────
    // Non-empty events guarantee a date range here.
    let (min_date, max_date) =
        event_date_range(&events).ok_or(FleetError::EmptyAfterAggregation)?;
    let output_path = config
        .output_dir
        .join(report_file_name(min_date, max_date));
    writer.write(&report_rows(&reports), &output_path, REPORT_SHEET_NAME)?;

    let vehicles_reported = reports.len();
    Ok(RunSummary {
        reports,
        output_path,
        date_range: (min_date, max_date),
        vehicles_reported,
        files_read: stats.files_read,
        sheets_read: stats.sheets_read,
        rows_read: stats.rows_read,
        rows_discarded: stats.rows_discarded,
        load_seconds,
        aggregate_seconds,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

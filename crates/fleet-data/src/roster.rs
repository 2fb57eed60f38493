//! Driver roster loading.
//!
//! The roster lists the official driver of each vehicle and always overrides
//! whatever names the telemetry rows carry. It lives in its own small
//! spreadsheet with a plain first-row header.

use std::path::Path;

use fleet_core::models::DriverRoster;
use fleet_core::Result;
use tracing::{debug, warn};

use crate::reader::normalize_header;
use crate::tabular::TableReader;

/// File name the roster is looked up under.
pub const ROSTER_FILE_NAME: &str = "truck-drivers.csv";

/// Vehicle number column header of the roster sheet.
pub const ROSTER_COL_VEHICLE: &str = "vehicle_number";
/// Driver name column header of the roster sheet.
pub const ROSTER_COL_DRIVER: &str = "driver_name";

/// Load the vehicle-to-driver mapping from the roster spreadsheet.
///
/// A missing file is not an error; the mapping is simply empty and no
/// telemetry name gets overridden. Rows with a blank vehicle number or
/// driver name are ignored; a vehicle listed twice keeps the last entry.
pub fn load_driver_roster(path: &Path, reader: &dyn TableReader) -> Result<DriverRoster> {
    if !path.exists() {
        debug!("No driver roster at {}", path.display());
        return Ok(DriverRoster::new());
    }

    let sheets = reader.read_sheets(path)?;
    let mut roster = DriverRoster::new();

    for sheet in &sheets {
        let Some(header) = sheet.rows.first() else {
            continue;
        };

        let index_of =
            |name: &str| header.iter().position(|cell| normalize_header(cell) == name);
        let (Some(vehicle_idx), Some(driver_idx)) =
            (index_of(ROSTER_COL_VEHICLE), index_of(ROSTER_COL_DRIVER))
        else {
            warn!(
                "Roster sheet {} in {} lacks the {}/{} columns; skipping",
                sheet.name,
                path.display(),
                ROSTER_COL_VEHICLE,
                ROSTER_COL_DRIVER
            );
            continue;
        };

        for row in &sheet.rows[1..] {
            let vehicle = row.get(vehicle_idx).map(|c| c.trim()).unwrap_or("");
            let driver = row.get(driver_idx).map(|c| c.trim()).unwrap_or("");
            if vehicle.is_empty() || driver.is_empty() {
                continue;
            }
            roster.insert(vehicle.to_string(), driver.to_string());
        }
    }

    debug!("Loaded {} roster entries from {}", roster.len(), path.display());
    Ok(roster)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

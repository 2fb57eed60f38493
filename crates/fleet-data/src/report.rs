//! Report assembly: deterministic ordering, the fixed five-column layout,
//! and the date-range file name.

use chrono::NaiveDate;
use fleet_core::models::{RawEvent, VehicleReport};

use crate::aggregator::DATE_KEY_FORMAT;

/// Sheet label of the single output sheet.
pub const REPORT_SHEET_NAME: &str = "Report";

/// Column labels, in output order: vehicle tag, driver name, days summary,
/// total km, route summary.
pub const REPORT_COLUMNS: [&str; 5] = ["מס' רכב", "שם הנהג", "Дни", "Суммарные км", "מקומות"];

/// File-name prefix of every report this tool writes.
pub const OUTPUT_FILE_PREFIX: &str = "truck_drivers_reports_";

/// Put the vehicle reports into their final order (ascending vehicle tag).
pub fn build_report(mut reports: Vec<VehicleReport>) -> Vec<VehicleReport> {
    reports.sort_by(|a, b| a.vehicle_tag.cmp(&b.vehicle_tag));
    reports
}

/// Render the header row plus one row per vehicle, in [`REPORT_COLUMNS`]
/// order. The distance uses Rust's shortest round-trip float rendering.
pub fn report_rows(reports: &[VehicleReport]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(reports.len() + 1);
    rows.push(REPORT_COLUMNS.iter().map(|c| c.to_string()).collect());

    for report in reports {
        rows.push(vec![
            report.vehicle_tag.clone(),
            report.driver_name.clone(),
            report.days_summary.clone(),
            report.total_km.to_string(),
            report.route_summary.clone(),
        ]);
    }

    rows
}

/// Smallest and largest calendar day among the retained events.
pub fn event_date_range(events: &[RawEvent]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = events.iter().map(RawEvent::date);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), date| {
        (lo.min(date), hi.max(date))
    }))
}

/// Report file name embedding the covered date range.
///
/// A single-day run yields `truck_drivers_reports_<day>.csv`; a multi-day
/// run `truck_drivers_reports_<min>_to_<max>.csv`.
pub fn report_file_name(min_date: NaiveDate, max_date: NaiveDate) -> String {
    if min_date == max_date {
        format!(
            "{}{}.csv",
            OUTPUT_FILE_PREFIX,
            min_date.format(DATE_KEY_FORMAT)
        )
    } else {
        format!(
            "{}{}_to_{}.csv",
            OUTPUT_FILE_PREFIX,
            min_date.format(DATE_KEY_FORMAT),
            max_date.format(DATE_KEY_FORMAT)
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

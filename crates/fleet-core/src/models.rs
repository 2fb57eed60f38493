use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Driver label used when no telemetry row named a driver.
pub const UNKNOWN_DRIVER: &str = "Unknown";

/// Mapping from vehicle number to the driver officially assigned to it.
///
/// Loaded once per run from the optional roster spreadsheet and treated as
/// read-only afterwards. Roster names always take precedence over names seen
/// in the telemetry rows.
pub type DriverRoster = HashMap<String, String>;

/// One data row exactly as it came out of a spreadsheet, before any
/// normalization.
///
/// Every field is the raw cell text, or `None` where the sheet had no such
/// column or the cell was absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// Vehicle identification tag cell.
    pub vehicle_tag: Option<String>,
    /// Message-time cell, expected as `DD/MM/YYYY HH:MM:SS`.
    pub timestamp: Option<String>,
    /// Distance cell in kilometres.
    pub distance_km: Option<String>,
    /// Street address cell.
    pub address: Option<String>,
    /// Driver name cell.
    pub driver_name: Option<String>,
}

/// A single normalized telemetry event.
///
/// Produced by [`crate::normalize::normalize_row`]; a `RawEvent` either has a
/// valid timestamp and a non-empty vehicle tag or it does not exist at all.
/// Partially-normalized events never escape the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Non-empty vehicle identification tag, the grouping key.
    pub vehicle_tag: String,
    /// Local wall-clock time the telemetry unit recorded the event.
    pub timestamp: NaiveDateTime,
    /// Kilometres attributed to this event; 0.0 when the cell was blank or
    /// unparseable.
    pub distance_km: f64,
    /// Street address at event time, if the cell held one.
    pub address: Option<String>,
    /// Driver name at event time, if the cell held one.
    pub driver_name: Option<String>,
}

impl RawEvent {
    /// Calendar day the event belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// All of one vehicle's activity on one calendar day.
///
/// Only ever created by folding events, so an aggregate with zero
/// constituent events cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    /// Vehicle the day belongs to.
    pub vehicle_tag: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// Sum of the constituent events' distances.
    pub distance_km: f64,
    /// Addresses of the constituent events, in the order the rows were
    /// ingested, blanks omitted.
    pub addresses: Vec<String>,
    /// First non-empty driver name among the constituent events.
    pub driver_name: Option<String>,
}

impl DailyAggregate {
    /// Driver name with the [`UNKNOWN_DRIVER`] fallback applied.
    pub fn driver_label(&self) -> &str {
        self.driver_name.as_deref().unwrap_or(UNKNOWN_DRIVER)
    }
}

/// Final per-vehicle summary row of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleReport {
    /// Vehicle identification tag.
    pub vehicle_tag: String,
    /// Attributed driver: roster name when the roster has the vehicle,
    /// otherwise the first name seen in telemetry, otherwise "Unknown".
    pub driver_name: String,
    /// Comma-joined `YYYY-MM-DD` list of the days the vehicle actually
    /// moved, ascending.
    pub days_summary: String,
    /// Total kilometres across all the vehicle's days, idle days included.
    pub total_km: f64,
    /// Multi-line route description derived from the visited addresses.
    pub route_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_event(tag: &str, y: i32, m: u32, d: u32) -> RawEvent {
        RawEvent {
            vehicle_tag: tag.to_string(),
            timestamp: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
            distance_km: 1.0,
            address: None,
            driver_name: None,
        }
    }

    #[test]
    fn test_raw_event_date() {
        let event = make_event("101", 2024, 1, 15);
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_driver_label_falls_back_to_unknown() {
        let day = DailyAggregate {
            vehicle_tag: "101".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            distance_km: 0.0,
            addresses: vec![],
            driver_name: None,
        };
        assert_eq!(day.driver_label(), UNKNOWN_DRIVER);
    }

    #[test]
    fn test_driver_label_uses_recorded_name() {
        let day = DailyAggregate {
            vehicle_tag: "101".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            distance_km: 0.0,
            addresses: vec![],
            driver_name: Some("Dani".to_string()),
        };
        assert_eq!(day.driver_label(), "Dani");
    }
}

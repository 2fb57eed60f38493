use chrono::NaiveDateTime;

use crate::models::{RawEvent, RawRow};

/// The one timestamp pattern the telemetry vendor emits.
///
/// Parsing is strict: a row whose message time does not match this exact
/// pattern is discarded whole, since it cannot be attributed to a day.
pub const EVENT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Parse a message-time cell against [`EVENT_TIMESTAMP_FORMAT`].
pub fn parse_event_timestamp(cell: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(cell.trim(), EVENT_TIMESTAMP_FORMAT).ok()
}

/// Trim a cell and drop it entirely when nothing is left.
pub fn clean_cell(cell: Option<&str>) -> Option<String> {
    let trimmed = cell?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Coerce a distance cell to kilometres, defaulting to zero.
///
/// Unlike the timestamp, a bad distance does not invalidate the row: the
/// row is kept and only its distance contribution is zeroed. Non-finite
/// values are treated the same as unparseable text.
///
/// # Examples
///
/// ```
/// use fleet_core::normalize::coerce_distance_km;
///
/// assert_eq!(coerce_distance_km(Some("5.2")), 5.2);
/// assert_eq!(coerce_distance_km(Some(" 3 ")), 3.0);
/// assert_eq!(coerce_distance_km(Some("n/a")), 0.0);
/// assert_eq!(coerce_distance_km(None), 0.0);
/// ```
pub fn coerce_distance_km(cell: Option<&str>) -> f64 {
    cell.and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|km| km.is_finite())
        .unwrap_or(0.0)
}

/// Turn one raw spreadsheet row into a normalized event, or nothing.
///
/// Discards the row when the message time does not parse or the vehicle tag
/// is blank; every other defect is repaired in place (distance to 0.0,
/// blank text cells to `None`). A returned event is always fully formed.
pub fn normalize_row(row: &RawRow) -> Option<RawEvent> {
    let timestamp = parse_event_timestamp(row.timestamp.as_deref()?)?;
    let vehicle_tag = clean_cell(row.vehicle_tag.as_deref())?;

    Some(RawEvent {
        vehicle_tag,
        timestamp,
        distance_km: coerce_distance_km(row.distance_km.as_deref()),
        address: clean_cell(row.address.as_deref()),
        driver_name: clean_cell(row.driver_name.as_deref()),
    })
}

//! Two-phase aggregation from telemetry events to vehicle summary rows.
//!
//! Phase A folds events into per-vehicle, per-day aggregates; Phase B folds
//! those into one row per vehicle with the distance total, the moving-days
//! list and the route summary. A post-fold filter drops vehicles that never
//! moved, and the roster override replaces driver names last.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use fleet_core::models::{DailyAggregate, DriverRoster, RawEvent, VehicleReport, UNKNOWN_DRIVER};
use tracing::debug;

/// First line of every non-empty route summary.
pub const ROUTE_START_MARKER: &str = "Старт";
/// Last line of every non-empty route summary.
pub const ROUTE_FINISH_MARKER: &str = "Финиш";
/// Route summary used when no address yielded a city.
pub const ROUTE_EMPTY_SENTINEL: &str = "Нет данных";
/// Cities per route line.
pub const ROUTE_CITIES_PER_LINE: usize = 7;

/// Date format of the days-summary entries; lexicographic order of these
/// strings equals chronological order.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

// ── Phase A: daily fold ───────────────────────────────────────────────────────

/// Fold events into one [`DailyAggregate`] per `(vehicle, date)`.
///
/// Events must be in ingestion order (the loader guarantees this); each
/// day's address trail keeps that order, and the day's driver is the first
/// event that named one. Returns the aggregates sorted by vehicle tag, then
/// date.
pub fn fold_daily(events: &[RawEvent]) -> Vec<DailyAggregate> {
    // BTreeMap keys give the (vehicle, date) output order for free.
    let mut map: BTreeMap<(String, NaiveDate), DailyAggregate> = BTreeMap::new();

    for event in events {
        let day = map
            .entry((event.vehicle_tag.clone(), event.date()))
            .or_insert_with(|| DailyAggregate {
                vehicle_tag: event.vehicle_tag.clone(),
                date: event.date(),
                distance_km: 0.0,
                addresses: Vec::new(),
                driver_name: None,
            });

        day.distance_km += event.distance_km;
        if let Some(address) = &event.address {
            day.addresses.push(address.clone());
        }
        if day.driver_name.is_none() {
            day.driver_name = event.driver_name.clone();
        }
    }

    debug!("Folded {} events into {} vehicle-days", events.len(), map.len());
    map.into_values().collect()
}

// ── Phase B: vehicle fold ─────────────────────────────────────────────────────

/// Fold daily aggregates into one [`VehicleReport`] per vehicle.
///
/// Days must be in ascending date order within each vehicle ([`fold_daily`]
/// produces them this way); the route summary walks addresses in that order.
/// The reported driver is the first day's, roster overrides come later.
pub fn fold_vehicles(days: &[DailyAggregate]) -> Vec<VehicleReport> {
    let mut map: BTreeMap<String, VehicleAccumulator> = BTreeMap::new();

    for day in days {
        map.entry(day.vehicle_tag.clone())
            .or_insert_with(VehicleAccumulator::default)
            .add_day(day);
    }

    debug!("Folded {} vehicle-days into {} vehicles", days.len(), map.len());
    map.into_iter()
        .map(|(tag, acc)| acc.into_report(tag))
        .collect()
}

/// Running per-vehicle state while consuming its days.
#[derive(Default)]
struct VehicleAccumulator {
    moving_days: Vec<String>,
    total_km: f64,
    cities: Vec<String>,
    driver_name: Option<String>,
}

impl VehicleAccumulator {
    fn add_day(&mut self, day: &DailyAggregate) {
        if self.driver_name.is_none() {
            self.driver_name = Some(day.driver_label().to_string());
        }

        // Idle days stay out of the days list but still count toward the
        // total (a zero adds nothing; a correction row may be negative).
        if day.distance_km > 0.0 {
            self.moving_days
                .push(day.date.format(DATE_KEY_FORMAT).to_string());
        }
        self.total_km += day.distance_km;

        for address in &day.addresses {
            if let Some(city) = city_of(address) {
                let city = city.to_string();
                if !self.cities.contains(&city) {
                    self.cities.push(city);
                }
            }
        }
    }

    fn into_report(mut self, vehicle_tag: String) -> VehicleReport {
        self.moving_days.sort();
        VehicleReport {
            vehicle_tag,
            driver_name: self
                .driver_name
                .unwrap_or_else(|| UNKNOWN_DRIVER.to_string()),
            days_summary: self.moving_days.join(", "),
            total_km: self.total_km,
            route_summary: route_summary(&self.cities),
        }
    }
}

/// City part of an address: the substring after the last comma.
///
/// Addresses without a comma carry no city and contribute nothing to the
/// route; so does a trailing comma with nothing after it.
fn city_of(address: &str) -> Option<&str> {
    let (_, city) = address.rsplit_once(',')?;
    let city = city.trim();
    if city.is_empty() {
        None
    } else {
        Some(city)
    }
}

/// Render the deduplicated city list as the multi-line route block.
fn route_summary(cities: &[String]) -> String {
    if cities.is_empty() {
        return ROUTE_EMPTY_SENTINEL.to_string();
    }

    let mut lines = Vec::with_capacity(cities.len() / ROUTE_CITIES_PER_LINE + 2);
    lines.push(ROUTE_START_MARKER.to_string());
    for chunk in cities.chunks(ROUTE_CITIES_PER_LINE) {
        lines.push(chunk.join(" - "));
    }
    lines.push(ROUTE_FINISH_MARKER.to_string());
    lines.join("\n")
}

// ── Post-fold filter ──────────────────────────────────────────────────────────

/// Keep only vehicles that actually moved (`total_km > 0`).
pub fn retain_moving(reports: Vec<VehicleReport>) -> Vec<VehicleReport> {
    reports
        .into_iter()
        .filter(|report| report.total_km > 0.0)
        .collect()
}

// ── Roster override ───────────────────────────────────────────────────────────

/// Replace driver names with the roster's where the vehicle is listed.
///
/// The roster always wins, whether the telemetry name was "Unknown" or a
/// real one. Vehicles only present in the roster gain no report row.
pub fn apply_roster(reports: Vec<VehicleReport>, roster: &DriverRoster) -> Vec<VehicleReport> {
    reports
        .into_iter()
        .map(|mut report| {
            if let Some(driver) = roster.get(&report.vehicle_tag) {
                report.driver_name = driver.clone();
            }
            report
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

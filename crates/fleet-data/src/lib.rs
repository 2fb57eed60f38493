//! Data ingestion and aggregation layer for the fleet report tool.
//!
//! Responsible for discovering and loading Ituran telemetry export files,
//! folding the normalized events into daily and per-vehicle summaries, and
//! writing the finished report through the tabular backend.

pub mod aggregator;
pub mod analysis;
pub mod reader;
pub mod report;
pub mod roster;
pub mod tabular;

pub use fleet_core as core;

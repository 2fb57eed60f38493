//! Core domain layer for the fleet report tool.
//!
//! Holds the telemetry record model, the row normalization rules, the
//! error taxonomy and the CLI settings with their persisted last-used
//! parameter store. Everything here is pure and filesystem-free except
//! the settings persistence itself.

pub mod error;
pub mod models;
pub mod normalize;
pub mod settings;

pub use error::{FleetError, Result};

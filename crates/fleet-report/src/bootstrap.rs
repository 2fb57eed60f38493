use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fleet_data::roster::ROSTER_FILE_NAME;

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the `~/.fleet-report/` directory exists.
///
/// It holds the last-used-paths store and is a fallback location for the
/// driver roster.
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(home.join(".fleet-report"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised. All output
/// goes to stderr so it never mixes with the report text on stdout.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    // Map the CLI log-level names to tracing level names (tracing uses lowercase).
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Roster discovery ───────────────────────────────────────────────────────────

/// Attempt to locate the driver roster when `--roster` is not given.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `truck-drivers.csv` next to the executable
/// 2. `~/.fleet-report/truck-drivers.csv`
///
/// Returns `None` when neither path exists.
pub fn discover_roster_path() -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(ROSTER_FILE_NAME));
        }
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".fleet-report").join(ROSTER_FILE_NAME));
    }

    candidates.into_iter().find(|p| p.exists())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

mod bootstrap;

use anyhow::Result;
use fleet_core::settings::Settings;
use fleet_core::FleetError;
use fleet_data::analysis::{analyze_files, ReportConfig, RunSummary};
use fleet_data::tabular::{CsvTableReader, CsvTableWriter};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Fleet Report v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.clear {
        println!("Saved paths cleared.");
        return Ok(());
    }

    let config = resolve_config(&settings)?;
    tracing::info!(
        "Input: {}, Output: {}",
        config.input_dir.display(),
        config.output_dir.display()
    );

    match analyze_files(&config, &CsvTableReader, &CsvTableWriter) {
        Ok(summary) => {
            tracing::info!("Saved successfully");
            print_summary(&summary);
            Ok(())
        }
        // Empty runs are reported to the user, not treated as failures.
        Err(err @ FleetError::NoInputFiles(_)) | Err(err @ FleetError::EmptyAfterAggregation) => {
            println!("{}", err);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Turn parsed settings into a [`ReportConfig`], discovering the roster when
/// no `--roster` flag was given.
fn resolve_config(settings: &Settings) -> fleet_core::Result<ReportConfig> {
    let Some(input_dir) = settings.input_dir.clone() else {
        return Err(FleetError::Config(
            "no input directory; pass --input-dir on the first run".to_string(),
        ));
    };
    let Some(output_dir) = settings.output_dir.clone() else {
        return Err(FleetError::Config(
            "no output directory; pass --output-dir on the first run".to_string(),
        ));
    };

    let roster_path = settings
        .roster
        .clone()
        .or_else(bootstrap::discover_roster_path);
    if let Some(path) = &roster_path {
        tracing::debug!("Using driver roster at {}", path.display());
    }

    Ok(ReportConfig {
        input_dir,
        output_dir,
        roster_path,
    })
}

/// Print the per-vehicle listing and the saved-file confirmation.
fn print_summary(summary: &RunSummary) {
    println!("Combined Report:");
    for report in &summary.reports {
        println!(
            "  {}  {}  days: {}  total km: {}",
            report.vehicle_tag, report.driver_name, report.days_summary, report.total_km
        );
    }
    println!();
    println!(
        "{} vehicles over {} to {} ({} rows read, {} discarded)",
        summary.vehicles_reported,
        summary.date_range.0,
        summary.date_range.1,
        summary.rows_read,
        summary.rows_discarded
    );
    println!("Report saved to {}", summary.output_path.display());
}

// ── Tests ──────────────────────────────────────────────────────────────────────

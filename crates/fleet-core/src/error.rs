use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the fleet report tool.
#[derive(Error, Debug)]
pub enum FleetError {
    /// The input directory held no telemetry export files.
    #[error("No Ituran files found in {0}")]
    NoInputFiles(PathBuf),

    /// Every row was discarded during normalization, or no vehicle had a
    /// positive distance total. Nothing is written in either case.
    #[error("No usable data left after aggregation; nothing to report")]
    EmptyAfterAggregation,

    /// A matched export file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report file could not be written into the output directory.
    #[error("Failed to write report to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for spreadsheet parse errors from the tabular backend.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the fleet crates.
pub type Result<T> = std::result::Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_no_input_files() {
        let err = FleetError::NoInputFiles(PathBuf::from("/exports"));
        assert_eq!(err.to_string(), "No Ituran files found in /exports");
    }

    #[test]
    fn test_error_display_empty_after_aggregation() {
        let err = FleetError::EmptyAfterAggregation;
        assert_eq!(
            err.to_string(),
            "No usable data left after aggregation; nothing to report"
        );
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = FleetError::FileRead {
            path: PathBuf::from("/exports/data.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/exports/data.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_output_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = FleetError::OutputWrite {
            path: PathBuf::from("/reports/out.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to write report to"));
        assert!(msg.contains("/reports/out.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_config() {
        let err = FleetError::Config("no input directory".to_string());
        assert_eq!(err.to_string(), "Configuration error: no input directory");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FleetError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}

use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Per-vehicle movement reports from Ituran telemetry exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fleet-report",
    about = "Per-vehicle movement reports from Ituran telemetry exports",
    version
)]
pub struct Settings {
    /// Directory scanned for telemetry export files
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory the finished report is written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Driver roster spreadsheet (vehicle_number, driver_name)
    #[arg(long)]
    pub roster: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Forget the remembered input/output directories
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedPaths ──────────────────────────────────────────────────────────────

/// Persisted last-used directories saved to `~/.fleet-report/last_used.json`.
///
/// The original tool remembered the directories the user picked between runs;
/// this store keeps that behavior for the CLI. Only directories are
/// remembered, the roster path is re-discovered each run.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl LastUsedPaths {
    /// Return the default path to the persisted config file.
    /// Uses `~/.fleet-report/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".fleet-report").join("last_used.json")
    }

    /// Load persisted paths from the default location.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted paths from an explicit location.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to parse last-used paths store; ignoring it");
            Self::default()
        })
    }

    /// Atomically write the paths to the default location, creating parent
    /// directories if needed.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write the paths to an explicit location.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> Result<(), std::io::Error> {
        Self::clear_at(&Self::config_path())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, fill unset directories from the last-used store,
    /// and persist the merged result for the next run.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedPaths::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] but accepts an explicit
    /// argument list, enabling unit-testing without spawning subprocesses.
    pub fn load_with_last_used_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::load_with_last_used_impl(args, &LastUsedPaths::config_path())
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedPaths::clear_at(config_path);
            // Forget the store and return without re-persisting.
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedPaths::load_from(config_path);

        // Fill in last-used directories for flags that were NOT explicitly set
        // on the command line (CLI always wins). The roster path is never
        // loaded from last-used; it is re-discovered next to the executable.
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(&matches, "input_dir") && settings.input_dir.is_none() {
            settings.input_dir = last.input_dir;
        }
        if !is_arg_explicitly_set(&matches, "output_dir") && settings.output_dir.is_none() {
            settings.output_dir = last.output_dir;
        }

        settings = Self::apply_debug_flag(settings);

        // Persist the merged directories for the next run.
        let paths = LastUsedPaths::from(&settings);
        let _ = paths.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedPaths {
    fn from(s: &Settings) -> Self {
        LastUsedPaths {
            input_dir: s.input_dir.clone(),
            output_dir: s.output_dir.clone(),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Build the config path inside `tmp`.
    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedPaths::config_path_in(tmp.path())
    }

    /// Save `paths` to `tmp`, then load them back.
    fn round_trip(tmp: &TempDir, paths: &LastUsedPaths) -> LastUsedPaths {
        let path = tmp_config_path(tmp);
        paths.save_to(&path).expect("save");
        LastUsedPaths::load_from(&path)
    }

    // ── LastUsedPaths persistence ─────────────────────────────────────────────

    #[test]
    fn test_last_used_paths_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let paths = LastUsedPaths {
            input_dir: Some(PathBuf::from("/data/exports")),
            output_dir: Some(PathBuf::from("/data/reports")),
        };

        let loaded = round_trip(&tmp, &paths);

        assert_eq!(loaded.input_dir, Some(PathBuf::from("/data/exports")));
        assert_eq!(loaded.output_dir, Some(PathBuf::from("/data/reports")));
    }

    #[test]
    fn test_last_used_paths_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        // Save something first.
        let paths = LastUsedPaths {
            input_dir: Some(PathBuf::from("/data/exports")),
            ..Default::default()
        };
        paths.save_to(&path).expect("save");
        assert!(path.exists(), "file must exist after save");

        // Clear it.
        LastUsedPaths::clear_at(&path).expect("clear");
        assert!(!path.exists(), "file must be gone after clear");
    }

    #[test]
    fn test_last_used_paths_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        // No file created – load should return default.
        let loaded = LastUsedPaths::load_from(&tmp_config_path(&tmp));
        assert!(loaded.input_dir.is_none());
        assert!(loaded.output_dir.is_none());
    }

    #[test]
    fn test_last_used_paths_default_when_unparseable() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).expect("mkdir");
        std::fs::write(&path, "{not json").expect("write");

        let loaded = LastUsedPaths::load_from(&path);
        assert!(loaded.input_dir.is_none());
        assert!(loaded.output_dir.is_none());
    }

    // ── Settings parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        // Parse with only the binary name (no flags) to get all defaults.
        let settings = Settings::parse_from(["fleet-report"]);

        assert!(settings.input_dir.is_none());
        assert!(settings.output_dir.is_none());
        assert!(settings.roster.is_none());
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_directories() {
        let settings = Settings::parse_from([
            "fleet-report",
            "--input-dir",
            "/data/exports",
            "--output-dir",
            "/data/reports",
        ]);
        assert_eq!(settings.input_dir, Some(PathBuf::from("/data/exports")));
        assert_eq!(settings.output_dir, Some(PathBuf::from("/data/reports")));
    }

    #[test]
    fn test_settings_cli_roster() {
        let settings = Settings::parse_from(["fleet-report", "--roster", "/data/drivers.csv"]);
        assert_eq!(settings.roster, Some(PathBuf::from("/data/drivers.csv")));
    }

    #[test]
    fn test_settings_cli_debug_flag() {
        let settings = Settings::parse_from(["fleet-report", "--debug"]);
        assert!(settings.debug);
    }

    #[test]
    fn test_from_settings_to_last_used() {
        let settings = Settings {
            input_dir: Some(PathBuf::from("/in")),
            output_dir: Some(PathBuf::from("/out")),
            roster: Some(PathBuf::from("/roster.csv")),
            log_level: "INFO".to_string(),
            debug: false,
            clear: false,
        };

        let paths = LastUsedPaths::from(&settings);

        assert_eq!(paths.input_dir, Some(PathBuf::from("/in")));
        assert_eq!(paths.output_dir, Some(PathBuf::from("/out")));
        // The roster path is NOT stored in LastUsedPaths.
    }

    // ── load_with_last_used (uses config path injection) ──────────────────────

    #[test]
    fn test_load_with_last_used_fills_persisted_dirs() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let paths = LastUsedPaths {
            input_dir: Some(PathBuf::from("/data/exports")),
            output_dir: Some(PathBuf::from("/data/reports")),
        };
        paths.save_to(&config_path).expect("save");

        // Parse without directory flags → should use persisted values.
        let settings =
            Settings::load_with_last_used_impl(vec!["fleet-report".into()], &config_path);
        assert_eq!(settings.input_dir, Some(PathBuf::from("/data/exports")));
        assert_eq!(settings.output_dir, Some(PathBuf::from("/data/reports")));
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let paths = LastUsedPaths {
            input_dir: Some(PathBuf::from("/old/exports")),
            output_dir: Some(PathBuf::from("/old/reports")),
        };
        paths.save_to(&config_path).expect("save");

        // Explicit --input-dir on the CLI must win.
        let settings = Settings::load_with_last_used_impl(
            vec!["fleet-report".into(), "--input-dir".into(), "/new/exports".into()],
            &config_path,
        );
        assert_eq!(settings.input_dir, Some(PathBuf::from("/new/exports")));
        // The untouched flag still falls back to the store.
        assert_eq!(settings.output_dir, Some(PathBuf::from("/old/reports")));
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let paths = LastUsedPaths {
            input_dir: Some(PathBuf::from("/data/exports")),
            ..Default::default()
        };
        paths.save_to(&config_path).expect("save");
        assert!(config_path.exists(), "file must exist before clear");

        let settings = Settings::load_with_last_used_impl(
            vec!["fleet-report".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        // The cleared store is not read either.
        assert!(settings.input_dir.is_none());
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["fleet-report".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["fleet-report".into(), "--input-dir".into(), "/data/exports".into()],
            &config_path,
        );

        // After a run the file should have been created.
        assert!(
            config_path.exists(),
            "config file must be persisted after run"
        );
        let loaded = LastUsedPaths::load_from(&config_path);
        assert_eq!(loaded.input_dir, Some(PathBuf::from("/data/exports")));
    }
}

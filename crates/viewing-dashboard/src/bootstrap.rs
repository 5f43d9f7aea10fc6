use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use dashboard_core::countries::CountryTable;
use dashboard_core::settings::Settings;
use dashboard_data::loader::DataSource;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-user directory under `$HOME`.
pub const APP_DIR: &str = ".viewing-dashboard";

/// Export read when neither `--data-dir` nor `--archive` is given.
pub const DEFAULT_DATA_DIR: &str = "assets";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.viewing-dashboard/` and its `logs/` sub-directory exist and
/// return the former.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

/// Same as [`ensure_directories`] below an explicit home directory.
pub fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let app_dir = home.join(APP_DIR);
    std::fs::create_dir_all(app_dir.join("logs"))
        .with_context(|| format!("creating {}", app_dir.display()))?;
    Ok(app_dir)
}

/// `<app_dir>/logs/viewing-dashboard.log`.
pub fn default_log_file(app_dir: &Path) -> PathBuf {
    app_dir.join("logs").join("viewing-dashboard.log")
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map the CLI level names onto `tracing` filter directives.
pub fn normalise_level(log_level: &str) -> String {
    let upper = log_level.to_uppercase();
    match upper.as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, output is appended to that file without ANSI colours
/// so that it never lands on a screen owned by the TUI. Otherwise it goes to
/// stderr. Falls back to `info` for unrecognised levels.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(normalise_level(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
    }

    Ok(())
}

// ── Input discovery ────────────────────────────────────────────────────────────

/// Where the export is read from: `--archive`, else `--data-dir`, else
/// `./assets`.
///
/// Archives are extracted below `--extract-to`, or a fixed directory under the
/// system temp dir. Each load clears the previous extraction first.
pub fn resolve_data_source(settings: &Settings) -> DataSource {
    if let Some(archive) = &settings.archive {
        let extract_to = settings
            .extract_to
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("viewing-dashboard-export"));
        return DataSource::Archive {
            archive: archive.clone(),
            extract_to,
        };
    }
    DataSource::Directory(
        settings
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
    )
}

/// The `--countries` table when given, otherwise the bundled one.
pub fn load_country_table(settings: &Settings) -> anyhow::Result<CountryTable> {
    let table = match &settings.countries {
        Some(path) => CountryTable::load(path)?,
        None => CountryTable::bundled()?,
    };
    Ok(table)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn settings(args: &[&str]) -> Settings {
        Settings::parse_from(std::iter::once("viewing-dashboard").chain(args.iter().copied()))
    }

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");
        let app_dir = ensure_directories_in(tmp.path()).expect("directories");
        assert_eq!(app_dir, tmp.path().join(APP_DIR));
        assert!(app_dir.join("logs").is_dir());
        // Idempotent.
        ensure_directories_in(tmp.path()).expect("second call");
    }

    #[test]
    fn test_default_log_file() {
        let path = default_log_file(Path::new("/home/u/.viewing-dashboard"));
        assert_eq!(
            path,
            PathBuf::from("/home/u/.viewing-dashboard/logs/viewing-dashboard.log")
        );
    }

    #[test]
    fn test_normalise_level() {
        assert_eq!(normalise_level("DEBUG"), "debug");
        assert_eq!(normalise_level("INFO"), "info");
        assert_eq!(normalise_level("WARNING"), "warn");
        assert_eq!(normalise_level("ERROR"), "error");
        assert_eq!(normalise_level("Trace"), "trace");
    }

    #[test]
    fn test_resolve_data_source_default() {
        assert_eq!(
            resolve_data_source(&settings(&[])),
            DataSource::Directory(PathBuf::from(DEFAULT_DATA_DIR))
        );
    }

    #[test]
    fn test_resolve_data_source_directory() {
        assert_eq!(
            resolve_data_source(&settings(&["--data-dir", "/exports/2023"])),
            DataSource::Directory(PathBuf::from("/exports/2023"))
        );
    }

    #[test]
    fn test_resolve_data_source_archive() {
        let source = resolve_data_source(&settings(&[
            "--archive",
            "/dl/export.zip",
            "--extract-to",
            "/tmp/x",
        ]));
        assert_eq!(
            source,
            DataSource::Archive {
                archive: PathBuf::from("/dl/export.zip"),
                extract_to: PathBuf::from("/tmp/x"),
            }
        );

        let DataSource::Archive { extract_to, .. } =
            resolve_data_source(&settings(&["--archive", "/dl/export.zip"]))
        else {
            panic!("expected an archive source");
        };
        assert!(extract_to.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn test_load_country_table() {
        let bundled = load_country_table(&settings(&[])).expect("bundled table");
        assert!(bundled.lookup_iso2("FR").is_some());

        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("codes.csv");
        std::fs::write(&path, "Narnia,NA,NAR,999\n").expect("write");
        let custom = load_country_table(&settings(&["--countries", path.to_str().unwrap()]))
            .expect("custom table");
        assert_eq!(custom.len(), 1);
        assert_eq!(custom.lookup_iso2("NA").unwrap().iso_3, "NAR");

        let missing = settings(&["--countries", "/definitely/not/here.csv"]);
        assert!(load_country_table(&missing).is_err());
    }
}

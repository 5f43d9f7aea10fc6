use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the viewing dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A delimited table could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// One of the expected export tables is not present in the data source.
    #[error("Input file {file} not found under {dir}")]
    MissingInput { file: String, dir: PathBuf },

    /// The uploaded archive could not be opened or extracted.
    #[error("Failed to extract archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A time-valued column held a string that is not a valid time.
    #[error("Invalid {column} value {value:?} on row {row}")]
    TimeParse {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/exports/ViewingActivity.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/exports/ViewingActivity.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_missing_input() {
        let err = DashboardError::MissingInput {
            file: "BillingHistory.csv".to_string(),
            dir: PathBuf::from("/tmp/export"),
        };
        assert_eq!(
            err.to_string(),
            "Input file BillingHistory.csv not found under /tmp/export"
        );
    }

    #[test]
    fn test_error_display_time_parse() {
        let err = DashboardError::TimeParse {
            row: 4,
            column: "Duration",
            value: "1h30".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid Duration value \"1h30\" on row 4");
    }

    #[test]
    fn test_error_display_terminal() {
        let err = DashboardError::Terminal("crossterm failure".to_string());
        assert_eq!(err.to_string(), "Terminal error: crossterm failure");
    }

    #[test]
    fn test_error_display_config() {
        let err = DashboardError::Config("unknown timezone Mars/Olympus".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown timezone Mars/Olympus"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DashboardError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_zip() {
        let err: DashboardError = zip::result::ZipError::FileNotFound.into();
        assert!(err.to_string().starts_with("Failed to extract archive"));
    }
}

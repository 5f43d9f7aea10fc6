//! Export discovery and CSV loading.
//!
//! An export is either a directory that holds the two tables or a `.zip`
//! archive that is extracted first. Real exports nest the tables in
//! sub-folders, so both are located recursively.

use std::fs::File;
use std::path::{Path, PathBuf};

use dashboard_core::countries::CountryTable;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{BillingRecord, ViewingRecord};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// File name of the viewing-activity table.
pub const VIEWING_FILE: &str = "ViewingActivity.csv";
/// File name of the billing-history table.
pub const BILLING_FILE: &str = "BillingHistory.csv";
/// Sub-directory of `extract_to` that holds the current archive's contents.
pub const EXTRACTED_DIR: &str = "current-export";

// ── DataSource ────────────────────────────────────────────────────────────────

/// Where the two export tables come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A directory containing (possibly below sub-folders) both tables.
    Directory(PathBuf),
    /// A `.zip` export, extracted below `extract_to` before reading.
    Archive { archive: PathBuf, extract_to: PathBuf },
}

impl DataSource {
    /// Short human-readable description for the header and logs.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Directory(dir) => dir.display().to_string(),
            DataSource::Archive { archive, .. } => archive.display().to_string(),
        }
    }
}

/// The two tables as read from disk, before any normalization.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub viewing: Vec<ViewingRecord>,
    pub billing: Vec<BillingRecord>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read both tables from `source`, extracting the archive first if needed.
pub fn load_tables(source: &DataSource) -> Result<RawTables> {
    let root = match source {
        DataSource::Directory(dir) => dir.clone(),
        DataSource::Archive {
            archive,
            extract_to,
        } => extract_archive(archive, extract_to)?,
    };

    let viewing_path = find_input_file(&root, VIEWING_FILE)?;
    let billing_path = find_input_file(&root, BILLING_FILE)?;

    let viewing = read_viewing_records(&viewing_path)?;
    let billing = read_billing_records(&billing_path)?;

    info!(
        "Loaded {} viewing rows and {} billing rows from {}",
        viewing.len(),
        billing.len(),
        source.describe()
    );

    Ok(RawTables { viewing, billing })
}

/// Extract every entry of the zip at `archive` into `dest/current-export`
/// and return that directory.
///
/// The directory is emptied first so that tables left by an earlier archive
/// can never be found in place of the new ones. Nothing else under `dest` is
/// touched.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<PathBuf> {
    let file = open_input(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;

    let root = dest.join(EXTRACTED_DIR);
    if root.exists() {
        debug!("Clearing previous extraction at {}", root.display());
        std::fs::remove_dir_all(&root)?;
    }
    std::fs::create_dir_all(&root)?;

    let entries = zip.len();
    zip.extract(&root)?;
    debug!(
        "Extracted {} archive entries from {} into {}",
        entries,
        archive.display(),
        root.display()
    );
    Ok(root)
}

/// Locate `name` under `root`, preferring the shallowest match.
pub fn find_input_file(root: &Path, name: &str) -> Result<PathBuf> {
    let direct = root.join(name);
    if direct.is_file() {
        return Ok(direct);
    }

    walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| (entry.depth(), entry.into_path()))
        .min()
        .map(|(_, path)| path)
        .ok_or_else(|| DashboardError::MissingInput {
            file: name.to_string(),
            dir: root.to_path_buf(),
        })
}

/// Read `ViewingActivity.csv`. Spaces in header names become underscores
/// (`Profile Name` → `Profile_Name`) before columns are mapped.
pub fn read_viewing_records(path: &Path) -> Result<Vec<ViewingRecord>> {
    let mut rdr = csv::Reader::from_reader(open_input(path)?);
    let headers: csv::StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().replace(' ', "_"))
        .collect();
    rdr.set_headers(headers);
    deserialize_all(rdr)
}

/// Read `BillingHistory.csv`; headers are kept as written.
pub fn read_billing_records(path: &Path) -> Result<Vec<BillingRecord>> {
    let mut rdr = csv::Reader::from_reader(open_input(path)?);
    let headers: csv::StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    rdr.set_headers(headers);
    deserialize_all(rdr)
}

/// Read the headerless country-code table at `path`.
pub fn load_country_codes(path: &Path) -> Result<CountryTable> {
    CountryTable::load(path)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn deserialize_all<T: DeserializeOwned>(mut rdr: csv::Reader<File>) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

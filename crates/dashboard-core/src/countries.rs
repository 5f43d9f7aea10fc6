//! ISO country-code lookup table used by the geographic panel.
//!
//! The table is a headerless four-column CSV: country name, ISO-2, ISO-3,
//! UN numeric code. A default copy is compiled into the binary.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::models::CountryCode;

const BUNDLED_TABLE: &str = include_str!("../../../assets/countries_iso.csv");

/// In-memory country-code table, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryTable {
    entries: Vec<CountryCode>,
}

impl CountryTable {
    /// The table shipped with the dashboard.
    pub fn bundled() -> Result<Self> {
        Self::from_reader(BUNDLED_TABLE.as_bytes())
    }

    /// Read a table from a file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        debug!(
            "Loaded {} country codes from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse a headerless `name,iso2,iso3,un` table.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for row in rdr.records() {
            let row = row?;
            let field = |i: usize| row.get(i).unwrap_or_default().to_string();
            entries.push(CountryCode {
                country_name: field(0),
                iso_2: field(1),
                iso_3: field(2),
                un_code: field(3),
            });
        }
        Ok(Self { entries })
    }

    /// Build a table from already-parsed entries.
    pub fn from_entries(entries: Vec<CountryCode>) -> Self {
        Self { entries }
    }

    /// First entry whose ISO-2 code equals `iso_2` exactly.
    pub fn lookup_iso2(&self, iso_2: &str) -> Option<&CountryCode> {
        self.entries.iter().find(|c| c.iso_2 == iso_2)
    }

    pub fn entries(&self) -> &[CountryCode] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bundled_table_parses() {
        let table = CountryTable::bundled().unwrap();
        assert!(table.len() > 200);
        let fr = table.lookup_iso2("FR").unwrap();
        assert_eq!(fr.iso_3, "FRA");
        assert_eq!(fr.country_name, "France");
        let us = table.lookup_iso2("US").unwrap();
        assert_eq!(us.iso_3, "USA");
    }

    #[test]
    fn test_from_reader_headerless() {
        let data = "France,FR,FRA,250\nBelgium,BE,BEL,056\n";
        let table = CountryTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[1].un_code, "056");
        assert!(table.lookup_iso2("BE").is_some());
        assert!(table.lookup_iso2("be").is_none());
        assert!(table.lookup_iso2("XX").is_none());
    }

    #[test]
    fn test_quoted_names_with_commas() {
        let data = "\"Korea, Republic of\",KR,KOR,410\n";
        let table = CountryTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.entries()[0].country_name, "Korea, Republic of");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Japan,JP,JPN,392").unwrap();
        let table = CountryTable::load(file.path()).unwrap();
        assert_eq!(table.lookup_iso2("JP").unwrap().iso_3, "JPN");
    }

    #[test]
    fn test_load_missing_file_is_file_read_error() {
        let err = CountryTable::load(Path::new("/nonexistent/countries.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::FileRead { .. }));
    }
}

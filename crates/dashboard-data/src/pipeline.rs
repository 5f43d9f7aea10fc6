//! Load → normalize → classify, producing the in-memory [`Dataset`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dashboard_core::countries::CountryTable;
use dashboard_core::error::Result;
use dashboard_core::models::{BillingRecord, ViewingEvent};
use dashboard_core::time_utils::TimezoneHandler;
use serde::Serialize;
use tracing::info;

use crate::classifier::classify_all;
use crate::loader::{load_tables, DataSource, RawTables};
use crate::normalizer::normalize;

// ── Public types ──────────────────────────────────────────────────────────────

/// Row counts collected while building a [`Dataset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub viewing_rows: usize,
    pub billing_rows: usize,
    pub dropped_short: usize,
    pub dropped_supplemental: usize,
    pub retained: usize,
}

/// Everything the aggregations read from.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Retained, classified viewing events in file order.
    pub events: Vec<ViewingEvent>,
    pub billing: Vec<BillingRecord>,
    pub countries: CountryTable,
    pub stats: LoadStats,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Distinct profile names among retained events, sorted.
    pub fn profiles(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| e.profile_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full ingest pipeline for `source`.
pub fn build_dataset(
    source: &DataSource,
    countries: CountryTable,
    tz: &TimezoneHandler,
) -> Result<Dataset> {
    let tables = load_tables(source)?;
    let dataset = build_dataset_from_tables(tables, countries, tz)?;
    info!(
        "Dataset ready from {}: {} events, {} billing rows",
        source.describe(),
        dataset.events.len(),
        dataset.billing.len()
    );
    Ok(dataset)
}

/// Normalize and classify already-loaded tables.
pub fn build_dataset_from_tables(
    tables: RawTables,
    countries: CountryTable,
    tz: &TimezoneHandler,
) -> Result<Dataset> {
    let RawTables { viewing, billing } = tables;
    let (normalized, norm) = normalize(viewing, tz)?;
    let events = classify_all(normalized);

    let stats = LoadStats {
        viewing_rows: norm.rows_read,
        billing_rows: billing.len(),
        dropped_short: norm.dropped_short,
        dropped_supplemental: norm.dropped_supplemental,
        retained: norm.retained,
    };

    Ok(Dataset {
        events,
        billing,
        countries,
        stats,
        loaded_at: Utc::now(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{ProfileFilter, ViewingAggregator};
    use crate::loader::{BILLING_FILE, VIEWING_FILE};
    use crate::metrics::{cost_total, headline_metrics};
    use crate::test_support::{BILLING_CSV, VIEWING_CSV};
    use dashboard_core::models::ContentType;
    use tempfile::TempDir;

    fn export_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(VIEWING_FILE), VIEWING_CSV).unwrap();
        std::fs::write(tmp.path().join(BILLING_FILE), BILLING_CSV).unwrap();
        tmp
    }

    fn build(tmp: &TempDir) -> Dataset {
        build_dataset(
            &DataSource::Directory(tmp.path().to_path_buf()),
            CountryTable::bundled().unwrap(),
            &TimezoneHandler::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_build_dataset_stats() {
        let tmp = export_dir();
        let ds = build(&tmp);
        assert_eq!(
            ds.stats,
            LoadStats {
                viewing_rows: 5,
                billing_rows: 3,
                dropped_short: 1,
                dropped_supplemental: 1,
                retained: 3,
            }
        );
        assert_eq!(ds.profiles(), vec!["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_build_dataset_classifies_events() {
        let tmp = export_dir();
        let ds = build(&tmp);
        let types: Vec<ContentType> = ds.events.iter().map(|e| e.content_type).collect();
        assert_eq!(
            types,
            vec![ContentType::Movie, ContentType::Serie, ContentType::Serie]
        );
        assert_eq!(ds.events[1].show_title, "Dark");
        assert_eq!(ds.events[2].show_title, "Lupin");
    }

    #[test]
    fn test_pipeline_end_to_end_aggregates() {
        let tmp = export_dir();
        let ds = build(&tmp);

        let series = ViewingAggregator::top_titles(&ds.events, ContentType::Serie, &ProfileFilter::All);
        assert_eq!(series.len(), 2);

        let countries =
            ViewingAggregator::country_sessions(&ds.events, &ds.countries, &ProfileFilter::All);
        assert_eq!(countries.rows.len(), 1);
        assert_eq!(countries.rows[0].iso_3, "FRA");
        assert_eq!(countries.rows[0].sessions, 2);
        // Kosovo has no ISO entry.
        assert_eq!(countries.unmatched_prefixes, 1);

        assert!((cost_total(&ds.billing) - 9.99).abs() < 1e-9);
        let m = headline_metrics(&ds.events, &ds.billing);
        assert_eq!(m.titles_watched, 3);
        assert_eq!(m.amount_label(), "9 €");
    }

    #[test]
    fn test_double_run_is_deterministic() {
        let tmp = export_dir();
        let first = build(&tmp);
        let second = build(&tmp);

        assert_eq!(first.events, second.events);
        assert_eq!(first.stats, second.stats);
        assert_eq!(
            ViewingAggregator::hours_by_profile(&first.events),
            ViewingAggregator::hours_by_profile(&second.events)
        );
        assert_eq!(
            ViewingAggregator::device_usage(&first.events, &ProfileFilter::All),
            ViewingAggregator::device_usage(&second.events, &ProfileFilter::All)
        );
    }

    #[test]
    fn test_bundled_sample_export_loads() {
        let assets = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        let ds = build_dataset(
            &DataSource::Directory(assets),
            CountryTable::bundled().unwrap(),
            &TimezoneHandler::default(),
        )
        .unwrap();
        assert!(ds.stats.retained > 0);
        assert!(ds
            .events
            .iter()
            .all(|e| e.total_watched_seconds > 30 && e.supplemental_video_type.is_none()));
    }
}

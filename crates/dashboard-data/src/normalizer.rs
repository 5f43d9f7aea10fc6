//! Turns raw viewing rows into typed records and applies the retention filter.

use chrono::{DateTime, Utc};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::ViewingRecord;
use dashboard_core::policy::MIN_WATCHED_SECONDS;
use dashboard_core::time_utils::{parse_clock_seconds, TimezoneHandler};
use serde::Serialize;
use tracing::debug;

/// A viewing row with parsed times and derived calendar fields, not yet
/// classified.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub profile_name: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub device_type: String,
    pub country: String,
    pub supplemental_video_type: Option<String>,
    pub total_watched_seconds: u32,
    /// Bookmark position in seconds.
    pub duration_minutes: u32,
    pub total_watched_hours: f64,
    pub watched_weekday: u8,
    pub watched_month: u32,
    pub watched_hour: u32,
}

impl NormalizedRecord {
    /// Trailers, hooks and recaps carry a supplemental type. Only an empty
    /// cell counts as absent; whitespace is a value.
    pub fn is_supplemental(&self) -> bool {
        self.supplemental_video_type
            .as_deref()
            .is_some_and(|s| !s.is_empty())
    }
}

/// Row counts for each filter stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows_read: usize,
    /// Rows with `total_watched_seconds <= MIN_WATCHED_SECONDS`.
    pub dropped_short: usize,
    /// Rows that passed the duration filter but were supplemental videos.
    pub dropped_supplemental: usize,
    pub retained: usize,
}

/// Parse every row, then keep only real viewings.
///
/// Every row is parsed before filtering, so a malformed time field fails the
/// whole load even if the row would have been dropped. Error row numbers are
/// 1-based over data rows.
pub fn normalize(
    records: Vec<ViewingRecord>,
    tz: &TimezoneHandler,
) -> Result<(Vec<NormalizedRecord>, NormalizeStats)> {
    let mut parsed = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        parsed.push(normalize_record(record, idx + 1, tz)?);
    }

    let mut stats = NormalizeStats {
        rows_read: parsed.len(),
        ..Default::default()
    };

    let long_enough: Vec<NormalizedRecord> = parsed
        .into_iter()
        .filter(|r| r.total_watched_seconds > MIN_WATCHED_SECONDS)
        .collect();
    stats.dropped_short = stats.rows_read - long_enough.len();

    let retained: Vec<NormalizedRecord> = long_enough
        .into_iter()
        .filter(|r| !r.is_supplemental())
        .collect();
    stats.dropped_supplemental = stats.rows_read - stats.dropped_short - retained.len();
    stats.retained = retained.len();

    debug!(
        "Normalized {} rows: {} too short, {} supplemental, {} retained",
        stats.rows_read, stats.dropped_short, stats.dropped_supplemental, stats.retained
    );

    Ok((retained, stats))
}

/// Parse a single row. `row` is only used for error reporting.
pub fn normalize_record(
    record: ViewingRecord,
    row: usize,
    tz: &TimezoneHandler,
) -> Result<NormalizedRecord> {
    let start_time =
        tz.parse_start_time(&record.start_time)
            .ok_or_else(|| DashboardError::TimeParse {
                row,
                column: "Start Time",
                value: record.start_time.clone(),
            })?;
    let total_watched_seconds =
        parse_clock_seconds(&record.duration).ok_or_else(|| DashboardError::TimeParse {
            row,
            column: "Duration",
            value: record.duration.clone(),
        })?;
    let duration_minutes =
        parse_clock_seconds(&record.bookmark).ok_or_else(|| DashboardError::TimeParse {
            row,
            column: "Bookmark",
            value: record.bookmark.clone(),
        })?;

    let local = tz.local_parts(start_time);

    Ok(NormalizedRecord {
        profile_name: record.profile_name,
        title: record.title,
        start_time,
        device_type: record.device_type,
        country: record.country,
        supplemental_video_type: record.supplemental_video_type,
        total_watched_seconds,
        duration_minutes,
        total_watched_hours: f64::from(total_watched_seconds) / 3600.0,
        watched_weekday: local.weekday,
        watched_month: local.month,
        watched_hour: local.hour,
    })
}

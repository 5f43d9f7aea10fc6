//! Movie/series classification and completion checks.

use std::sync::OnceLock;

use dashboard_core::models::{ContentType, ViewingEvent};
use dashboard_core::policy::{completion_threshold, SERIE_TITLE_PATTERN};
use regex::Regex;

use crate::normalizer::NormalizedRecord;

fn serie_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(SERIE_TITLE_PATTERN).expect("regex is valid"))
}

/// Text before the first colon, or the whole title when there is none.
///
/// `"Dark: Season 1: Secrets"` → `"Dark"`.
pub fn show_title(title: &str) -> &str {
    title.split_once(':').map_or(title, |(head, _)| head)
}

/// `watched / bookmark × 100` with plain float division.
///
/// A zero bookmark gives `+inf` for any positive watch time.
pub fn percent_watched(total_watched_seconds: u32, bookmark_seconds: u32) -> f64 {
    f64::from(total_watched_seconds) / f64::from(bookmark_seconds) * 100.0
}

/// `Serie` when the title, with parentheses removed, names a season or
/// episode; `Movie` otherwise.
pub fn classify_title(title: &str) -> ContentType {
    let stripped = title.replace(['(', ')'], "");
    if serie_pattern().is_match(&stripped) {
        ContentType::Serie
    } else {
        ContentType::Movie
    }
}

/// Whether the play got far enough to count as watched for its type.
pub fn is_genuine_watch(event: &ViewingEvent) -> bool {
    event.percent_watched > completion_threshold(event.content_type)
}

/// Attach `show_title`, `percent_watched` and `content_type`.
pub fn classify(record: NormalizedRecord) -> ViewingEvent {
    let show_title = show_title(&record.title).to_string();
    let percent_watched = percent_watched(record.total_watched_seconds, record.duration_minutes);
    let content_type = classify_title(&record.title);

    ViewingEvent {
        profile_name: record.profile_name,
        title: record.title,
        start_time: record.start_time,
        device_type: record.device_type,
        country: record.country,
        supplemental_video_type: record.supplemental_video_type,
        total_watched_seconds: record.total_watched_seconds,
        duration_minutes: record.duration_minutes,
        total_watched_hours: record.total_watched_hours,
        watched_weekday: record.watched_weekday,
        watched_month: record.watched_month,
        watched_hour: record.watched_hour,
        show_title,
        percent_watched,
        content_type,
    }
}

pub fn classify_all(records: Vec<NormalizedRecord>) -> Vec<ViewingEvent> {
    records.into_iter().map(classify).collect()
}

//! Fixed filtering and classification thresholds.
//!
//! These values are part of the dashboard's definition of a "real" viewing
//! and are intentionally not exposed as settings.

use crate::models::{ContentType, DeviceCategory};

/// Rows with `total_watched_seconds` at or below this are dropped.
pub const MIN_WATCHED_SECONDS: u32 = 30;

/// A movie play counts as watched when `percent_watched` exceeds this.
pub const MOVIE_COMPLETION_THRESHOLD: f64 = 90.0;

/// A series episode play counts as watched when `percent_watched` exceeds this.
pub const SERIE_COMPLETION_THRESHOLD: f64 = 85.0;

/// Number of rows kept in the top-titles chart.
pub const TOP_TITLES_LIMIT: usize = 10;

/// Case-insensitive pattern marking a title as a series episode.
pub const SERIE_TITLE_PATTERN: &str = "(?i)Saison|Season|Épisode";

/// Billing status a row must carry to count toward the amount paid.
pub const PAYMENT_APPROVED: &str = "APPROVED";

/// Invoice result a row must carry to count toward the amount paid.
pub const INVOICE_SETTLED: &str = "SETTLED";

/// Lowercase device tokens recognised in the free-text device column.
pub const DEVICE_VOCABULARY: &[&str] = &[
    "tv",
    "phone",
    "ipad",
    "tablet",
    "pc",
    "mac",
    "iphone",
    "chromecast",
];

/// Exact-case token → category table applied after the vocabulary filter.
///
/// Tokens that pass the vocabulary but are missing here (e.g. `"tv"`,
/// `"Mac"`) are dropped from the device chart.
pub const DEVICE_CATEGORIES: &[(&str, DeviceCategory)] = &[
    ("TV", DeviceCategory::Tv),
    ("iPad", DeviceCategory::Tablet),
    ("PC", DeviceCategory::Pc),
    ("Chromecast", DeviceCategory::Tv),
    ("MAC", DeviceCategory::Pc),
    ("iPhone", DeviceCategory::Phone),
    ("Tablet", DeviceCategory::Tablet),
    ("Phone", DeviceCategory::Phone),
];

/// Completion threshold for the given content type.
pub fn completion_threshold(content_type: ContentType) -> f64 {
    match content_type {
        ContentType::Movie => MOVIE_COMPLETION_THRESHOLD,
        ContentType::Serie => SERIE_COMPLETION_THRESHOLD,
    }
}

/// Whether `token` (any case) belongs to [`DEVICE_VOCABULARY`].
pub fn is_known_device_token(token: &str) -> bool {
    let lower = token.to_lowercase();
    DEVICE_VOCABULARY.contains(&lower.as_str())
}

/// Look up the category for an exact-case device token.
pub fn device_category(token: &str) -> Option<DeviceCategory> {
    DEVICE_CATEGORIES
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_threshold_per_type() {
        assert_eq!(completion_threshold(ContentType::Movie), 90.0);
        assert_eq!(completion_threshold(ContentType::Serie), 85.0);
    }

    #[test]
    fn test_known_device_token_is_case_insensitive() {
        assert!(is_known_device_token("TV"));
        assert!(is_known_device_token("iphone"));
        assert!(is_known_device_token("Chromecast"));
        assert!(!is_known_device_token("Samsung"));
        assert!(!is_known_device_token("2020"));
    }

    #[test]
    fn test_device_category_is_case_sensitive() {
        assert_eq!(device_category("TV"), Some(DeviceCategory::Tv));
        assert_eq!(device_category("MAC"), Some(DeviceCategory::Pc));
        assert_eq!(device_category("iPhone"), Some(DeviceCategory::Phone));
        assert_eq!(device_category("tv"), None);
        assert_eq!(device_category("Mac"), None);
    }
}

//! Chart aggregates over classified viewing events.
//!
//! Every function is a pure function of its inputs. Groups are accumulated
//! in `BTreeMap`s and re-sorted with a stable sort, so ties always come out
//! in key order.

use std::collections::{BTreeMap, BTreeSet};

use dashboard_core::countries::CountryTable;
use dashboard_core::formatting::round1;
use dashboard_core::models::{ContentType, DeviceCategory, ViewingEvent};
use dashboard_core::policy::{device_category, is_known_device_token, TOP_TITLES_LIMIT};
use dashboard_core::time_utils::weekday_name;
use serde::Serialize;
use tracing::warn;

use crate::classifier::is_genuine_watch;

// ── ProfileFilter ─────────────────────────────────────────────────────────────

/// Profile multi-select applied to top titles, devices and countries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProfileFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl ProfileFilter {
    pub fn includes(&self, profile: &str) -> bool {
        match self {
            ProfileFilter::All => true,
            ProfileFilter::Only(set) => set.contains(profile),
        }
    }
}

// ── Result types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileHours {
    pub profile: String,
    /// Rounded to one decimal.
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleCount {
    pub profile: String,
    /// Movie title, or show title for series.
    pub title: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayHours {
    /// Monday = 0.
    pub weekday: u8,
    pub name: &'static str,
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceCount {
    pub category: DeviceCategory,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceUsage {
    /// Ascending by count.
    pub counts: Vec<DeviceCount>,
    /// Known device tokens that have no category mapping.
    pub unmapped_tokens: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySessions {
    pub iso_2: String,
    pub iso_3: String,
    pub country_name: String,
    /// Distinct start times.
    pub sessions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountryUsage {
    /// Descending by sessions.
    pub rows: Vec<CountrySessions>,
    /// Country prefixes with no entry in the lookup table.
    pub unmatched_prefixes: usize,
    /// Sessions behind those prefixes.
    pub unmatched_sessions: usize,
}

impl CountryUsage {
    pub fn max_sessions(&self) -> usize {
        self.rows.iter().map(|r| r.sessions).max().unwrap_or(0)
    }
}

/// Play counts for one profile, indexed `[hour][weekday]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub profile: String,
    pub counts: [[u32; 7]; 24],
}

impl Heatmap {
    pub fn max(&self) -> u32 {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().flat_map(|row| row.iter()).sum()
    }
}

// ── ViewingAggregator ─────────────────────────────────────────────────────────

/// Stateless helper computing each chart's data.
pub struct ViewingAggregator;

impl ViewingAggregator {
    /// Total hours per profile, ascending by the exact sum and then rounded.
    /// Ignores the profile filter.
    pub fn hours_by_profile(events: &[ViewingEvent]) -> Vec<ProfileHours> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for e in events {
            *totals.entry(e.profile_name.as_str()).or_default() += e.total_watched_hours;
        }

        let mut totals: Vec<(&str, f64)> = totals.into_iter().collect();
        totals.sort_by(|a, b| a.1.total_cmp(&b.1));
        totals
            .into_iter()
            .map(|(profile, hours)| ProfileHours {
                profile: profile.to_string(),
                hours: round1(hours),
            })
            .collect()
    }

    /// The most-watched titles of `kind` among genuine watches.
    ///
    /// Series are grouped by show title. Rows are `(profile, title)` pairs,
    /// descending by count, at most [`TOP_TITLES_LIMIT`].
    pub fn top_titles(
        events: &[ViewingEvent],
        kind: ContentType,
        filter: &ProfileFilter,
    ) -> Vec<TitleCount> {
        let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for e in events
            .iter()
            .filter(|e| e.content_type == kind && is_genuine_watch(e))
            .filter(|e| filter.includes(&e.profile_name))
        {
            let title = match kind {
                ContentType::Movie => e.title.as_str(),
                ContentType::Serie => e.show_title.as_str(),
            };
            *counts.entry((e.profile_name.as_str(), title)).or_default() += 1;
        }

        let mut rows: Vec<TitleCount> = counts
            .into_iter()
            .map(|((profile, title), count)| TitleCount {
                profile: profile.to_string(),
                title: title.to_string(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows.truncate(TOP_TITLES_LIMIT);
        rows
    }

    /// Hours per weekday, always seven rows from Monday to Sunday.
    pub fn hours_by_weekday(events: &[ViewingEvent]) -> Vec<WeekdayHours> {
        let mut hours = [0.0_f64; 7];
        for e in events {
            if let Some(slot) = hours.get_mut(e.watched_weekday as usize) {
                *slot += e.total_watched_hours;
            }
        }

        (0u8..7)
            .map(|day| WeekdayHours {
                weekday: day,
                name: weekday_name(day),
                hours: hours[day as usize],
            })
            .collect()
    }

    /// Device category counts from the whitespace-split device column.
    pub fn device_usage(events: &[ViewingEvent], filter: &ProfileFilter) -> DeviceUsage {
        let mut tokens: BTreeMap<&str, usize> = BTreeMap::new();
        for e in events.iter().filter(|e| filter.includes(&e.profile_name)) {
            for token in e.device_type.split_whitespace() {
                *tokens.entry(token).or_default() += 1;
            }
        }

        let mut per_category: BTreeMap<DeviceCategory, usize> = BTreeMap::new();
        let mut unmapped_tokens = 0usize;
        for (token, count) in tokens {
            if !is_known_device_token(token) {
                continue;
            }
            match device_category(token) {
                Some(category) => *per_category.entry(category).or_default() += count,
                None => unmapped_tokens += count,
            }
        }

        if unmapped_tokens > 0 {
            warn!(
                "Dropped {} device tokens with no category mapping",
                unmapped_tokens
            );
        }

        let mut counts: Vec<DeviceCount> = per_category
            .into_iter()
            .map(|(category, count)| DeviceCount { category, count })
            .collect();
        counts.sort_by_key(|d| d.count);

        DeviceUsage {
            counts,
            unmapped_tokens,
        }
    }

    /// Distinct sessions per country, joined to the ISO table.
    ///
    /// The country column reads like `"FR (France)"`; its first two
    /// characters are the ISO-2 code. Prefixes missing from `table` are
    /// dropped and counted.
    pub fn country_sessions(
        events: &[ViewingEvent],
        table: &CountryTable,
        filter: &ProfileFilter,
    ) -> CountryUsage {
        let mut starts: BTreeMap<String, BTreeSet<i64>> = BTreeMap::new();
        for e in events.iter().filter(|e| filter.includes(&e.profile_name)) {
            let prefix: String = e.country.chars().take(2).collect();
            starts
                .entry(prefix)
                .or_default()
                .insert(e.start_time.timestamp_micros());
        }

        let mut usage = CountryUsage::default();
        for (prefix, sessions) in starts {
            match table.lookup_iso2(&prefix) {
                Some(code) => usage.rows.push(CountrySessions {
                    iso_2: code.iso_2.clone(),
                    iso_3: code.iso_3.clone(),
                    country_name: code.country_name.clone(),
                    sessions: sessions.len(),
                }),
                None => {
                    usage.unmatched_prefixes += 1;
                    usage.unmatched_sessions += sessions.len();
                }
            }
        }

        if usage.unmatched_prefixes > 0 {
            warn!(
                "Dropped {} country codes ({} sessions) missing from the ISO table",
                usage.unmatched_prefixes, usage.unmatched_sessions
            );
        }

        usage.rows.sort_by(|a, b| b.sessions.cmp(&a.sessions));
        usage
    }

    /// Plays per (hour, weekday) for `profile`, zero-filled.
    pub fn viewing_heatmap(events: &[ViewingEvent], profile: &str) -> Heatmap {
        let mut counts = [[0u32; 7]; 24];
        for e in events.iter().filter(|e| e.profile_name == profile) {
            if let Some(cell) = counts
                .get_mut(e.watched_hour as usize)
                .and_then(|row| row.get_mut(e.watched_weekday as usize))
            {
                *cell += 1;
            }
        }
        Heatmap {
            profile: profile.to_string(),
            counts,
        }
    }

    /// Profiles that have at least one event, sorted.
    pub fn heatmap_profiles(events: &[ViewingEvent]) -> Vec<String> {
        events
            .iter()
            .map(|e| e.profile_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::event;
    use chrono::{Duration, TimeZone, Utc};
    use dashboard_core::models::CountryCode;

    fn with_hours(mut e: ViewingEvent, hours: f64) -> ViewingEvent {
        e.total_watched_hours = hours;
        e
    }

    fn on(mut e: ViewingEvent, weekday: u8, hour: u32) -> ViewingEvent {
        e.watched_weekday = weekday;
        e.watched_hour = hour;
        e
    }

    fn serie(profile: &str, title: &str) -> ViewingEvent {
        let mut e = event(profile, title);
        e.content_type = ContentType::Serie;
        e
    }

    fn only(profiles: &[&str]) -> ProfileFilter {
        ProfileFilter::Only(profiles.iter().map(|p| p.to_string()).collect())
    }

    fn table() -> CountryTable {
        CountryTable::from_entries(vec![
            CountryCode {
                country_name: "France".to_string(),
                iso_2: "FR".to_string(),
                iso_3: "FRA".to_string(),
                un_code: "250".to_string(),
            },
            CountryCode {
                country_name: "Belgium".to_string(),
                iso_2: "BE".to_string(),
                iso_3: "BEL".to_string(),
                un_code: "056".to_string(),
            },
        ])
    }

    // ── hours_by_profile ──────────────────────────────────────────────────────

    #[test]
    fn test_hours_by_profile_ascending_and_rounded() {
        let events = vec![
            with_hours(event("Alice", "A"), 2.26),
            with_hours(event("Bob", "B"), 0.5),
            with_hours(event("Alice", "C"), 1.0),
            with_hours(event("Kids", "D"), 10.04),
        ];
        let rows = ViewingAggregator::hours_by_profile(&events);
        let got: Vec<(&str, f64)> = rows.iter().map(|r| (r.profile.as_str(), r.hours)).collect();
        assert_eq!(got, vec![("Bob", 0.5), ("Alice", 3.3), ("Kids", 10.0)]);
    }

    #[test]
    fn test_hours_by_profile_orders_by_exact_total() {
        // Both round to 1.0h; Bob's exact total is smaller.
        let events = vec![
            with_hours(event("Alice", "A"), 1.04),
            with_hours(event("Bob", "B"), 1.01),
        ];
        let rows = ViewingAggregator::hours_by_profile(&events);
        let got: Vec<(&str, f64)> = rows.iter().map(|r| (r.profile.as_str(), r.hours)).collect();
        assert_eq!(got, vec![("Bob", 1.0), ("Alice", 1.0)]);
    }

    #[test]
    fn test_hours_by_profile_empty() {
        assert!(ViewingAggregator::hours_by_profile(&[]).is_empty());
    }

    // ── top_titles ────────────────────────────────────────────────────────────

    #[test]
    fn test_top_titles_counts_only_genuine_watches() {
        let mut partial = event("Alice", "Inception");
        partial.percent_watched = 60.0;
        let events = vec![
            event("Alice", "Inception"),
            event("Alice", "Inception"),
            partial,
            event("Bob", "Roma"),
        ];

        let rows = ViewingAggregator::top_titles(&events, ContentType::Movie, &ProfileFilter::All);
        assert_eq!(
            rows,
            vec![
                TitleCount {
                    profile: "Alice".to_string(),
                    title: "Inception".to_string(),
                    count: 2
                },
                TitleCount {
                    profile: "Bob".to_string(),
                    title: "Roma".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_titles_series_grouped_by_show() {
        let events = vec![
            serie("Alice", "Dark: Season 1: Secrets (Episode 1)"),
            serie("Alice", "Dark: Season 1: Lies (Episode 2)"),
            serie("Alice", "Dark: Season 2: Beginnings (Episode 1)"),
            event("Alice", "Inception"),
        ];
        let rows = ViewingAggregator::top_titles(&events, ContentType::Serie, &ProfileFilter::All);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Dark");
        assert_eq!(rows[0].count, 3);
    }

    #[test]
    fn test_top_titles_series_threshold_is_85() {
        let mut e = serie("Alice", "Dark: Season 1");
        e.percent_watched = 86.0;
        let mut m = event("Alice", "Roma");
        m.percent_watched = 86.0;
        let events = vec![e, m];

        assert_eq!(
            ViewingAggregator::top_titles(&events, ContentType::Serie, &ProfileFilter::All).len(),
            1
        );
        assert!(
            ViewingAggregator::top_titles(&events, ContentType::Movie, &ProfileFilter::All)
                .is_empty()
        );
    }

    #[test]
    fn test_top_titles_respects_filter_and_limit() {
        let mut events = Vec::new();
        for i in 0..15 {
            events.push(event("Alice", &format!("Movie {i:02}")));
        }
        events.push(event("Bob", "Roma"));

        let rows = ViewingAggregator::top_titles(&events, ContentType::Movie, &only(&["Alice"]));
        assert_eq!(rows.len(), TOP_TITLES_LIMIT);
        assert!(rows.iter().all(|r| r.profile == "Alice"));
        // Ties keep title order.
        assert_eq!(rows[0].title, "Movie 00");
        assert_eq!(rows[9].title, "Movie 09");
    }

    #[test]
    fn test_top_titles_ties_broken_by_profile_then_title() {
        let events = vec![
            event("Bob", "Alpha"),
            event("Alice", "Zulu"),
            event("Alice", "Alpha"),
        ];
        let rows = ViewingAggregator::top_titles(&events, ContentType::Movie, &ProfileFilter::All);
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.profile.as_str(), r.title.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("Alice", "Alpha"), ("Alice", "Zulu"), ("Bob", "Alpha")]
        );
    }

    // ── hours_by_weekday ──────────────────────────────────────────────────────

    #[test]
    fn test_hours_by_weekday_always_monday_to_sunday() {
        let events = vec![
            on(with_hours(event("Alice", "A"), 2.0), 6, 20),
            on(with_hours(event("Alice", "B"), 1.5), 2, 20),
            on(with_hours(event("Bob", "C"), 0.5), 6, 9),
        ];
        let rows = ViewingAggregator::hours_by_weekday(&events);
        let names: Vec<&str> = rows.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday"
            ]
        );
        assert_eq!(rows[0].hours, 0.0);
        assert_eq!(rows[2].hours, 1.5);
        assert_eq!(rows[6].hours, 2.5);
    }

    #[test]
    fn test_hours_by_weekday_independent_of_input_order() {
        let mut events = vec![
            on(with_hours(event("Alice", "A"), 2.0), 4, 20),
            on(with_hours(event("Alice", "B"), 1.0), 0, 20),
            on(with_hours(event("Bob", "C"), 3.0), 5, 9),
        ];
        let forward = ViewingAggregator::hours_by_weekday(&events);
        events.reverse();
        assert_eq!(ViewingAggregator::hours_by_weekday(&events), forward);
    }

    // ── device_usage ──────────────────────────────────────────────────────────

    #[test]
    fn test_device_usage_maps_known_tokens() {
        let mut tv = event("Alice", "A");
        tv.device_type = "Samsung 2017 Tizen TV UHD Smart TV".to_string();
        let mut phone = event("Alice", "B");
        phone.device_type = "Apple iPhone 12 (CDM)".to_string();
        let mut cast = event("Alice", "C");
        cast.device_type = "Google Chromecast Ultra Streaming Stick".to_string();
        let mut ps4 = event("Alice", "D");
        ps4.device_type = "Sony PS4".to_string();

        let usage = ViewingAggregator::device_usage(&[tv, phone, cast, ps4], &ProfileFilter::All);
        let got: Vec<(DeviceCategory, usize)> =
            usage.counts.iter().map(|d| (d.category, d.count)).collect();
        assert_eq!(
            got,
            vec![(DeviceCategory::Phone, 1), (DeviceCategory::Tv, 3)]
        );
        assert_eq!(usage.unmapped_tokens, 0);
    }

    #[test]
    fn test_device_usage_excludes_unknown_vocabulary() {
        let mut e = event("Alice", "A");
        e.device_type = "Sony PlayStation 5 Xbox Roku".to_string();
        let usage = ViewingAggregator::device_usage(&[e], &ProfileFilter::All);
        assert!(usage.counts.is_empty());
        assert_eq!(usage.unmapped_tokens, 0);
    }

    #[test]
    fn test_device_usage_counts_unmapped_known_tokens() {
        let mut e = event("Alice", "A");
        e.device_type = "Mac Safari tv PC".to_string();
        let usage = ViewingAggregator::device_usage(&[e], &ProfileFilter::All);
        assert_eq!(
            usage.counts,
            vec![DeviceCount {
                category: DeviceCategory::Pc,
                count: 1
            }]
        );
        assert_eq!(usage.unmapped_tokens, 2);
    }

    #[test]
    fn test_device_usage_respects_filter() {
        let mut e = event("Bob", "A");
        e.device_type = "Chrome PC (Cadmium)".to_string();
        let usage = ViewingAggregator::device_usage(&[e], &only(&["Alice"]));
        assert!(usage.counts.is_empty());
    }

    // ── country_sessions ──────────────────────────────────────────────────────

    #[test]
    fn test_country_sessions_distinct_start_times() {
        let base = Utc.with_ymd_and_hms(2023, 1, 16, 20, 0, 0).unwrap();
        let mut a = event("Alice", "A");
        a.start_time = base;
        let mut b = event("Bob", "B");
        b.start_time = base;
        let mut c = event("Alice", "C");
        c.start_time = base + Duration::hours(1);
        let mut d = event("Alice", "D");
        d.country = "BE (Belgium)".to_string();

        let usage = ViewingAggregator::country_sessions(&[a, b, c, d], &table(), &ProfileFilter::All);
        assert_eq!(usage.rows.len(), 2);
        assert_eq!(usage.rows[0].iso_3, "FRA");
        assert_eq!(usage.rows[0].sessions, 2);
        assert_eq!(usage.rows[1].iso_3, "BEL");
        assert_eq!(usage.rows[1].sessions, 1);
        assert_eq!(usage.max_sessions(), 2);
    }

    #[test]
    fn test_country_sessions_counts_unmatched_prefixes() {
        let mut kosovo = event("Alice", "A");
        kosovo.country = "XK (Kosovo)".to_string();
        let mut blank = event("Alice", "B");
        blank.country = String::new();
        let fr = event("Alice", "C");

        let usage =
            ViewingAggregator::country_sessions(&[kosovo, blank, fr], &table(), &ProfileFilter::All);
        assert_eq!(usage.rows.len(), 1);
        assert_eq!(usage.unmatched_prefixes, 2);
        assert_eq!(usage.unmatched_sessions, 2);
    }

    // ── heatmap ───────────────────────────────────────────────────────────────

    #[test]
    fn test_heatmap_counts_per_cell() {
        let events = vec![
            on(event("Alice", "A"), 6, 20),
            on(event("Alice", "B"), 6, 20),
            on(event("Alice", "C"), 0, 9),
            on(event("Bob", "D"), 6, 20),
        ];
        let map = ViewingAggregator::viewing_heatmap(&events, "Alice");
        assert_eq!(map.counts[20][6], 2);
        assert_eq!(map.counts[9][0], 1);
        assert_eq!(map.counts[0][0], 0);
        assert_eq!(map.max(), 2);
        assert_eq!(map.total(), 3);
    }

    #[test]
    fn test_heatmap_unknown_profile_is_all_zero() {
        let events = vec![event("Alice", "A")];
        let map = ViewingAggregator::viewing_heatmap(&events, "Nobody");
        assert_eq!(map.max(), 0);
        assert_eq!(map.total(), 0);
    }

    #[test]
    fn test_heatmap_profiles_sorted_unique() {
        let events = vec![event("Kids", "A"), event("Alice", "B"), event("Kids", "C")];
        assert_eq!(
            ViewingAggregator::heatmap_profiles(&events),
            vec!["Alice".to_string(), "Kids".to_string()]
        );
    }
}

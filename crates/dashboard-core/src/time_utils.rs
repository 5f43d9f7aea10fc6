use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── Weekdays ─────────────────────────────────────────────────────────────────

/// Full weekday names indexed by `watched_weekday` (Monday = 0).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Name for a Monday-based weekday index, `"?"` when out of range.
pub fn weekday_name(index: u8) -> &'static str {
    WEEKDAY_NAMES.get(index as usize).copied().unwrap_or("?")
}

/// Three-letter abbreviation for a Monday-based weekday index.
pub fn weekday_short(index: u8) -> &'static str {
    let name = weekday_name(index);
    name.get(..3).unwrap_or(name)
}

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── Clock values ──────────────────────────────────────────────────────────────

/// Parse an `HH:MM:SS` clock value into seconds since midnight.
///
/// The export stores durations and bookmark positions this way, so
/// `"01:02:03"` means 3723 seconds.
pub fn parse_clock_seconds(s: &str) -> Option<u32> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M:%S")
        .ok()
        .map(|t| t.num_seconds_from_midnight())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Calendar fields of a start time as seen in the display timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalParts {
    /// Monday = 0 … Sunday = 6.
    pub weekday: u8,
    pub month: u32,
    pub hour: u32,
}

/// Parses export timestamps and projects them into a display timezone.
#[derive(Debug, Clone)]
pub struct TimezoneHandler {
    display_tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler for the given IANA timezone name.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { display_tz: tz }
    }

    /// Parse a `Start Time` cell into a UTC [`DateTime`].
    ///
    /// Exports write naive UTC timestamps (`2023-01-15 20:31:12`); RFC 3339
    /// strings with an explicit offset are accepted too. Returns `None` for
    /// empty or unrecognised input.
    pub fn parse_start_time(&self, s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        const FMTS: &[&str] = &[
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
        ];
        FMTS.iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    /// Weekday, month and hour of `dt` in the display timezone.
    pub fn local_parts(&self, dt: DateTime<Utc>) -> LocalParts {
        let local = dt.with_timezone(&self.display_tz);
        LocalParts {
            weekday: local.weekday().num_days_from_monday() as u8,
            month: local.month(),
            hour: local.hour(),
        }
    }

    /// Expose the configured display timezone.
    pub fn display_tz(&self) -> Tz {
        self.display_tz
    }
}

impl Default for TimezoneHandler {
    fn default() -> Self {
        Self { display_tz: Tz::UTC }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

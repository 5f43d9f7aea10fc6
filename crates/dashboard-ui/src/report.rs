//! Plain-text rendition of a [`DashboardSnapshot`] for `--view report`.

use dashboard_core::formatting::format_count;
use dashboard_runtime::DashboardSnapshot;

use crate::charts::{self, BarDatum};
use crate::components::header::SEPARATOR_WIDTH;
use crate::components::metrics::MetricsRow;
use crate::dashboard_view::loaded_at_label;
use crate::heatmap::heatmap_plain;
use crate::themes::Theme;

/// Width the report's bar charts are laid out for.
pub const REPORT_WIDTH: u16 = 80;

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(format!("── {title} ──"));
}

fn bars(lines: &mut Vec<String>, data: &[BarDatum], theme: &Theme) {
    if data.is_empty() {
        lines.push("(no data for this selection)".to_string());
        return;
    }
    let config = charts::bar_config(data, REPORT_WIDTH);
    lines.extend(charts::bar_plain(data, config, theme));
}

/// Every panel of the dashboard as plain text, newline-terminated.
pub fn render_report(snapshot: &DashboardSnapshot) -> String {
    // Styles are discarded; the theme only feeds the bar geometry.
    let theme = Theme::classic();
    let mut lines = vec![
        "STREAMING VIEWING REPORT".to_string(),
        "=".repeat(SEPARATOR_WIDTH),
        format!(
            "Source: {} | Timezone: {} | Loaded: {}",
            snapshot.source,
            snapshot.timezone,
            loaded_at_label(snapshot)
        ),
        format!(
            "Rows: {} read, {} kept, {} short, {} supplemental; {} billing rows",
            format_count(snapshot.stats.viewing_rows),
            format_count(snapshot.stats.retained),
            format_count(snapshot.stats.dropped_short),
            format_count(snapshot.stats.dropped_supplemental),
            format_count(snapshot.stats.billing_rows),
        ),
    ];
    if let Some(err) = &snapshot.last_error {
        lines.push(format!("Last load failed: {err}"));
    }

    section(&mut lines, "Summary");
    for (label, value) in MetricsRow::new(&snapshot.headline, &theme).items() {
        lines.push(format!("{label:<16}{value}"));
    }

    let selected: Vec<&str> = snapshot
        .profiles
        .iter()
        .filter(|p| snapshot.selected_profiles.contains(*p))
        .map(String::as_str)
        .collect();
    lines.push(format!("{:<16}{}", "Profiles", selected.join(", ")));

    section(&mut lines, "Hours by Profile");
    bars(&mut lines, &charts::profile_hours_data(&snapshot.hours_by_profile), &theme);

    section(&mut lines, charts::top_titles_title(snapshot.content_type).trim());
    bars(&mut lines, &charts::top_titles_data(&snapshot.top_titles), &theme);

    section(&mut lines, "Hours by Weekday");
    bars(&mut lines, &charts::weekday_data(&snapshot.hours_by_weekday), &theme);

    section(&mut lines, "Devices");
    bars(&mut lines, &charts::device_data(&snapshot.devices), &theme);
    if snapshot.devices.unmapped_tokens > 0 {
        lines.push(format!(
            "{} device tokens without a category",
            snapshot.devices.unmapped_tokens
        ));
    }

    section(&mut lines, "Sessions by Country");
    if snapshot.countries.rows.is_empty() {
        lines.push("(no country data for this selection)".to_string());
    } else {
        lines.push(format!("{:<6}{:<32}{:>8}", "ISO-3", "Country", "Sessions"));
        for row in &snapshot.countries.rows {
            lines.push(format!(
                "{:<6}{:<32}{:>8}",
                row.iso_3,
                row.country_name,
                format_count(row.sessions)
            ));
        }
    }
    if snapshot.countries.unmatched_prefixes > 0 {
        lines.push(format!(
            "{} country code(s) without an ISO entry ({} sessions dropped)",
            snapshot.countries.unmatched_prefixes, snapshot.countries.unmatched_sessions
        ));
    }

    match &snapshot.heatmap {
        Some(h) => {
            section(&mut lines, &format!("Viewing Heatmap: {}", h.profile));
            lines.extend(heatmap_plain(h));
        }
        None => {
            section(&mut lines, "Viewing Heatmap");
            lines.push("(no profile)".to_string());
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

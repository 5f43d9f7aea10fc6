//! The full-screen dashboard: header, headline metrics, profile selector,
//! chart panels and the status line.

use chrono_tz::Tz;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};

use dashboard_core::formatting::format_count;
use dashboard_core::policy::MIN_WATCHED_SECONDS;
use dashboard_runtime::DashboardSnapshot;

use crate::charts;
use crate::components::header::Header;
use crate::components::metrics::MetricsRow;
use crate::heatmap;
use crate::themes::Theme;

/// Key help shown when there is nothing else to report.
pub const KEY_HELP: &str =
    "q quit · m movies/series · 1-9 toggle profile · a all profiles · p/Tab heatmap profile · r reload";

/// Width of the heatmap column: hour column, seven day columns, spacing and
/// borders.
const HEATMAP_WIDTH: u16 = 5 + 7 * 5 + 7 + 2;

/// Format the load time in the display timezone when it parses, UTC otherwise.
pub fn loaded_at_label(snapshot: &DashboardSnapshot) -> String {
    match snapshot.timezone.parse::<Tz>() {
        Ok(tz) => snapshot
            .loaded_at
            .with_timezone(&tz)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => snapshot.loaded_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

/// `Profiles: [1] ■ Alice  [2] □ Bob` with selected profiles highlighted.
pub fn profile_selector_line<'a>(snapshot: &'a DashboardSnapshot, theme: &'a Theme) -> Line<'a> {
    let mut spans = vec![Span::styled("Profiles: ", theme.label)];
    for (i, profile) in snapshot.profiles.iter().enumerate() {
        let selected = snapshot.selected_profiles.contains(profile);
        let marker = if selected { "■" } else { "□" };
        let key = if i < 9 {
            format!("[{}] ", i + 1)
        } else {
            "[-] ".to_string()
        };
        spans.push(Span::styled(key, theme.dim));
        spans.push(Span::styled(
            format!("{marker} {profile}  "),
            theme.selection_style(selected),
        ));
    }
    if snapshot.profiles.is_empty() {
        spans.push(Span::styled("none", theme.dim));
    }
    Line::from(spans)
}

/// Last load error if any, otherwise row counts and key help.
pub fn status_line<'a>(snapshot: &'a DashboardSnapshot, theme: &'a Theme) -> Line<'a> {
    if let Some(err) = &snapshot.last_error {
        return Line::from(vec![
            Span::styled("Load failed, showing previous data: ", theme.error),
            Span::styled(err.as_str(), theme.error),
        ]);
    }
    let stats = &snapshot.stats;
    Line::from(vec![
        Span::styled(
            format!(
                "{} of {} viewing rows kept ({} short, {} supplemental)",
                format_count(stats.retained),
                format_count(stats.viewing_rows),
                format_count(stats.dropped_short),
                format_count(stats.dropped_supplemental),
            ),
            theme.info,
        ),
        Span::styled("  │  ", theme.separator),
        Span::styled(KEY_HELP, theme.dim),
    ])
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render the whole dashboard for `snapshot` into `area`.
pub fn render_dashboard(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let loaded_at = loaded_at_label(snapshot);
    if snapshot.stats.retained == 0 {
        render_no_data(frame, area, snapshot, &loaded_at, theme);
        return;
    }

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Header::new(&snapshot.source, &snapshot.timezone, &loaded_at, theme);
    frame.render_widget(Paragraph::new(header.to_lines()), outer[0]);
    frame.render_widget(
        Paragraph::new(MetricsRow::new(&snapshot.headline, theme).to_line()),
        outer[1],
    );
    frame.render_widget(Paragraph::new(profile_selector_line(snapshot, theme)), outer[2]);
    frame.render_widget(Paragraph::new(status_line(snapshot, theme)), outer[4]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(HEATMAP_WIDTH)])
        .split(outer[3]);

    render_charts(frame, body[0], snapshot, theme);
    heatmap::render_heatmap(frame, body[1], snapshot.heatmap.as_ref(), theme);
}

fn render_charts(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let first_row = snapshot.profiles.len().max(7) as u16 + 2;
    let second_row = (snapshot.top_titles.len().max(snapshot.devices.counts.len() + 1)).max(4) as u16 + 2;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(first_row),
            Constraint::Length(second_row),
            Constraint::Min(4),
        ])
        .split(area);

    let halves = |r: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(r)
    };

    let top = halves(rows[0]);
    charts::render_bar_panel(
        frame,
        top[0],
        "Hours by Profile",
        &charts::profile_hours_data(&snapshot.hours_by_profile),
        Vec::new(),
        theme,
    );
    charts::render_bar_panel(
        frame,
        top[1],
        "Hours by Weekday",
        &charts::weekday_data(&snapshot.hours_by_weekday),
        Vec::new(),
        theme,
    );

    let middle = halves(rows[1]);
    charts::render_bar_panel(
        frame,
        middle[0],
        charts::top_titles_title(snapshot.content_type).trim(),
        &charts::top_titles_data(&snapshot.top_titles),
        Vec::new(),
        theme,
    );
    charts::render_bar_panel(
        frame,
        middle[1],
        "Devices",
        &charts::device_data(&snapshot.devices),
        charts::device_footer(&snapshot.devices, theme),
        theme,
    );

    charts::render_country_table(frame, rows[2], &snapshot.countries, theme);
}

/// Shown when no viewing rows survived normalization.
pub fn render_no_data(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    loaded_at: &str,
    theme: &Theme,
) {
    let header = Header::new(&snapshot.source, &snapshot.timezone, loaded_at, theme);
    let mut lines = header.to_lines();
    lines.push(Line::from(Span::styled(
        "No viewing activity to display.",
        theme.warning,
    )));
    lines.push(Line::from(Span::styled(
        format!(
            "{} rows read; every row was {} seconds or shorter, or supplemental.",
            format_count(snapshot.stats.viewing_rows),
            MIN_WATCHED_SECONDS
        ),
        theme.dim,
    )));
    lines.push(Line::from(""));
    lines.push(status_line(snapshot, theme));

    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

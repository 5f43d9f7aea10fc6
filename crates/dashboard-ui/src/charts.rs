//! Chart panels: hours by profile, top titles, weekday hours, devices and
//! the ranked country table.
//!
//! Each bar chart is first reduced to a list of [`BarDatum`] so the same
//! numbers feed both the TUI panels and the plain-text report.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::formatting::{format_count, format_hours};
use dashboard_core::models::ContentType;
use dashboard_data::aggregator::{
    CountryUsage, DeviceUsage, ProfileHours, TitleCount, WeekdayHours,
};

use crate::components::bar::{BarConfig, BarRow};
use crate::themes::Theme;

/// Columns kept for the value printed after each bar.
const VALUE_WIDTH: usize = 9;

/// Longest label a panel will reserve room for.
const MAX_LABEL_WIDTH: usize = 28;

/// One bar of a chart before styling.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub value_label: String,
}

// ── Chart data ────────────────────────────────────────────────────────────────

pub fn profile_hours_data(rows: &[ProfileHours]) -> Vec<BarDatum> {
    rows.iter()
        .map(|r| BarDatum {
            label: r.profile.clone(),
            value: r.hours,
            value_label: format_hours(r.hours),
        })
        .collect()
}

/// Labels read `Title · Profile`; counts are genuine watches.
pub fn top_titles_data(rows: &[TitleCount]) -> Vec<BarDatum> {
    rows.iter()
        .map(|r| BarDatum {
            label: format!("{} · {}", r.title, r.profile),
            value: r.count as f64,
            value_label: format_count(r.count),
        })
        .collect()
}

pub fn weekday_data(rows: &[WeekdayHours]) -> Vec<BarDatum> {
    rows.iter()
        .map(|r| BarDatum {
            label: r.name.to_string(),
            value: r.hours,
            value_label: format_hours(r.hours),
        })
        .collect()
}

pub fn device_data(usage: &DeviceUsage) -> Vec<BarDatum> {
    usage
        .counts
        .iter()
        .map(|d| BarDatum {
            label: d.category.label().to_string(),
            value: d.count as f64,
            value_label: format_count(d.count),
        })
        .collect()
}

/// Panel title for the top-titles chart, naming the active kind.
pub fn top_titles_title(kind: ContentType) -> String {
    match kind {
        ContentType::Movie => " Top 10 Movies [m: series] ".to_string(),
        ContentType::Serie => " Top 10 Series [m: movies] ".to_string(),
    }
}

fn max_value(data: &[BarDatum]) -> f64 {
    data.iter().map(|d| d.value).fold(0.0, f64::max)
}

fn widest_label(data: &[BarDatum]) -> usize {
    use unicode_width::UnicodeWidthStr;
    data.iter()
        .map(|d| d.label.width())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH)
}

/// Bar geometry for `data` drawn into `width` columns.
pub fn bar_config(data: &[BarDatum], width: u16) -> BarConfig {
    BarConfig::fit(width, widest_label(data), VALUE_WIDTH)
}

// ── Line builders ─────────────────────────────────────────────────────────────

/// Styled bar lines, one per datum, scaled to the chart's largest value.
pub fn bar_lines<'a>(data: &'a [BarDatum], config: BarConfig, theme: &'a Theme) -> Vec<Line<'a>> {
    let max = max_value(data);
    data.iter()
        .map(|d| {
            BarRow::new(&d.label, d.value, max, d.value_label.clone(), theme)
                .with_config(config)
                .to_line()
        })
        .collect()
}

/// Unstyled bar rows for the report.
pub fn bar_plain(data: &[BarDatum], config: BarConfig, theme: &Theme) -> Vec<String> {
    let max = max_value(data);
    data.iter()
        .map(|d| {
            BarRow::new(&d.label, d.value, max, d.value_label.clone(), theme)
                .with_config(config)
                .to_plain()
        })
        .collect()
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn panel<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border)
        .title(Span::styled(title, theme.panel_title))
}

/// Draw a bordered bar chart. `footer` lines are appended below the bars.
pub fn render_bar_panel(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    data: &[BarDatum],
    footer: Vec<Line>,
    theme: &Theme,
) {
    let inner_width = area.width.saturating_sub(2);
    let mut lines = if data.is_empty() {
        vec![Line::from(Span::styled("No data for this selection", theme.dim))]
    } else {
        bar_lines(data, bar_config(data, inner_width), theme)
    };
    lines.extend(footer);

    let paragraph = Paragraph::new(lines).block(panel(format!(" {title} "), theme));
    frame.render_widget(paragraph, area);
}

/// Note shown under the device chart when tokens were dropped.
pub fn device_footer<'a>(usage: &DeviceUsage, theme: &Theme) -> Vec<Line<'a>> {
    if usage.unmapped_tokens == 0 {
        return Vec::new();
    }
    vec![Line::from(Span::styled(
        format!("{} device tokens without a category", usage.unmapped_tokens),
        theme.warning,
    ))]
}

/// Ranked country table keyed by ISO-3, each row with an intensity bar.
pub fn render_country_table(frame: &mut Frame, area: Rect, usage: &CountryUsage, theme: &Theme) {
    let mut title = " Sessions by Country ".to_string();
    if usage.unmatched_prefixes > 0 {
        title = format!(
            " Sessions by Country ({} unmatched code(s), {} sessions) ",
            usage.unmatched_prefixes, usage.unmatched_sessions
        );
    }

    if usage.rows.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No country data for this selection",
            theme.dim,
        )))
        .block(panel(title, theme));
        frame.render_widget(paragraph, area);
        return;
    }

    let bar_width = area.width.saturating_sub(2 + 5 + 22 + 10 + 3).max(1) as usize;
    let config = BarConfig {
        label_width: 0,
        bar_width,
        ..BarConfig::default()
    };
    let max = usage.max_sessions() as f64;

    let header = Row::new(
        ["ISO-3", "Country", "Sessions", "Intensity"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = usage
        .rows
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let bar = BarRow::new("", c.sessions as f64, max, String::new(), theme)
                .with_config(config);
            let filled: String = std::iter::repeat(config.filled_char).take(bar.filled_cells()).collect();
            Row::new(vec![
                Cell::from(c.iso_3.clone()),
                Cell::from(c.country_name.clone()),
                Cell::from(format_count(c.sessions)),
                Cell::from(Line::from(Span::styled(
                    filled,
                    theme.bar_style(c.sessions as f64, max),
                ))),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(22),
        Constraint::Length(10),
        Constraint::Min(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(title, theme));
    frame.render_widget(table, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

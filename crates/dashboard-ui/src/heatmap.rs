//! Hour × weekday viewing heatmap for one profile.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::time_utils::weekday_short;
use dashboard_data::aggregator::Heatmap;

use crate::themes::Theme;

const HOUR_COLUMN: u16 = 5;
const DAY_COLUMN: u16 = 5;

fn hour_label(hour: usize) -> String {
    format!("{hour:02}h")
}

/// Blank for zero so that busy cells stand out.
fn cell_text(count: u32) -> String {
    if count == 0 {
        String::new()
    } else {
        count.to_string()
    }
}

/// Draw `heatmap` as a 24 × 7 grid whose cell backgrounds follow the theme's
/// intensity scale. `None` means no profile is available.
pub fn render_heatmap(frame: &mut Frame, area: Rect, heatmap: Option<&Heatmap>, theme: &Theme) {
    let title = match heatmap {
        Some(h) => format!(" Viewing Heatmap: {} [p: next] ", h.profile),
        None => " Viewing Heatmap ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border)
        .title(Span::styled(title, theme.panel_title));

    let Some(heatmap) = heatmap else {
        let paragraph = Paragraph::new(Line::from(Span::styled("No profile selected", theme.dim)))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let max = f64::from(heatmap.max());

    let mut header_cells = vec![Cell::from("Hour").style(theme.table_header)];
    header_cells.extend((0..7u8).map(|d| Cell::from(weekday_short(d)).style(theme.table_header)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = heatmap
        .counts
        .iter()
        .enumerate()
        .map(|(hour, days)| {
            let mut cells = vec![Cell::from(hour_label(hour)).style(theme.label)];
            cells.extend(days.iter().map(|&count| {
                Cell::from(cell_text(count)).style(theme.cell_style(f64::from(count), max))
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(HOUR_COLUMN)];
    widths.extend(std::iter::repeat(Constraint::Length(DAY_COLUMN)).take(7));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

/// Plain-text grid for the report: one line per hour, counts right-aligned.
pub fn heatmap_plain(heatmap: &Heatmap) -> Vec<String> {
    let mut lines = Vec::with_capacity(25);
    let mut header = format!("{:<5}", "Hour");
    for d in 0..7u8 {
        header.push_str(&format!("{:>5}", weekday_short(d)));
    }
    lines.push(header);

    for (hour, days) in heatmap.counts.iter().enumerate() {
        let mut line = format!("{:<5}", hour_label(hour));
        for &count in days {
            let text = if count == 0 { ".".to_string() } else { count.to_string() };
            line.push_str(&format!("{text:>5}"));
        }
        lines.push(line);
    }
    lines
}

// ── Tests ─────────────────────────────────────────────────────────────────────

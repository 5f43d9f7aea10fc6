use crate::themes::Theme;
use dashboard_core::formatting::format_count;
use dashboard_data::metrics::HeadlineMetrics;
use ratatui::text::{Line, Span};

/// The row of headline numbers under the header.
pub struct MetricsRow<'a> {
    pub metrics: &'a HeadlineMetrics,
    pub theme: &'a Theme,
}

impl<'a> MetricsRow<'a> {
    pub fn new(metrics: &'a HeadlineMetrics, theme: &'a Theme) -> Self {
        Self { metrics, theme }
    }

    /// `(label, value)` pairs in display order.
    pub fn items(&self) -> [(&'static str, String); 5] {
        [
            ("Titles watched", format_count(self.metrics.titles_watched)),
            ("Devices", format_count(self.metrics.devices)),
            ("Countries", format_count(self.metrics.countries)),
            ("Time spent", self.metrics.time_spent()),
            ("Amount paid", self.metrics.amount_label()),
        ]
    }

    pub fn to_line(&self) -> Line<'a> {
        let mut spans = Vec::new();
        for (i, (label, value)) in self.items().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  │  ", self.theme.separator));
            }
            spans.push(Span::styled(format!("{label}: "), self.theme.label));
            spans.push(Span::styled(value, self.theme.value));
        }
        Line::from(spans)
    }
}

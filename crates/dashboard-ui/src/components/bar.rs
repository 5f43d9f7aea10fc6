use crate::themes::Theme;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Configuration controlling the visual appearance of a chart bar.
#[derive(Debug, Clone, Copy)]
pub struct BarConfig {
    /// Terminal columns reserved for the label in front of the bar.
    pub label_width: usize,
    /// Terminal columns of the bar itself.
    pub bar_width: usize,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            label_width: 18,
            bar_width: 30,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

impl BarConfig {
    /// Split `total_width` columns between label, bar and a value suffix of
    /// `value_width` columns. The label gets at most `max_label` columns.
    pub fn fit(total_width: u16, max_label: usize, value_width: usize) -> Self {
        let total = total_width as usize;
        let label_width = max_label.min(total / 3).max(4);
        let bar_width = total
            .saturating_sub(label_width + value_width + 2)
            .max(1);
        Self {
            label_width,
            bar_width,
            ..Self::default()
        }
    }
}

// ── Label fitting ─────────────────────────────────────────────────────────────

/// Fit `label` into exactly `width` terminal columns: wide characters count
/// double, overlong labels end with `…`, short ones are padded with spaces.
pub fn fit_label(label: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    if label.width() <= width {
        out.push_str(label);
        used = label.width();
    } else {
        for c in label.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width - 1 {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        used += 1;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── BarRow ────────────────────────────────────────────────────────────────────

/// One horizontal bar of a chart: `label ████░░░░ value`.
///
/// The bar length is proportional to `value / max` and its colour comes from
/// the theme's intensity scale at the same position.
pub struct BarRow<'a> {
    pub label: &'a str,
    pub value: f64,
    /// Largest value in the chart; the bar of that value is full.
    pub max: f64,
    /// Text printed after the bar.
    pub value_label: String,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> BarRow<'a> {
    pub fn new(label: &'a str, value: f64, max: f64, value_label: String, theme: &'a Theme) -> Self {
        Self {
            label,
            value,
            max,
            value_label,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BarConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of filled cells. Any positive value gets at least one cell.
    pub fn filled_cells(&self) -> usize {
        if self.config.bar_width == 0 || !(self.max > 0.0) || !(self.value > 0.0) {
            return 0;
        }
        let ratio = (self.value / self.max).clamp(0.0, 1.0);
        let cells = (ratio * self.config.bar_width as f64).round() as usize;
        cells.clamp(1, self.config.bar_width)
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_cells();
        let empty = self.config.bar_width - filled;

        let filled_str: String = std::iter::repeat(self.config.filled_char).take(filled).collect();
        let empty_str: String = std::iter::repeat(self.config.empty_char).take(empty).collect();

        Line::from(vec![
            Span::styled(fit_label(self.label, self.config.label_width), self.theme.label),
            Span::raw(" "),
            Span::styled(filled_str, self.theme.bar_style(self.value, self.max)),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(format!(" {}", self.value_label), self.theme.value),
        ])
    }

    /// Same row without styling, for the plain-text report. The empty part
    /// of the bar is left blank.
    pub fn to_plain(&self) -> String {
        let filled: String =
            std::iter::repeat(self.config.filled_char).take(self.filled_cells()).collect();
        let blank = " ".repeat(self.config.bar_width - self.filled_cells());
        format!(
            "{} {}{} {}",
            fit_label(self.label, self.config.label_width),
            filled,
            blank,
            self.value_label
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_fit_label_pads_and_truncates() {
        assert_eq!(fit_label("TV", 5), "TV   ");
        assert_eq!(fit_label("Stranger Things", 8), "Strange…");
        assert_eq!(fit_label("exact", 5), "exact");
        assert_eq!(fit_label("anything", 0), "");
    }

    #[test]
    fn test_fit_label_counts_wide_characters() {
        // Each CJK character takes two columns.
        let fitted = fit_label("進撃の巨人", 6);
        assert_eq!(fitted.width(), 6);
        assert!(fitted.starts_with("進撃…"), "got: {fitted:?}");
        assert_eq!(fit_label("日本", 6).width(), 6);
    }

    #[test]
    fn test_full_bar_at_max() {
        let theme = Theme::dark();
        let row = BarRow::new("Alice", 10.0, 10.0, "10.0h".into(), &theme);
        assert_eq!(row.filled_cells(), row.config.bar_width);
        let line = row.to_line();
        assert_eq!(line.spans[2].style.fg, Some(theme.scale[3]));
        assert!(text(&line).ends_with(" 10.0h"));
    }

    #[test]
    fn test_small_positive_value_shows_one_cell() {
        let theme = Theme::dark();
        let row = BarRow::new("Kids", 0.1, 1_000.0, "0.1h".into(), &theme);
        assert_eq!(row.filled_cells(), 1);
    }

    #[test]
    fn test_zero_value_is_empty_bar() {
        let theme = Theme::dark();
        let row = BarRow::new("Monday", 0.0, 0.0, "0.0h".into(), &theme);
        assert_eq!(row.filled_cells(), 0);
        let line = row.to_line();
        assert_eq!(
            line.spans[3].content.chars().count(),
            BarConfig::default().bar_width
        );
    }

    #[test]
    fn test_half_bar() {
        let theme = Theme::dark();
        let config = BarConfig {
            bar_width: 10,
            ..BarConfig::default()
        };
        let row = BarRow::new("PC", 5.0, 10.0, "5".into(), &theme).with_config(config);
        assert_eq!(row.filled_cells(), 5);
        let plain = row.to_plain();
        assert!(plain.ends_with("█████      5"), "got: {plain:?}");
    }

    #[test]
    fn test_bar_config_fit() {
        let config = BarConfig::fit(60, 30, 8);
        assert_eq!(config.label_width, 20);
        assert_eq!(config.bar_width, 30);

        let tiny = BarConfig::fit(5, 30, 8);
        assert_eq!(tiny.label_width, 4);
        assert_eq!(tiny.bar_width, 1);
    }
}

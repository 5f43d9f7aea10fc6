use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark, 7–15 light. Absent or unparseable values count as dark.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// The four stops every chart is shaded with: black, dark grey, dark red, red.
pub const INTENSITY_SCALE: [Color; 4] = [
    Color::Rgb(1, 1, 1),
    Color::Rgb(86, 77, 77),
    Color::Rgb(131, 16, 16),
    Color::Rgb(219, 0, 0),
];

/// The same scale in the basic ANSI palette.
pub const INTENSITY_SCALE_ANSI: [Color; 4] =
    [Color::Black, Color::DarkGray, Color::Red, Color::LightRed];

/// All styles used by the dashboard widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Panels ───────────────────────────────────────────────────────────────
    pub panel_border: Style,
    pub panel_title: Style,
    pub bar_empty: Style,
    pub selected: Style,
    pub unselected: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,

    /// Low → high intensity stops.
    pub scale: [Color; 4],
    /// Text drawn on top of a shaded heatmap cell.
    pub cell_text: Color,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::LightRed),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            panel_border: Style::default().fg(Color::DarkGray),
            panel_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            bar_empty: Style::default().fg(Color::DarkGray),
            selected: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
            unselected: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            scale: INTENSITY_SCALE,
            cell_text: Color::White,
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Black),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Magenta),
            error: Style::default().fg(Color::Red),

            panel_border: Style::default().fg(Color::Gray),
            panel_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            bar_empty: Style::default().fg(Color::Gray),
            selected: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            unselected: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),

            scale: INTENSITY_SCALE,
            cell_text: Color::White,
        }
    }

    /// Basic 8-colour ANSI palette, no bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Red),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            panel_border: Style::default().fg(Color::DarkGray),
            panel_title: Style::default().fg(Color::White),
            bar_empty: Style::default().fg(Color::DarkGray),
            selected: Style::default().fg(Color::Red),
            unselected: Style::default().fg(Color::DarkGray),

            table_header: Style::default().fg(Color::Red),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            scale: INTENSITY_SCALE_ANSI,
            cell_text: Color::White,
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Position of `value` on the intensity scale, `0 <= value <= max`.
    ///
    /// RGB stops are interpolated; named colours snap to the nearest stop.
    pub fn scale_color(&self, value: f64, max: f64) -> Color {
        if !(max > 0.0) || !(value > 0.0) {
            return self.scale[0];
        }
        let position = (value / max).clamp(0.0, 1.0) * 3.0;
        let lower = (position.floor() as usize).min(2);
        let t = position - lower as f64;
        match (self.scale[lower], self.scale[lower + 1]) {
            (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
                Color::Rgb(lerp(r1, r2, t), lerp(g1, g2, t), lerp(b1, b2, t))
            }
            (low, high) => {
                if t < 0.5 {
                    low
                } else {
                    high
                }
            }
        }
    }

    /// Foreground style for a bar of `value` in a chart whose largest value
    /// is `max`.
    pub fn bar_style(&self, value: f64, max: f64) -> Style {
        Style::default().fg(self.scale_color(value, max))
    }

    /// Shaded background for a heatmap cell.
    pub fn cell_style(&self, value: f64, max: f64) -> Style {
        Style::default()
            .bg(self.scale_color(value, max))
            .fg(self.cell_text)
    }

    /// Selection marker style for a profile chip.
    pub fn selection_style(&self, selected: bool) -> Style {
        if selected {
            self.selected
        } else {
            self.unselected
        }
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Red));
        assert!(t.header.add_modifier.contains(Modifier::BOLD));
        assert_eq!(t.scale, INTENSITY_SCALE);
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        assert!(!t.bold.add_modifier.contains(Modifier::BOLD));
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
        assert_eq!(t.scale, INTENSITY_SCALE_ANSI);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").text.fg, Some(Color::White));
        assert_eq!(Theme::from_name("light").text.fg, Some(Color::Black));
        assert_eq!(Theme::from_name("classic").scale, INTENSITY_SCALE_ANSI);
        assert!(Theme::from_name("does-not-exist").header.fg.is_some());
    }

    #[test]
    fn test_scale_color_endpoints() {
        let t = Theme::dark();
        assert_eq!(t.scale_color(0.0, 10.0), Color::Rgb(1, 1, 1));
        assert_eq!(t.scale_color(10.0, 10.0), Color::Rgb(219, 0, 0));
        assert_eq!(t.scale_color(5.0, 0.0), Color::Rgb(1, 1, 1));
        // Out of range clamps.
        assert_eq!(t.scale_color(50.0, 10.0), Color::Rgb(219, 0, 0));
    }

    #[test]
    fn test_scale_color_hits_inner_stops() {
        let t = Theme::dark();
        assert_eq!(t.scale_color(1.0, 3.0), Color::Rgb(86, 77, 77));
        assert_eq!(t.scale_color(2.0, 3.0), Color::Rgb(131, 16, 16));
    }

    #[test]
    fn test_scale_color_interpolates_rgb() {
        let t = Theme::dark();
        // Halfway between the first two stops.
        assert_eq!(t.scale_color(0.5, 3.0), Color::Rgb(44, 39, 39));
    }

    #[test]
    fn test_scale_color_snaps_named_colours() {
        let t = Theme::classic();
        assert_eq!(t.scale_color(0.1, 3.0), Color::Black);
        assert_eq!(t.scale_color(0.9, 3.0), Color::DarkGray);
        assert_eq!(t.scale_color(3.0, 3.0), Color::LightRed);
    }

    #[test]
    fn test_cell_style_sets_background() {
        let t = Theme::dark();
        let s = t.cell_style(3.0, 3.0);
        assert_eq!(s.bg, Some(Color::Rgb(219, 0, 0)));
        assert_eq!(s.fg, Some(Color::White));
    }

    #[test]
    fn test_selection_style() {
        let t = Theme::dark();
        assert_eq!(t.selection_style(true), t.selected);
        assert_eq!(t.selection_style(false), t.unselected);
    }
}

use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the application title.
pub const DECORATION: &str = "▰ ▱ ▰ ▱";

/// Width of the `=` rule under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Application title with decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Source, timezone and load time in `[ source | timezone | loaded ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Description of the loaded export (directory or archive path).
    pub source: &'a str,
    /// IANA name of the display timezone.
    pub timezone: &'a str,
    /// Load time, already formatted.
    pub loaded_at: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, timezone: &'a str, loaded_at: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            timezone,
            loaded_at,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(DECORATION, self.theme.header_accent),
                Span::styled(" STREAMING VIEWING DASHBOARD ", self.theme.header),
                Span::styled(DECORATION, self.theme.header_accent),
            ]),
            Line::from(Span::styled("=".repeat(SEPARATOR_WIDTH), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone, self.theme.value),
                Span::styled(" | loaded ", self.theme.label),
                Span::styled(self.loaded_at, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

use crate::config::Theme;
use crate::ui::color_parser::parse_color;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct ThemeTokens {
    pub ui_border: Color,
    pub ui_border_focus: Color,
    pub ui_accent: Color,
    pub ui_muted: Color,
    pub ui_selection_bg: Color,
    pub day_today: Color,
    pub day_dimmed: Color,
    pub event_fg: Color,
    pub alert_fg: Color,
}

impl ThemeTokens {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            ui_border: parse_color(&theme.border),
            ui_border_focus: parse_color(&theme.border_focus),
            ui_accent: parse_color(&theme.accent),
            ui_muted: parse_color(&theme.muted),
            ui_selection_bg: parse_color(&theme.selection_bg),
            day_today: parse_color(&theme.today),
            day_dimmed: parse_color(&theme.dimmed),
            event_fg: parse_color(&theme.event),
            alert_fg: parse_color(&theme.alert),
        }
    }

    pub fn border_for(&self, focused: bool) -> Color {
        if focused {
            self.ui_border_focus
        } else {
            self.ui_border
        }
    }
}

use ratatui::style::{Color, Modifier, Style};

use crate::core::message::AppMessageKind;

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub app_info_style: Style,
    pub app_warning_style: Style,
    pub app_error_style: Style,

    // Chrome
    pub title_style: Style,
    pub streaming_border_style: Style,
    pub streaming_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,

    // Markdown
    pub md_heading_style: Style,
    pub md_code_style: Style,
    pub md_blockquote_style: Style,
    pub md_list_marker_style: Style,
    pub md_link_style: Style,
    pub md_rule_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            app_info_style: Style::default().fg(Color::Gray),
            app_warning_style: Style::default().fg(Color::Yellow),
            app_error_style: Style::default().fg(Color::LightRed),

            title_style: Style::default().fg(Color::Gray),
            streaming_border_style: Style::default().fg(Color::DarkGray),
            streaming_indicator_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            input_border_style: Style::default().fg(Color::Cyan),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),

            md_heading_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            md_code_style: Style::default().fg(Color::LightYellow),
            md_blockquote_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            md_list_marker_style: Style::default().fg(Color::LightBlue),
            md_link_style: Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::UNDERLINED),
            md_rule_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn app_message_style(&self, kind: AppMessageKind) -> Style {
        match kind {
            AppMessageKind::Info => self.app_info_style,
            AppMessageKind::Warning => self.app_warning_style,
            AppMessageKind::Error => self.app_error_style,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}

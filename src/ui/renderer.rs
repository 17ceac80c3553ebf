use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::app::App;
use crate::ui::markdown::{render_message, render_plain};
use crate::ui::theme::Theme;
use crate::ui::title::build_main_title;

const STREAMING_CURSOR: &str = "▌";
const INPUT_TITLE: &str = "Enter to send • /help for commands • Ctrl+C to quit";
const INPUT_HEIGHT: u16 = 3;

/// Every transcript entry rendered as display lines.
pub fn build_display_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    app.ui
        .transcript
        .iter()
        .flat_map(|message| render_message(message, theme, app.ui.markdown_enabled))
        .collect()
}

fn build_streaming_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = render_plain(&app.ui.streaming_text, theme.assistant_text_style);
    let indicator = Span::styled(STREAMING_CURSOR, theme.streaming_indicator_style);
    match lines.last_mut() {
        Some(last) if !app.ui.streaming_text.ends_with('\n') => last.spans.push(indicator),
        _ => lines.push(Line::from(indicator)),
    }
    lines
}

/// Height of the streaming region: the wrapped reply plus borders, capped
/// at half of `available` so the transcript stays visible.
fn streaming_height(lines: &[Line<'static>], width: u16, available: u16) -> u16 {
    let inner_width = width.saturating_sub(2).max(1);
    let wrapped = Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(inner_width);
    let wanted = u16::try_from(wrapped)
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    wanted.clamp(3, (available / 2).max(3))
}

pub fn ui(f: &mut Frame, app: &mut App, theme: &Theme) {
    let area = f.area();
    let streaming_lines = app
        .session
        .is_streaming()
        .then(|| build_streaming_lines(app, theme));

    let transcript_budget = area.height.saturating_sub(INPUT_HEIGHT);
    let streaming_rows = streaming_lines
        .as_deref()
        .map(|lines| streaming_height(lines, area.width, transcript_budget))
        .unwrap_or(0);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(streaming_rows),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .split(area);

    render_title(f, app, theme, chunks[0]);
    render_transcript(f, app, theme, chunks[1]);
    if let Some(lines) = streaming_lines {
        render_streaming(f, lines, theme, chunks[2]);
    }
    render_input(f, app, theme, chunks[3]);
}

fn render_title(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = build_main_title(app, area.width);
    f.render_widget(Paragraph::new(Span::styled(title, theme.title_style)), area);
}

fn render_transcript(f: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let paragraph = Paragraph::new(build_display_lines(app, theme)).wrap(Wrap { trim: false });

    let total_lines = paragraph.line_count(area.width.max(1));
    app.ui.scroll.set_viewport(total_lines, area.height);

    f.render_widget(paragraph.scroll((app.ui.scroll.offset, 0)), area);
}

fn render_streaming(f: &mut Frame, lines: Vec<Line<'static>>, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.streaming_border_style)
        .title(Span::styled("Assistant", theme.streaming_indicator_style));
    let inner_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2).max(1);

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total = u16::try_from(paragraph.line_count(inner_width)).unwrap_or(u16::MAX);
    // Keep the newest text in view.
    let offset = total.saturating_sub(inner_height);

    f.render_widget(paragraph.block(block).scroll((offset, 0)), area);
}

fn render_input(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(INPUT_TITLE, theme.input_title_style));
    let inner = block.inner(area);

    let cursor_column = app.ui.input.cursor_column();
    let horizontal_scroll = cursor_column.saturating_sub(inner.width.saturating_sub(1));

    let paragraph = Paragraph::new(Span::styled(
        app.ui.input.text().to_string(),
        theme.input_text_style,
    ))
    .block(block)
    .scroll((0, horizontal_scroll));
    f.render_widget(paragraph, area);

    if inner.width > 0 && inner.height > 0 {
        f.set_cursor_position((inner.x + cursor_column - horizontal_scroll, inner.y));
    }
}

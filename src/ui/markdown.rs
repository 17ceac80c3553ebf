//! Converts transcript entries into styled terminal lines.
//!
//! Assistant replies and app notices are parsed as CommonMark (plus
//! strikethrough) with `pulldown-cmark`. User input is shown verbatim behind
//! a `You:` prefix. With markdown disabled every entry is shown as plain
//! text.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::message::{Message, TranscriptRole};
use crate::ui::theme::Theme;

const USER_PREFIX: &str = "You: ";
const QUOTE_PREFIX: &str = "│ ";
const CODE_INDENT: &str = "    ";
const RULE_WIDTH: usize = 24;

#[derive(Clone, Copy, Debug)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

/// Style used for the body text of a transcript entry.
pub fn base_style(role: TranscriptRole, theme: &Theme) -> Style {
    match role {
        TranscriptRole::User => theme.user_text_style,
        TranscriptRole::Assistant => theme.assistant_text_style,
        TranscriptRole::App(kind) => theme.app_message_style(kind),
    }
}

/// Render one transcript entry, followed by a blank separator line.
pub fn render_message(message: &Message, theme: &Theme, markdown: bool) -> Vec<Line<'static>> {
    let style = base_style(message.role, theme);
    let mut lines = match message.role {
        TranscriptRole::User => render_user(&message.content, theme),
        _ if markdown => render_markdown(&message.content, style, theme),
        _ => render_plain(&message.content, style),
    };
    lines.push(Line::default());
    lines
}

fn render_user(content: &str, theme: &Theme) -> Vec<Line<'static>> {
    let indent = " ".repeat(USER_PREFIX.len());
    content
        .lines()
        .enumerate()
        .map(|(idx, text)| {
            let prefix = if idx == 0 {
                Span::styled(USER_PREFIX, theme.user_prefix_style)
            } else {
                Span::raw(indent.clone())
            };
            Line::from(vec![
                prefix,
                Span::styled(text.to_string(), theme.user_text_style),
            ])
        })
        .collect()
}

/// Split `content` on newlines without interpreting markup.
pub fn render_plain(content: &str, style: Style) -> Vec<Line<'static>> {
    content
        .lines()
        .map(|text| Line::from(Span::styled(text.to_string(), style)))
        .collect()
}

pub fn render_markdown(content: &str, base: Style, theme: &Theme) -> Vec<Line<'static>> {
    MarkdownRenderer::new(base, theme).render(content)
}

struct MarkdownRenderer<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    quote_depth: usize,
    code_block: Option<String>,
}

impl<'t> MarkdownRenderer<'t> {
    fn new(base: Style, theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            spans: Vec::new(),
            style_stack: vec![base],
            list_stack: Vec::new(),
            quote_depth: 0,
            code_block: None,
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn push_style(&mut self, style: Style) {
        let style = self.current_style().patch(style);
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn line_prefix(&self) -> Vec<Span<'static>> {
        (0..self.quote_depth)
            .map(|_| Span::styled(QUOTE_PREFIX, self.theme.md_blockquote_style))
            .collect()
    }

    fn flush_line(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = self.line_prefix();
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    /// Drop a trailing line that holds nothing but quote gutters.
    fn pop_gutter_line(&mut self) {
        let gutter_only = self.lines.last().is_some_and(|line| {
            !line.spans.is_empty()
                && line
                    .spans
                    .iter()
                    .all(|span| span.content.as_ref() == QUOTE_PREFIX)
        });
        if gutter_only {
            self.lines.pop();
        }
    }

    fn push_text(&mut self, text: &str) {
        let style = self.current_style();
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn start_item(&mut self) {
        self.flush_line();
        let depth = self.list_stack.len().saturating_sub(1);
        let marker = match self.list_stack.last_mut() {
            Some(ListKind::Ordered(next)) => {
                let marker = format!("{next}. ");
                *next += 1;
                marker
            }
            Some(ListKind::Unordered) | None => "• ".to_string(),
        };
        self.spans.push(Span::raw("  ".repeat(depth)));
        self.spans
            .push(Span::styled(marker, self.theme.md_list_marker_style));
    }

    fn end_code_block(&mut self) {
        let Some(code) = self.code_block.take() else {
            return;
        };
        let style = self.theme.md_code_style;
        for text in code.trim_end_matches('\n').lines() {
            let mut spans = self.line_prefix();
            spans.push(Span::raw(CODE_INDENT));
            spans.push(Span::styled(text.to_string(), style));
            self.lines.push(Line::from(spans));
        }
        self.lines.push(Line::default());
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);

        for event in Parser::new_ext(content, options) {
            match event {
                Event::Start(tag) => match tag {
                    Tag::Paragraph => {}
                    Tag::Heading { .. } => {
                        self.flush_line();
                        self.push_style(self.theme.md_heading_style);
                    }
                    Tag::BlockQuote(_) => {
                        self.flush_line();
                        self.quote_depth += 1;
                        self.push_style(self.theme.md_blockquote_style);
                    }
                    Tag::List(start) => {
                        self.flush_line();
                        self.list_stack.push(match start {
                            Some(n) => ListKind::Ordered(n),
                            None => ListKind::Unordered,
                        });
                    }
                    Tag::Item => self.start_item(),
                    Tag::CodeBlock(_) => {
                        self.flush_line();
                        self.code_block = Some(String::new());
                    }
                    Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
                    Tag::Strong => self.push_modifier(Modifier::BOLD),
                    Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
                    Tag::Link { .. } => self.push_style(self.theme.md_link_style),
                    _ => {}
                },
                Event::End(tag_end) => match tag_end {
                    TagEnd::Paragraph => {
                        self.flush_line();
                        if self.list_stack.is_empty() {
                            self.lines.push(Line::from(self.line_prefix()));
                        }
                    }
                    TagEnd::Heading(_) => {
                        self.flush_line();
                        self.pop_style();
                        self.lines.push(Line::default());
                    }
                    TagEnd::BlockQuote(_) => {
                        self.flush_line();
                        self.pop_gutter_line();
                        self.pop_style();
                        self.quote_depth = self.quote_depth.saturating_sub(1);
                        if self.quote_depth == 0 {
                            self.lines.push(Line::default());
                        }
                    }
                    TagEnd::List(_) => {
                        self.flush_line();
                        self.list_stack.pop();
                        if self.list_stack.is_empty() {
                            self.lines.push(Line::default());
                        }
                    }
                    TagEnd::Item => self.flush_line(),
                    TagEnd::CodeBlock => self.end_code_block(),
                    TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                        self.pop_style()
                    }
                    _ => {}
                },
                Event::Text(text) => match self.code_block.as_mut() {
                    Some(code) => code.push_str(&text),
                    None => self.push_text(&text),
                },
                Event::Code(code) => {
                    let style = self.current_style().patch(self.theme.md_code_style);
                    self.spans.push(Span::styled(code.to_string(), style));
                }
                Event::SoftBreak => self.push_text(" "),
                Event::HardBreak => self.flush_line(),
                Event::Rule => {
                    self.flush_line();
                    self.lines.push(Line::from(Span::styled(
                        "─".repeat(RULE_WIDTH),
                        self.theme.md_rule_style,
                    )));
                    self.lines.push(Line::default());
                }
                Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
                _ => {}
            }
        }

        self.flush_line();
        while self
            .lines
            .last()
            .is_some_and(|line| line.spans.iter().all(|span| span.content.trim().is_empty()))
        {
            self.lines.pop();
        }
        self.lines
    }
}

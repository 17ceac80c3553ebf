//! Display-side state: the transcript, the prompt line, the in-progress
//! response and the scroll position.

use unicode_width::UnicodeWidthStr;

use crate::core::message::Message;

/// Two-character marker that always heads the input line.
pub const PROMPT_MARKER: &str = "> ";
const MARKER_CHARS: usize = 2;

/// Single-line input pre-seeded with [`PROMPT_MARKER`]. Editing can never
/// remove the marker or move the cursor into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInput {
    text: String,
    /// Cursor position in chars, never below the marker length.
    cursor: usize,
}

impl Default for PromptInput {
    fn default() -> Self {
        Self {
            text: PROMPT_MARKER.to_string(),
            cursor: MARKER_CHARS,
        }
    }
}

impl PromptInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text typed after the marker.
    pub fn body(&self) -> &str {
        &self.text[PROMPT_MARKER.len()..]
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let idx = self.byte_index(self.cursor);
        self.text.insert(idx, ch);
        self.cursor += 1;
    }

    /// Insert pasted text at the cursor. Line breaks become spaces and other
    /// control characters are dropped.
    pub fn insert_str(&mut self, pasted: &str) {
        let cleaned: String = pasted
            .replace("\r\n", "\n")
            .chars()
            .filter_map(|ch| match ch {
                '\n' | '\r' | '\t' => Some(' '),
                c if c.is_control() => None,
                c => Some(c),
            })
            .collect();
        let idx = self.byte_index(self.cursor);
        self.text.insert_str(idx, &cleaned);
        self.cursor += cleaned.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor <= MARKER_CHARS {
            return;
        }
        let idx = self.byte_index(self.cursor - 1);
        self.text.remove(idx);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let idx = self.byte_index(self.cursor);
        self.text.remove(idx);
    }

    pub fn move_left(&mut self) {
        if self.cursor > MARKER_CHARS {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = MARKER_CHARS;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Delete everything typed after the marker.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Take the submitted text with the marker and surrounding whitespace
    /// stripped, resetting the line to the bare marker.
    pub fn take_submission(&mut self) -> String {
        let submitted = self.body().trim().to_string();
        self.clear();
        submitted
    }

    /// Terminal column of the cursor relative to the start of the line.
    pub fn cursor_column(&self) -> u16 {
        let idx = self.byte_index(self.cursor);
        UnicodeWidthStr::width(&self.text[..idx]) as u16
    }
}

/// Vertical scroll position of the transcript, measured in rendered lines
/// from the top. Follows new output until the user scrolls up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: u16,
    pub auto_scroll: bool,
    max_offset: u16,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            auto_scroll: true,
            max_offset: 0,
        }
    }
}

impl ScrollState {
    /// Record the rendered size of the transcript. Called by the renderer on
    /// every frame before the offset is used.
    pub fn set_viewport(&mut self, total_lines: usize, height: u16) {
        let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
        self.max_offset = total.saturating_sub(height);
        if self.auto_scroll {
            self.offset = self.max_offset;
        } else {
            self.offset = self.offset.min(self.max_offset);
        }
    }

    pub fn max_offset(&self) -> u16 {
        self.max_offset
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset);
        if self.offset >= self.max_offset {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.offset = self.max_offset;
    }
}

pub struct UiState {
    pub transcript: Vec<Message>,
    pub input: PromptInput,
    /// Text of the response currently streaming; shown in its own region
    /// and moved into the transcript when the stream ends.
    pub streaming_text: String,
    /// Error reported by the current stream, shown once the stream ends.
    pub stream_error: Option<String>,
    pub scroll: ScrollState,
    pub markdown_enabled: bool,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            transcript: Vec::new(),
            input: PromptInput::default(),
            streaming_text: String::new(),
            stream_error: None,
            scroll: ScrollState::default(),
            markdown_enabled: true,
            should_quit: false,
        }
    }
}

impl UiState {
    pub fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }
}

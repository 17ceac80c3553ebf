//! Maps terminal events to [`AppAction`]s.
//!
//! Kept free of I/O so the mapping can be tested with synthetic events.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::app::AppAction;

const LINE_SCROLL: u16 = 1;
const PAGE_SCROLL: u16 = 10;

pub fn map_event(event: &Event) -> Option<AppAction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
        Event::Paste(text) => Some(AppAction::InsertText { text: text.clone() }),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => AppAction::Quit,
        KeyCode::Char('u') if ctrl => AppAction::ClearInput,
        KeyCode::Char('t') if ctrl => AppAction::ToggleMarkdown,
        KeyCode::Char('a') if ctrl => AppAction::CursorHome,
        KeyCode::Char('e') if ctrl => AppAction::CursorEnd,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(ch) => AppAction::InsertChar { ch },
        KeyCode::Enter => AppAction::SubmitInput,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Delete => AppAction::DeleteForward,
        KeyCode::Left => AppAction::CursorLeft,
        KeyCode::Right => AppAction::CursorRight,
        KeyCode::Home if ctrl => AppAction::ScrollToTop,
        KeyCode::End if ctrl => AppAction::ScrollToBottom,
        KeyCode::Home => AppAction::CursorHome,
        KeyCode::End => AppAction::CursorEnd,
        KeyCode::Up => AppAction::ScrollUp { lines: LINE_SCROLL },
        KeyCode::Down => AppAction::ScrollDown { lines: LINE_SCROLL },
        KeyCode::PageUp => AppAction::ScrollUp { lines: PAGE_SCROLL },
        KeyCode::PageDown => AppAction::ScrollDown { lines: PAGE_SCROLL },
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn ctrl_c_quits_and_enter_submits() {
        assert!(matches!(
            map_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppAction::Quit)
        ));
        assert!(matches!(
            map_event(&key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(AppAction::SubmitInput)
        ));
    }

    #[test]
    fn printable_keys_insert_text() {
        assert!(matches!(
            map_event(&key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(AppAction::InsertChar { ch: 'q' })
        ));
        assert!(matches!(
            map_event(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(AppAction::InsertChar { ch: 'Q' })
        ));
        assert!(map_event(&key(KeyCode::Char('z'), KeyModifiers::CONTROL)).is_none());
    }

    #[test]
    fn home_and_end_jump_the_transcript_with_ctrl() {
        assert!(matches!(
            map_event(&key(KeyCode::Home, KeyModifiers::CONTROL)),
            Some(AppAction::ScrollToTop)
        ));
        assert!(matches!(
            map_event(&key(KeyCode::End, KeyModifiers::NONE)),
            Some(AppAction::CursorEnd)
        ));
        assert!(matches!(
            map_event(&key(KeyCode::PageUp, KeyModifiers::NONE)),
            Some(AppAction::ScrollUp { lines: PAGE_SCROLL })
        ));
    }

    #[test]
    fn paste_becomes_insert_text_and_releases_are_ignored() {
        assert!(matches!(
            map_event(&Event::Paste("two\nlines".into())),
            Some(AppAction::InsertText { text }) if text == "two\nlines"
        ));

        let mut release = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(map_event(&Event::Key(release)).is_none());
    }
}

use tracing::debug;

use super::{streaming, App, AppAction, AppCommand};
use crate::commands::{process_input, CommandResult};

fn is_quit_word(text: &str) -> bool {
    text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit")
}

fn submit_input(app: &mut App) -> Option<AppCommand> {
    let text = app.ui.input.take_submission();
    if text.is_empty() {
        return None;
    }

    if is_quit_word(&text) {
        app.ui.should_quit = true;
        return None;
    }

    // Anything the user submits should be visible, so jump to the bottom.
    app.ui.scroll.scroll_to_bottom();

    if text.starts_with('/') {
        debug!(input = %text, "Dispatching slash command");
        return match process_input(app, &text) {
            CommandResult::Continue => None,
            CommandResult::Reconnect => Some(AppCommand::ProbeServer(app.probe_request())),
        };
    }

    streaming::spawn_stream_for_message(app, text)
}

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    if let AppAction::SubmitInput = action {
        return submit_input(app);
    }

    let input = &mut app.ui.input;
    match action {
        AppAction::InsertChar { ch } => input.insert_char(ch),
        AppAction::InsertText { text } => input.insert_str(&text),
        AppAction::Backspace => input.backspace(),
        AppAction::DeleteForward => input.delete(),
        AppAction::CursorLeft => input.move_left(),
        AppAction::CursorRight => input.move_right(),
        AppAction::CursorHome => input.move_home(),
        AppAction::CursorEnd => input.move_end(),
        AppAction::ClearInput => input.clear(),
        AppAction::ScrollUp { lines } => app.ui.scroll.scroll_up(lines),
        AppAction::ScrollDown { lines } => app.ui.scroll.scroll_down(lines),
        AppAction::ScrollToTop => app.ui.scroll.scroll_to_top(),
        AppAction::ScrollToBottom => app.ui.scroll.scroll_to_bottom(),
        AppAction::ToggleMarkdown => app.ui.markdown_enabled = !app.ui.markdown_enabled,
        AppAction::Quit => app.ui.should_quit = true,
        _ => {}
    }
    None
}

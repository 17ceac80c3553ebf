use unicode_width::UnicodeWidthStr;

use crate::core::app::App;

const SEPARATOR: &str = " • ";
const APP_NAME: &str = "parley";

/// Connection state as shown in the title bar.
pub fn connection_status(app: &App) -> &'static str {
    if app.session.is_streaming() {
        return "responding";
    }
    match &app.session.last_probe {
        None => "connecting",
        Some(probe) if probe.available => "connected",
        Some(_) => "offline",
    }
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        truncated.push(ch);
        width += ch_width;
    }
    truncated.push('…');
    truncated
}

/// Title line for the transcript: app name, model, server and status.
/// Fields are dropped from the right (server first) and the model name is
/// shortened when the line would not fit in `max_width` columns.
pub fn build_main_title(app: &App, max_width: u16) -> String {
    let max_width = usize::from(max_width);
    let model = format!("Model: {}", app.session.selection.name);
    let server = app.session.selection.server_url.clone();
    let status = connection_status(app).to_string();

    let full = [APP_NAME, &model, &server, &status].join(SEPARATOR);
    if UnicodeWidthStr::width(full.as_str()) <= max_width {
        return full;
    }

    let without_server = [APP_NAME, &model, &status].join(SEPARATOR);
    if UnicodeWidthStr::width(without_server.as_str()) <= max_width {
        return without_server;
    }

    let fixed = UnicodeWidthStr::width(APP_NAME)
        + UnicodeWidthStr::width(status.as_str())
        + 2 * UnicodeWidthStr::width(SEPARATOR);
    let model_room = max_width.saturating_sub(fixed);
    if model_room >= 4 {
        return [APP_NAME, &truncate_to_width(&model, model_room), &status].join(SEPARATOR);
    }
    truncate_to_width(APP_NAME, max_width.max(1))
}

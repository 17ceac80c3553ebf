use tracing::{debug, info};

use super::{App, AppAction, AppCommand};
use crate::api::models::ProbeResult;
use crate::core::chat_stream::StreamParams;
use crate::core::error::ChatError;
use crate::core::message::{AppMessageKind, Message, Turn};

pub(super) fn spawn_stream_for_message(app: &mut App, message: String) -> Option<AppCommand> {
    if app.session.is_streaming() {
        app.add_error(ChatError::StreamBusy);
        return None;
    }
    if !app.session.model_ready() {
        app.add_error(ChatError::ModelUninitialized);
        return None;
    }

    app.ui.push(Message::user(message.clone()));
    app.session.conversation.push(Turn::user(message));

    app.ui.streaming_text.clear();
    app.ui.stream_error = None;
    let stream_id = app.session.begin_stream();

    Some(AppCommand::SpawnStream(StreamParams {
        client: app.session.client.clone(),
        server_url: app.session.selection.server_url.clone(),
        model: app.session.selection.name.clone(),
        messages: app.session.conversation.snapshot(),
        options: app.session.options,
        stream_id,
    }))
}

fn append_response_chunk(app: &mut App, content: &str) {
    app.ui.streaming_text.push_str(content);
}

/// Move the streamed text into the conversation and the transcript. Text
/// received before a failure is kept.
fn finalize_stream(app: &mut App) {
    let response = std::mem::take(&mut app.ui.streaming_text);
    if !response.is_empty() {
        app.session.conversation.push(Turn::assistant(response.clone()));
        app.ui.push(Message::assistant(response));
    }
    if let Some(error) = app.ui.stream_error.take() {
        app.add_app_message(AppMessageKind::Error, error);
    }
    app.session.finish_stream();
}

fn apply_probe_result(app: &mut App, result: ProbeResult) {
    let server_url = app.session.selection.server_url.clone();

    if result.available {
        info!(server_url = %server_url, models = result.model_names.len(), "Connected to model server");
        app.add_app_message(
            AppMessageKind::Info,
            format!(
                "Connected to model server at {server_url}. Active model: **{}**",
                app.session.selection.name
            ),
        );
        if result.model_names.is_empty() {
            app.add_app_message(
                AppMessageKind::Warning,
                "No models are installed. Run `ollama pull <model>` and then /reconnect.",
            );
        } else if !result.has_model(&app.session.selection.name) {
            app.add_app_message(
                AppMessageKind::Warning,
                format!(
                    "Model '{}' is not installed on the server. Use /models to pick another.",
                    app.session.selection.name
                ),
            );
        }
    } else {
        let reason = result
            .failure
            .clone()
            .unwrap_or_else(|| ChatError::ConnectionUnavailable("no response".to_string()));
        app.add_error(format!(
            "{reason}\n\nStart the server with `ollama serve`, pull a model with `ollama pull <model>`, then use /reconnect."
        ));
    }

    app.session.last_probe = Some(result);
}

pub(super) fn handle_streaming_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::AppendResponseChunk { content, stream_id } => {
            if app.session.is_current_stream(stream_id) {
                append_response_chunk(app, &content);
            }
        }
        AppAction::StreamErrored { message, stream_id } => {
            if app.session.is_current_stream(stream_id) && app.ui.stream_error.is_none() {
                app.ui.stream_error = Some(message);
            }
        }
        AppAction::StreamCompleted { stream_id } => {
            if app.session.is_current_stream(stream_id) {
                finalize_stream(app);
            } else {
                debug!(stream_id, "Ignoring completion of stale stream");
            }
        }
        AppAction::ProbeCompleted { result } => apply_probe_result(app, result),
        _ => {}
    }
    None
}

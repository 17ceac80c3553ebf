//! Slash-command parsing and execution.

mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use tracing::info;

use crate::core::app::App;
use crate::core::error::ChatError;
use crate::core::message::AppMessageKind;

pub enum CommandResult {
    Continue,
    /// Re-run the server probe.
    Reconnect,
}

/// Run a `/`-prefixed line against the app. Unknown commands and commands
/// that cannot run right now leave the session untouched and report why.
pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();
    let without_slash = trimmed.strip_prefix('/').unwrap_or(trimmed);

    let mut parts = without_slash.splitn(2, char::is_whitespace);
    let command_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    let Some(command) = registry::find_command(command_name) else {
        app.add_error(ChatError::UnknownCommand(trimmed.to_string()));
        return CommandResult::Continue;
    };

    if command.mutates_session && app.session.is_streaming() {
        app.add_error(ChatError::StreamBusy);
        return CommandResult::Continue;
    }

    (command.handler)(app, CommandInvocation { args })
}

/// Report a usage error when a command that takes no argument got one.
fn reject_args(app: &mut App, invocation: CommandInvocation<'_>, usage: &'static str) -> bool {
    if invocation.args.is_empty() {
        return false;
    }
    app.add_error(ChatError::Usage(usage));
    true
}

pub(super) fn handle_help(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if reject_args(app, invocation, "/help") {
        return CommandResult::Continue;
    }
    let mut help_md = String::from("## Commands\n");
    for command in all_commands() {
        help_md.push_str(&format!("- `{}` - {}\n", command.usage, command.help));
    }
    help_md.push_str("- `quit` / `exit` - leave parley\n\n");
    help_md.push_str(
        "Keys: Enter sends, Ctrl+C quits, Up/Down/PgUp/PgDn scroll, Ctrl+Home/Ctrl+End jump, Ctrl+U clears the line, Ctrl+T toggles markdown.",
    );
    app.add_app_message(AppMessageKind::Info, help_md);
    CommandResult::Continue
}

pub(super) fn handle_models(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if reject_args(app, invocation, "/models") {
        return CommandResult::Continue;
    }
    let current = app.session.selection.name.clone();
    let models = app.session.known_models();

    if models.is_empty() {
        app.add_error(
            "No models available.\n\nDownload one with `ollama pull <model>`, then use /reconnect.",
        );
        return CommandResult::Continue;
    }

    let mut text = String::from("**Available models:**\n\n");
    for model in models {
        if *model == current {
            text.push_str(&format!("- {model} (current)\n"));
        } else {
            text.push_str(&format!("- {model}\n"));
        }
    }
    text.push_str(&format!("\n**Current model:** {current}"));
    app.add_app_message(AppMessageKind::Info, text);
    CommandResult::Continue
}

pub(super) fn handle_model(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let name = invocation.args;
    if name.is_empty() {
        app.add_error(ChatError::Usage("/model <name>"));
        return CommandResult::Continue;
    }

    let known = app.session.known_models().iter().any(|model| model == name);
    if !known {
        app.add_error(ChatError::InvalidModelName(name.to_string()));
        return CommandResult::Continue;
    }

    info!(from = %app.session.selection.name, to = %name, "Switching model");
    app.session.selection.name = name.to_string();
    app.add_app_message(
        AppMessageKind::Info,
        format!("Model switched to **{name}**."),
    );
    CommandResult::Continue
}

pub(super) fn handle_system(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let prompt = invocation.args;
    if prompt.is_empty() {
        app.add_error(ChatError::Usage("/system <prompt>"));
        return CommandResult::Continue;
    }

    app.session.conversation.set_system_prompt(prompt);
    app.add_app_message(
        AppMessageKind::Info,
        format!("System prompt set:\n\n*{prompt}*"),
    );
    CommandResult::Continue
}

pub(super) fn handle_clear(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if reject_args(app, invocation, "/clear") {
        return CommandResult::Continue;
    }
    if app.session.conversation.system_prompt().trim().is_empty() {
        let default_prompt = app.session.default_system_prompt().to_string();
        app.session.conversation.set_system_prompt(default_prompt);
    }
    app.session.conversation.clear();
    app.add_app_message(AppMessageKind::Info, "Conversation history cleared.");
    CommandResult::Continue
}

pub(super) fn handle_reconnect(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if reject_args(app, invocation, "/reconnect") {
        return CommandResult::Continue;
    }
    app.add_app_message(
        AppMessageKind::Info,
        format!(
            "Probing model server at {}…",
            app.session.selection.server_url
        ),
    );
    CommandResult::Reconnect
}

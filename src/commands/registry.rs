use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    /// Changes the conversation or model, so it must wait for an idle session.
    pub mutates_session: bool,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    /// Text after the command name, trimmed.
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        mutates_session: false,
        handler: super::handle_help,
    },
    Command {
        name: "models",
        usage: "/models",
        help: "List the models installed on the server.",
        mutates_session: false,
        handler: super::handle_models,
    },
    Command {
        name: "model",
        usage: "/model <name>",
        help: "Switch to another installed model.",
        mutates_session: true,
        handler: super::handle_model,
    },
    Command {
        name: "system",
        usage: "/system <prompt>",
        help: "Replace the system prompt.",
        mutates_session: true,
        handler: super::handle_system,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Forget the conversation history, keeping the system prompt.",
        mutates_session: true,
        handler: super::handle_clear,
    },
    Command {
        name: "reconnect",
        usage: "/reconnect",
        help: "Probe the model server again and refresh the model list.",
        mutates_session: true,
        handler: super::handle_reconnect,
    },
];

//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input, stream messages and results from background tasks are
//! all turned into [`AppAction`]s and applied to the [`App`] on this task,
//! so nothing else ever holds the state. Side effects requested by those
//! actions ([`AppCommand`]s) are handed to Tokio tasks.

use std::{
    error::Error,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::models::probe;
use crate::core::app::{
    apply_actions, App, AppAction, AppActionDispatcher, AppCommand, ProbeRequest,
};
use crate::core::chat_stream::{ChatStreamService, StreamReceiver};
use crate::core::config::Settings;
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;

use super::keybindings::map_event;
use super::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

const MAX_FPS: u64 = 60;
const IDLE_SLEEP: Duration = Duration::from_millis(16);

/// Probe the server in the background and report back as an action.
fn spawn_probe(dispatcher: AppActionDispatcher, request: ProbeRequest) {
    tokio::spawn(async move {
        let ProbeRequest {
            client,
            server_url,
            timeout,
        } = request;
        let result = probe(&client, &server_url, timeout).await;
        dispatcher.dispatch(AppAction::ProbeCompleted { result });
    });
}

fn execute_command(
    command: AppCommand,
    stream_service: &ChatStreamService,
    dispatcher: &AppActionDispatcher,
) {
    match command {
        AppCommand::SpawnStream(params) => {
            debug!(stream_id = params.stream_id, model = %params.model, "Spawning stream");
            stream_service.spawn_stream(params);
        }
        AppCommand::ProbeServer(request) => spawn_probe(dispatcher.clone(), request),
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Collect every action that is ready without waiting.
fn gather_actions(
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    stream_rx: &mut StreamReceiver,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> (Vec<AppAction>, bool) {
    let mut actions = Vec::new();
    let mut saw_event = false;

    while let Ok(UiEvent::Crossterm(ev)) = event_rx.try_recv() {
        saw_event = true;
        if let Some(action) = map_event(&ev) {
            actions.push(action);
        }
    }
    while let Ok((message, stream_id)) = stream_rx.try_recv() {
        actions.push(AppAction::from_stream(message, stream_id));
    }
    while let Ok(action) = action_rx.try_recv() {
        actions.push(action);
    }

    let activity = saw_event || !actions.is_empty();
    (actions, activity)
}

#[allow(clippy::too_many_arguments)]
async fn run_loop(
    terminal: &mut ChatTerminal,
    app: &mut App,
    theme: &Theme,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    stream_rx: &mut StreamReceiver,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
    stream_service: &ChatStreamService,
    dispatcher: &AppActionDispatcher,
) -> Result<(), Box<dyn Error>> {
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    loop {
        if app.ui.should_quit {
            return Ok(());
        }

        if request_redraw && last_draw.elapsed() >= frame_duration {
            terminal.draw(|f| ui(f, app, theme))?;
            last_draw = Instant::now();
            request_redraw = false;
        }

        let (actions, activity) = gather_actions(event_rx, stream_rx, action_rx);
        for command in apply_actions(app, actions) {
            execute_command(command, stream_service, dispatcher);
        }

        if activity {
            request_redraw = true;
        } else if !request_redraw {
            tokio::time::sleep(IDLE_SLEEP).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

pub async fn run_chat(settings: Settings) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(&settings);
    let theme = Theme::default();

    let (stream_service, mut stream_rx) = ChatStreamService::new();
    let (dispatcher, mut action_rx) = AppActionDispatcher::new();

    info!(server = %settings.server_url, model = %settings.model, "Starting chat session");
    spawn_probe(dispatcher.clone(), app.probe_request());

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let result = run_loop(
        &mut terminal,
        &mut app,
        &theme,
        &mut event_rx,
        &mut stream_rx,
        &mut action_rx,
        &stream_service,
        &dispatcher,
    )
    .await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    info!("Chat session ended");
    result
}

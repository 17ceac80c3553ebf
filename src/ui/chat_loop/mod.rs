//! Main chat event loop and terminal lifecycle.

mod event_loop;
mod keybindings;
mod lifecycle;

pub use event_loop::run_chat;

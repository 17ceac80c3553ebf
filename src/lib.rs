//! parley is a terminal chat client for a locally running Ollama server.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session: the bounded conversation, the selected
//!   model, configuration, and the streaming worker.
//! - [`ui`] renders the terminal interface and runs the event loop that
//!   turns input and stream output into state changes.
//! - [`commands`] implements the slash commands typed at the prompt.
//! - [`api`] defines the Ollama wire payloads and the connection probe.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;

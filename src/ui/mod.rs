//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the interaction loop that turns key presses, stream
//!   messages and probe results into actions on the app.
//! - [`renderer`] and [`title`]: frame layout and output.
//! - [`markdown`] and [`theme`]: how transcript entries are styled.
//!
//! This layer presents and captures interaction state, while
//! [`crate::core`] owns the session and talks to the model server.

pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod theme;
pub mod title;

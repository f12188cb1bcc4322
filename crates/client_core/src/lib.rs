//! Client session for a remote chess authority.
//!
//! The client holds no rules of record. It forwards player intent over HTTP,
//! mirrors the authoritative snapshot it gets back into a [`SessionState`],
//! and projects that state into a [`BoardView`] for whichever front end is
//! drawing it.

use std::time::Duration;

pub mod advisory;
pub mod api;
pub mod controller;
pub mod error;
pub mod prompt;
pub mod state;
pub mod view;

pub use api::{GameApi, HttpGameApi};
pub use controller::{SessionController, Timings};
pub use error::{ClientError, ClientErrorNotice, Operation};
pub use prompt::{AutoPrompter, Prompter};
pub use state::SessionState;
pub use view::{render, BoardView};

pub const BOT_MOVE_DELAY: Duration = Duration::from_millis(500);
pub const HINT_DISPLAY_WINDOW: Duration = Duration::from_secs(5);
pub const CLOCK_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Session state moved; redraw from [`SessionController::view`].
    StateChanged,
    /// Informational message for the player (game over, resignation).
    Notice(String),
    Error(ClientErrorNotice),
}

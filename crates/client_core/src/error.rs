use chess_shared::{domain::Square, error::ServerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The authority answered with an `error` field.
    #[error("{0}")]
    Server(String),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid server url: {0}")]
    InvalidServerUrl(#[from] url::ParseError),
    #[error("unsupported server url scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("no game in progress")]
    NoActiveGame,
    #[error("no piece of the side to move on {0}")]
    NotMovable(Square),
}

impl ClientError {
    /// True when the request never produced a usable answer from the authority.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Decode(_))
    }
}

impl From<ServerError> for ClientError {
    fn from(value: ServerError) -> Self {
        ClientError::Server(value.error)
    }
}

/// Player-facing operation names, used to prefix surfaced errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StartGame,
    Move,
    BotMove,
    Undo,
    Resign,
    Hint,
    Stats,
    ClockSync,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::StartGame => "Error starting game",
            Operation::Move => "Error making move",
            Operation::BotMove => "Error with bot move",
            Operation::Undo => "Error undoing move",
            Operation::Resign => "Error resigning",
            Operation::Hint => "Error getting hint",
            Operation::Stats => "Error loading stats",
            Operation::ClockSync => "Error syncing timers",
        }
    }

    /// Background operations are logged only, never shown to the player.
    pub fn is_background(self) -> bool {
        matches!(self, Operation::Stats | Operation::ClockSync)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientErrorNotice {
    pub operation: Operation,
    pub message: String,
    pub transport: bool,
}

impl ClientErrorNotice {
    pub fn new(operation: Operation, err: &ClientError) -> Self {
        let message = if err.is_transport() {
            format!(
                "{}. Please check if the server is running.",
                operation.label()
            )
        } else {
            format!("{}: {err}", operation.label())
        };
        Self {
            operation,
            message,
            transport: err.is_transport(),
        }
    }
}

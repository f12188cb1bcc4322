use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        Board, CapturedPieces, Color, GameId, GameStatus, PromotionPiece, Square, Stats,
        TimeControl, Timers,
    },
    error::ServerError,
};

pub const NEW_GAME_ROUTE: &str = "/api/new_game";
pub const MOVE_ROUTE: &str = "/api/move";
pub const BOT_MOVE_ROUTE: &str = "/api/bot_move";
pub const UNDO_ROUTE: &str = "/api/undo";
pub const RESIGN_ROUTE: &str = "/api/resign";
pub const HINT_ROUTE: &str = "/api/hint";
pub const STATS_ROUTE: &str = "/api/stats";
pub const TIMERS_ROUTE: &str = "/api/timers";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub username: String,
    pub player_color: Color,
    pub time_control: TimeControl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub game_id: GameId,
    pub from: Square,
    pub to: Square,
    pub promotion: PromotionPiece,
}

/// Body shared by bot move, undo, resign and hint requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRequest {
    pub game_id: GameId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsQuery {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersQuery {
    pub game_id: GameId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGameResponse {
    pub game_id: GameId,
    pub board: Board,
    pub current_player: Color,
    pub timers: Timers,
    pub status: GameStatus,
    #[serde(default = "default_timers_enabled")]
    pub timers_enabled: bool,
}

fn default_timers_enabled() -> bool {
    true
}

/// Snapshot returned after a player move, bot move or undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub board: Board,
    pub current_player: Color,
    pub status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timers: Option<Timers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_pieces: Option<CapturedPieces>,
    #[serde(default, rename = "move", skip_serializing_if = "Option::is_none")]
    pub played: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResignResponse {
    pub stats: Stats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintResponse {
    pub from_square: Square,
    pub to_square: Square,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timers: Timers,
    pub status: GameStatus,
}

/// Every endpoint answers either its payload or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiReply<T> {
    Rejected(ServerError),
    Accepted(T),
}

impl<T> ApiReply<T> {
    pub fn into_result(self) -> Result<T, ServerError> {
        match self {
            ApiReply::Accepted(value) => Ok(value),
            ApiReply::Rejected(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;

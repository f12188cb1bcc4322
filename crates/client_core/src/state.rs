use chess_shared::{
    domain::{
        Board, CapturedPieces, Color, GameId, GameStatus, Square, Stats, TimeControl, Timers,
    },
    protocol::{HintResponse, MoveResponse, NewGameResponse, ResignResponse, TimersResponse},
};

use crate::advisory::{advisory_moves, is_promotion};

pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Server-suggested move currently marked on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintMarks {
    pub from: Square,
    pub to: Square,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub from: Square,
    pub to: Square,
    pub needs_promotion: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected {
        square: Square,
        possible_moves: Vec<Square>,
    },
    MoveAttempt(MoveIntent),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveApplied {
    /// Result text when this response ended the game.
    pub finished: Option<String>,
    /// The authority now waits for the bot to play.
    pub bot_to_move: bool,
}

/// Everything the client mirrors from the authority, plus local selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(crate) game_id: Option<GameId>,
    pub(crate) board: Board,
    pub(crate) current_player: Color,
    pub(crate) selected: Option<Square>,
    pub(crate) possible_moves: Vec<Square>,
    pub(crate) move_history: Vec<String>,
    pub(crate) captured: CapturedPieces,
    pub(crate) status: GameStatus,
    pub(crate) flipped: bool,
    pub(crate) timers: Timers,
    pub(crate) player_name: String,
    pub(crate) player_color: Color,
    pub(crate) time_control: TimeControl,
    pub(crate) stats: Stats,
    pub(crate) timers_enabled: bool,
    pub(crate) hint: Option<HintMarks>,
    pub(crate) last_result: Option<String>,
    hint_generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            game_id: None,
            board: Board::empty(),
            current_player: Color::White,
            selected: None,
            possible_moves: Vec::new(),
            move_history: Vec::new(),
            captured: CapturedPieces::default(),
            status: GameStatus::Active,
            flipped: false,
            timers: Timers::default(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            player_color: Color::White,
            time_control: TimeControl::default(),
            stats: Stats::default(),
            timers_enabled: true,
            hint: None,
            last_result: None,
            hint_generation: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn possible_moves(&self) -> &[Square] {
        &self.possible_moves
    }

    pub fn move_history(&self) -> &[String] {
        &self.move_history
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn timers(&self) -> Timers {
        self.timers
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn player_color(&self) -> Color {
        self.player_color
    }

    pub fn time_control(&self) -> TimeControl {
        self.time_control
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn timers_enabled(&self) -> bool {
        self.timers_enabled
    }

    pub fn hint(&self) -> Option<HintMarks> {
        self.hint
    }

    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    pub fn is_playable(&self) -> bool {
        self.game_id.is_some() && self.status == GameStatus::Active
    }

    /// Replaces every per-game field with a freshly created game.
    pub fn begin_game(
        &mut self,
        player_name: &str,
        player_color: Color,
        time_control: TimeControl,
        response: NewGameResponse,
    ) {
        self.player_name = player_name.to_string();
        self.player_color = player_color;
        self.time_control = time_control;
        self.game_id = Some(response.game_id);
        self.board = response.board;
        self.current_player = response.current_player;
        self.timers = response.timers;
        self.status = response.status;
        self.timers_enabled = response.timers_enabled;
        self.selected = None;
        self.possible_moves.clear();
        self.move_history.clear();
        self.captured = CapturedPieces::default();
        self.hint = None;
        self.last_result = None;
    }

    /// Two-state click machine: the first click picks a piece of the side to
    /// move, the second click always turns into a move attempt.
    pub fn click(&mut self, square: Square) -> ClickOutcome {
        if !self.is_playable() {
            return ClickOutcome::Ignored;
        }

        if let Some(from) = self.selected.take() {
            self.possible_moves.clear();
            self.hint = None;
            return ClickOutcome::MoveAttempt(MoveIntent {
                from,
                to: square,
                needs_promotion: is_promotion(&self.board, from, square),
            });
        }

        match self.board.piece_at(square) {
            Some(piece) if piece.color == self.current_player => {
                let possible_moves = advisory_moves(&self.board, square);
                self.selected = Some(square);
                self.hint = None;
                self.possible_moves = possible_moves.clone();
                ClickOutcome::Selected {
                    square,
                    possible_moves,
                }
            }
            _ => ClickOutcome::Ignored,
        }
    }

    /// Drops a pending first click without attempting a move.
    pub fn clear_selection(&mut self) -> bool {
        self.possible_moves.clear();
        self.selected.take().is_some()
    }

    fn merge_snapshot(&mut self, response: &mut MoveResponse) {
        self.board = std::mem::take(&mut response.board);
        self.current_player = response.current_player;
        self.status = response.status;
        if let Some(timers) = response.timers {
            self.timers = timers;
        }
        if let Some(captured) = response.captured_pieces.take() {
            self.captured = captured;
        }
    }

    /// Merges a player or bot move. A finished game never hands the turn to the bot.
    pub fn apply_move(&mut self, mut response: MoveResponse) -> MoveApplied {
        self.merge_snapshot(&mut response);
        if let Some(played) = response.played.take() {
            self.move_history.push(played);
        }

        if self.status == GameStatus::Finished {
            if let Some(stats) = response.stats {
                self.stats = stats;
            }
            let result = response.result.unwrap_or_else(|| "Game over".to_string());
            self.last_result = Some(result.clone());
            return MoveApplied {
                finished: Some(result),
                bot_to_move: false,
            };
        }

        MoveApplied {
            finished: None,
            bot_to_move: self.current_player != self.player_color,
        }
    }

    /// Merges an undo. Exactly one ply leaves the local move list per call.
    pub fn apply_undo(&mut self, mut response: MoveResponse) {
        self.merge_snapshot(&mut response);
        self.move_history.pop();
        self.selected = None;
        self.possible_moves.clear();
    }

    pub fn apply_resign(&mut self, response: ResignResponse) {
        self.status = GameStatus::Finished;
        self.stats = response.stats;
        self.last_result = response.result;
        self.selected = None;
        self.possible_moves.clear();
    }

    /// Returns true only on the poll that moves an active game to finished.
    pub fn apply_timers(&mut self, response: TimersResponse) -> bool {
        self.timers = response.timers;
        if response.status == GameStatus::Finished && self.status == GameStatus::Active {
            self.status = GameStatus::Finished;
            self.selected = None;
            self.possible_moves.clear();
            return true;
        }
        false
    }

    pub fn apply_stats(&mut self, stats: Stats) {
        self.stats = stats;
    }

    pub fn show_hint(&mut self, response: HintResponse) -> u64 {
        self.hint_generation += 1;
        self.hint = Some(HintMarks {
            from: response.from_square,
            to: response.to_square,
            generation: self.hint_generation,
        });
        self.hint_generation
    }

    /// Clears the hint only if it is still the one identified by `generation`.
    pub fn expire_hint(&mut self, generation: u64) -> bool {
        match self.hint {
            Some(marks) if marks.generation == generation => {
                self.hint = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear_hint(&mut self) {
        self.hint = None;
    }

    pub fn toggle_orientation(&mut self) {
        self.flipped = !self.flipped;
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;

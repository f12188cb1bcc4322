//! Pure projection of [`SessionState`] into a presentation tree.
//!
//! The whole tree is rebuilt on every call; front ends draw it as-is.

use chess_shared::domain::{Color, GameStatus, Piece, Square, Stats, BOARD_SIZE};

use crate::state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintRole {
    From,
    To,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareView {
    pub square: Square,
    pub shade: Shade,
    pub file_label: Option<char>,
    pub rank_label: Option<usize>,
    pub piece: Option<Piece>,
    pub selected: bool,
    pub possible_move: bool,
    pub hint: Option<HintRole>,
}

impl SquareView {
    pub fn glyph(&self) -> Option<char> {
        self.piece.map(Piece::glyph)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRow {
    pub number: usize,
    pub white: String,
    pub black: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Row-major, 64 entries.
    pub squares: Vec<SquareView>,
    pub status_line: String,
    pub move_count: usize,
    pub moves: Vec<MoveRow>,
    pub captured_white: String,
    pub captured_black: String,
    pub white_clock: String,
    pub black_clock: String,
    pub active_player: Color,
    pub player_name: String,
    pub player_color: Color,
    pub stats: Stats,
    pub flipped: bool,
}

impl BoardView {
    pub fn square(&self, square: Square) -> &SquareView {
        &self.squares[square.row() * BOARD_SIZE + square.col()]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[SquareView]> {
        self.squares.chunks(BOARD_SIZE)
    }
}

pub fn render(state: &SessionState) -> BoardView {
    let flipped = state.is_flipped();
    let hint = state.hint().map(|marks| {
        (
            hint_grid_square(marks.from, flipped),
            hint_grid_square(marks.to, flipped),
        )
    });

    let mut squares = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
    for square in Square::all() {
        let (row, col) = (square.row(), square.col());
        let label_row = if flipped { 0 } else { BOARD_SIZE - 1 };
        let label_col = if flipped { BOARD_SIZE - 1 } else { 0 };
        let file_label = (row == label_row).then(|| {
            let file = if flipped { BOARD_SIZE - 1 - col } else { col };
            char::from(b'a' + file as u8)
        });
        let rank_label =
            (col == label_col).then(|| if flipped { 1 + row } else { BOARD_SIZE - row });

        squares.push(SquareView {
            square,
            shade: if (row + col) % 2 == 0 {
                Shade::Light
            } else {
                Shade::Dark
            },
            file_label,
            rank_label,
            piece: state.board().piece_at(square),
            selected: state.selected() == Some(square),
            possible_move: state.possible_moves().contains(&square),
            hint: match hint {
                Some((from, _)) if from == square => Some(HintRole::From),
                Some((_, to)) if to == square => Some(HintRole::To),
                _ => None,
            },
        });
    }

    let timers = state.timers();
    let (white_clock, black_clock) = if state.timers_enabled() {
        (format_clock(timers.white), format_clock(timers.black))
    } else {
        ("--:--".to_string(), "--:--".to_string())
    };

    BoardView {
        squares,
        status_line: status_line(state),
        move_count: state.move_history().len().div_ceil(2),
        moves: move_rows(state.move_history()),
        captured_white: captured_glyphs(state, Color::White),
        captured_black: captured_glyphs(state, Color::Black),
        white_clock,
        black_clock,
        active_player: state.current_player(),
        player_name: state.player_name().to_string(),
        player_color: state.player_color(),
        stats: state.stats(),
        flipped,
    }
}

/// Grid square a server-reported square is highlighted on.
pub fn hint_grid_square(square: Square, flipped: bool) -> Square {
    if flipped {
        square.mirrored()
    } else {
        square
    }
}

/// `m:ss`, with fractional seconds truncated.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

fn status_line(state: &SessionState) -> String {
    if state.game_id().is_none() {
        return "No game in progress".to_string();
    }
    match state.status() {
        GameStatus::Active => format!("{} to move", state.current_player().label()),
        GameStatus::Finished => "Game over".to_string(),
    }
}

fn move_rows(history: &[String]) -> Vec<MoveRow> {
    history
        .chunks(2)
        .enumerate()
        .map(|(index, pair)| MoveRow {
            number: index + 1,
            white: pair[0].clone(),
            black: pair.get(1).cloned(),
        })
        .collect()
}

fn captured_glyphs(state: &SessionState, color: Color) -> String {
    state
        .captured()
        .of(color)
        .iter()
        .map(|kind| Piece::new(color, *kind).glyph())
        .collect()
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const BOARD_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub String);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn code(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row a pawn of this color moves towards; row 0 is rank 8.
    pub fn forward(self) -> isize {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn promotion_row(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => BOARD_SIZE - 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

impl std::str::FromStr for Color {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "black" | "b" => Ok(Color::Black),
            other => Err(NotationError::UnknownColor(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    pub fn code(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Accepts either case; the authority reports white captures in upper case.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'r' => Some(PieceKind::Rook),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl Serialize for PieceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.code())
    }
}

impl<'de> Deserialize<'de> for PieceKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => PieceKind::from_code(code)
                .ok_or_else(|| de::Error::custom(format!("unknown piece kind `{raw}`"))),
            _ => Err(de::Error::custom(format!("unknown piece kind `{raw}`"))),
        }
    }
}

/// Two-character piece tag such as `wp` or `bk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    pub fn code(self) -> String {
        format!("{}{}", self.color.code(), self.kind.code())
    }

    pub fn glyph(self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
}

impl std::str::FromStr for Piece {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(color), Some(kind), None) => {
                let color = Color::from_code(color)
                    .ok_or_else(|| NotationError::UnknownPiece(s.to_string()))?;
                let kind = if kind.is_ascii_lowercase() {
                    PieceKind::from_code(kind)
                } else {
                    None
                }
                .ok_or_else(|| NotationError::UnknownPiece(s.to_string()))?;
                Ok(Piece { color, kind })
            }
            _ => Err(NotationError::UnknownPiece(s.to_string())),
        }
    }
}

impl Serialize for Piece {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid square notation `{0}`")]
    InvalidSquare(String),
    #[error("square ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("unknown piece code `{0}`")]
    UnknownPiece(String),
    #[error("unknown color `{0}`")]
    UnknownColor(String),
    #[error("unknown time control `{0}`")]
    UnknownTimeControl(String),
    #[error("board must have 8 rows of 8 cells")]
    BoardShape,
}

/// Grid coordinate; row 0 is rank 8, column 0 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Result<Self, NotationError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(NotationError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    /// Every square, row-major from a8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square { row, col }))
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Square::new(row, col).ok()
    }

    pub fn file(self) -> char {
        char::from(b'a' + self.col as u8)
    }

    pub fn rank(self) -> usize {
        BOARD_SIZE - self.row
    }

    pub fn to_notation(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    pub fn from_notation(notation: &str) -> Result<Self, NotationError> {
        let bytes = notation.trim().as_bytes();
        let invalid = || NotationError::InvalidSquare(notation.to_string());
        let [file, rank] = bytes else {
            return Err(invalid());
        };
        if !(b'a'..=b'h').contains(file) || !(b'1'..=b'8').contains(rank) {
            return Err(invalid());
        }
        let col = usize::from(file - b'a');
        let row = BOARD_SIZE - usize::from(rank - b'0');
        Square::new(row, col)
    }

    /// Mirror through the board centre; used when the view is flipped.
    pub fn mirrored(self) -> Self {
        Self {
            row: BOARD_SIZE - 1 - self.row,
            col: BOARD_SIZE - 1 - self.col,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl std::str::FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_notation(s)
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_notation())
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Square::from_notation(&raw).map_err(de::Error::custom)
    }
}

/// 8×8 grid stored top to bottom from black's back rank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn starting_position() -> Self {
        use PieceKind::*;
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut board = Board::empty();
        for (col, kind) in back.into_iter().enumerate() {
            board.cells[0][col] = Some(Piece::new(Color::Black, kind));
            board.cells[1][col] = Some(Piece::new(Color::Black, Pawn));
            board.cells[6][col] = Some(Piece::new(Color::White, Pawn));
            board.cells[7][col] = Some(Piece::new(Color::White, kind));
        }
        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.row][square.col]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.row][square.col] = piece;
    }

    pub fn rows(&self) -> &[[Option<Piece>; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<Vec<String>> = self
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(Piece::code).unwrap_or_default())
                    .collect()
            })
            .collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows: Vec<Vec<Option<String>>> = Vec::deserialize(deserializer)?;
        if rows.len() != BOARD_SIZE || rows.iter().any(|row| row.len() != BOARD_SIZE) {
            return Err(de::Error::custom(NotationError::BoardShape));
        }
        let mut board = Board::empty();
        for (row, cells) in rows.into_iter().enumerate() {
            for (col, cell) in cells.into_iter().enumerate() {
                board.cells[row][col] = match cell.as_deref() {
                    None | Some("") => None,
                    Some(code) => Some(code.parse().map_err(de::Error::custom)?),
                };
            }
        }
        Ok(board)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Active,
    Finished,
}

/// Remaining seconds per side. The authority may report fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    pub white: f64,
    pub black: f64,
}

impl Timers {
    pub fn uniform(seconds: f64) -> Self {
        Self {
            white: seconds,
            black: seconds,
        }
    }

    pub fn remaining(&self, color: Color) -> f64 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::uniform(600.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default, alias = "games_played")]
    pub games: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapturedPieces {
    #[serde(default)]
    pub white: Vec<PieceKind>,
    #[serde(default)]
    pub black: Vec<PieceKind>,
}

impl CapturedPieces {
    pub fn of(&self, color: Color) -> &[PieceKind] {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    OneMinute,
    ThreeMinutes,
    FiveMinutes,
    #[default]
    TenMinutes,
    ThirtyMinutes,
    NoLimit,
}

impl TimeControl {
    pub const ALL: [TimeControl; 6] = [
        TimeControl::OneMinute,
        TimeControl::ThreeMinutes,
        TimeControl::FiveMinutes,
        TimeControl::TenMinutes,
        TimeControl::ThirtyMinutes,
        TimeControl::NoLimit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeControl::OneMinute => "1 min",
            TimeControl::ThreeMinutes => "3 min",
            TimeControl::FiveMinutes => "5 min",
            TimeControl::TenMinutes => "10 min",
            TimeControl::ThirtyMinutes => "30 min",
            TimeControl::NoLimit => "No limit",
        }
    }

    pub fn seconds(self) -> Option<u32> {
        match self {
            TimeControl::OneMinute => Some(60),
            TimeControl::ThreeMinutes => Some(180),
            TimeControl::FiveMinutes => Some(300),
            TimeControl::TenMinutes => Some(600),
            TimeControl::ThirtyMinutes => Some(1800),
            TimeControl::NoLimit => None,
        }
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TimeControl {
    type Err = NotationError;

    /// Accepts the wire label (`10 min`) or a bare minute count (`10`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TimeControl::ALL
            .into_iter()
            .find(|tc| {
                tc.label().eq_ignore_ascii_case(trimmed)
                    || tc
                        .seconds()
                        .is_some_and(|secs| (secs / 60).to_string() == trimmed)
            })
            .or_else(|| {
                matches!(trimmed.to_ascii_lowercase().as_str(), "none" | "unlimited")
                    .then_some(TimeControl::NoLimit)
            })
            .ok_or_else(|| NotationError::UnknownTimeControl(trimmed.to_string()))
    }
}

impl Serialize for TimeControl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TimeControl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Piece a pawn becomes on the far rank; sent as its kind code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PromotionPiece {
    #[default]
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "n")]
    Knight,
}

impl PromotionPiece {
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    pub fn kind(self) -> PieceKind {
        match self {
            PromotionPiece::Queen => PieceKind::Queen,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Knight => PieceKind::Knight,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PromotionPiece::Queen => "Queen",
            PromotionPiece::Rook => "Rook",
            PromotionPiece::Bishop => "Bishop",
            PromotionPiece::Knight => "Knight",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        PromotionPiece::ALL
            .into_iter()
            .find(|piece| piece.kind().code() == code.to_ascii_lowercase())
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;

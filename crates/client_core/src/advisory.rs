//! Client-side move hints painted before the authority answers.
//!
//! Only pawn pushes and pawn captures are approximated. Every other piece
//! yields an empty set; the server remains the judge of legality.

use chess_shared::domain::{Board, Color, PieceKind, Square};

pub fn advisory_moves(board: &Board, from: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece.color),
        _ => Vec::new(),
    }
}

fn pawn_moves(board: &Board, from: Square, color: Color) -> Vec<Square> {
    let step = color.forward();
    let mut moves = Vec::with_capacity(3);

    if let Some(ahead) = from.offset(step, 0) {
        if board.piece_at(ahead).is_none() {
            moves.push(ahead);
        }
    }

    for side in [-1, 1] {
        let Some(target) = from.offset(step, side) else {
            continue;
        };
        if board
            .piece_at(target)
            .is_some_and(|occupant| occupant.color != color)
        {
            moves.push(target);
        }
    }

    moves
}

/// Whether moving the piece on `from` to `to` puts a pawn on its last rank.
pub fn is_promotion(board: &Board, from: Square, to: Square) -> bool {
    board
        .piece_at(from)
        .is_some_and(|piece| piece.kind == PieceKind::Pawn && to.row() == piece.color.promotion_row())
}

#[cfg(test)]
#[path = "tests/advisory_tests.rs"]
mod tests;

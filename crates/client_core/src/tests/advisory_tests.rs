use super::*;
use chess_shared::domain::Piece;

fn sq(notation: &str) -> Square {
    Square::from_notation(notation).expect("square")
}

fn place(board: &mut Board, notation: &str, code: &str) {
    board.set(sq(notation), Some(code.parse::<Piece>().expect("piece")));
}

#[test]
fn white_pawn_from_start_only_steps_once() {
    let board = Board::starting_position();
    assert_eq!(advisory_moves(&board, sq("e2")), vec![sq("e3")]);
}

#[test]
fn black_pawn_moves_down_the_grid() {
    let board = Board::starting_position();
    assert_eq!(advisory_moves(&board, sq("d7")), vec![sq("d6")]);
}

#[test]
fn blocked_pawn_has_only_captures() {
    let mut board = Board::empty();
    place(&mut board, "e4", "wp");
    place(&mut board, "e5", "bp");
    place(&mut board, "d5", "bn");
    place(&mut board, "f5", "wn");

    assert_eq!(advisory_moves(&board, sq("e4")), vec![sq("d5")]);
}

#[test]
fn edge_pawn_does_not_wrap() {
    let mut board = Board::empty();
    place(&mut board, "a2", "wp");
    place(&mut board, "b3", "bq");

    assert_eq!(advisory_moves(&board, sq("a2")), vec![sq("a3"), sq("b3")]);
}

#[test]
fn other_pieces_have_no_advisory_moves() {
    let board = Board::starting_position();
    for square in ["b1", "a1", "c1", "d1", "e1", "g8"] {
        assert!(advisory_moves(&board, sq(square)).is_empty(), "{square}");
    }
    assert!(advisory_moves(&board, sq("e4")).is_empty());
}

#[test]
fn promotion_only_for_pawns_reaching_their_last_rank() {
    let mut board = Board::empty();
    place(&mut board, "a7", "wp");
    place(&mut board, "h2", "bp");
    place(&mut board, "c7", "wr");

    assert!(is_promotion(&board, sq("a7"), sq("a8")));
    assert!(is_promotion(&board, sq("h2"), sq("h1")));
    assert!(!is_promotion(&board, sq("c7"), sq("c8")));
    assert!(!is_promotion(&board, sq("a7"), sq("a6")));
    assert!(!is_promotion(&board, sq("d4"), sq("d8")));
}

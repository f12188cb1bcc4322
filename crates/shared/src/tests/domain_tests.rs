use super::*;

#[test]
fn square_notation_round_trips_for_every_square() {
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let square = Square::new(row, col).expect("on board");
            let parsed = Square::from_notation(&square.to_notation()).expect("parse");
            assert_eq!(parsed, square);
        }
    }
}

#[test]
fn row_zero_is_rank_eight() {
    assert_eq!(Square::new(0, 0).expect("a8").to_notation(), "a8");
    assert_eq!(Square::new(7, 7).expect("h1").to_notation(), "h1");
    assert_eq!(Square::new(6, 4).expect("e2").to_notation(), "e2");
    assert_eq!(
        Square::from_notation("e4").expect("e4"),
        Square::new(4, 4).expect("e4")
    );
}

#[test]
fn rejects_malformed_square_notation() {
    for raw in ["", "e", "e9", "i1", "e22", "E2", "0a"] {
        assert!(
            Square::from_notation(raw).is_err(),
            "`{raw}` should not parse"
        );
    }
    assert_eq!(
        Square::new(8, 0),
        Err(NotationError::OutOfBounds { row: 8, col: 0 })
    );
}

#[test]
fn all_squares_are_row_major_and_in_bounds() {
    let squares: Vec<Square> = Square::all().collect();
    assert_eq!(squares.len(), BOARD_SIZE * BOARD_SIZE);
    assert_eq!(squares[0].to_notation(), "a8");
    assert_eq!(squares[63].to_notation(), "h1");
    for (index, square) in squares.iter().enumerate() {
        assert_eq!(square.row() * BOARD_SIZE + square.col(), index);
        assert_eq!(Square::new(square.row(), square.col()), Ok(*square));
    }
}

#[test]
fn offset_stays_on_board() {
    let corner = Square::new(0, 0).expect("a8");
    assert_eq!(corner.offset(-1, 0), None);
    assert_eq!(corner.offset(0, -1), None);
    assert_eq!(corner.offset(1, 1), Square::new(1, 1).ok());
    assert_eq!(Square::new(7, 7).expect("h1").offset(1, 0), None);
}

#[test]
fn mirrored_square_is_an_involution() {
    let square = Square::new(1, 6).expect("g7");
    assert_eq!(square.mirrored(), Square::new(6, 1).expect("b2"));
    assert_eq!(square.mirrored().mirrored(), square);
}

#[test]
fn piece_codes_parse_and_render() {
    let piece: Piece = "wq".parse().expect("white queen");
    assert_eq!(piece, Piece::new(Color::White, PieceKind::Queen));
    assert_eq!(piece.code(), "wq");
    assert_eq!(piece.glyph(), '♕');
    assert_eq!(
        "bn".parse::<Piece>().expect("black knight").glyph(),
        '♞'
    );
    assert!("xq".parse::<Piece>().is_err());
    assert!("wQ".parse::<Piece>().is_err());
    assert!("w".parse::<Piece>().is_err());
}

#[test]
fn board_deserializes_empty_cells_as_none() {
    let mut rows = vec![vec![String::new(); 8]; 8];
    rows[7][4] = "wk".to_string();
    rows[0][4] = "bk".to_string();
    let board: Board = serde_json::from_value(serde_json::json!(rows)).expect("board");

    assert_eq!(board.piece_count(), 2);
    assert_eq!(
        board.piece_at(Square::from_notation("e1").expect("e1")),
        Some(Piece::new(Color::White, PieceKind::King))
    );
    assert_eq!(board.piece_at(Square::from_notation("e4").expect("e4")), None);
}

#[test]
fn board_accepts_null_cells() {
    let mut rows = vec![vec![serde_json::Value::Null; 8]; 8];
    rows[3][3] = serde_json::json!("bq");
    let board: Board = serde_json::from_value(serde_json::json!(rows)).expect("board");
    assert_eq!(board.piece_count(), 1);
}

#[test]
fn board_rejects_wrong_shape() {
    let rows = vec![vec![String::new(); 8]; 7];
    assert!(serde_json::from_value::<Board>(serde_json::json!(rows)).is_err());
}

#[test]
fn starting_position_serializes_like_the_authority() {
    let board = Board::starting_position();
    assert_eq!(board.piece_count(), 32);

    let value = serde_json::to_value(&board).expect("serialize");
    assert_eq!(value[0][0], "br");
    assert_eq!(value[1][3], "bp");
    assert_eq!(value[4][4], "");
    assert_eq!(value[7][4], "wk");
    let back: Board = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, board);
}

#[test]
fn captured_pieces_accept_either_case() {
    let captured: CapturedPieces =
        serde_json::from_value(serde_json::json!({"white": ["P", "N"], "black": ["q"]}))
            .expect("captured");
    assert_eq!(captured.white, vec![PieceKind::Pawn, PieceKind::Knight]);
    assert_eq!(captured.of(Color::Black), &[PieceKind::Queen]);
}

#[test]
fn stats_accept_games_played_alias() {
    let stats: Stats = serde_json::from_value(serde_json::json!({
        "games_played": 4, "wins": 2, "losses": 1, "draws": 1
    }))
    .expect("stats");
    assert_eq!(stats.games, 4);

    let partial: Stats =
        serde_json::from_value(serde_json::json!({"wins": 3})).expect("partial stats");
    assert_eq!(partial, Stats { wins: 3, ..Stats::default() });
}

#[test]
fn time_controls_parse_from_labels_and_minutes() {
    assert_eq!("10 min".parse::<TimeControl>(), Ok(TimeControl::TenMinutes));
    assert_eq!("3".parse::<TimeControl>(), Ok(TimeControl::ThreeMinutes));
    assert_eq!("No limit".parse::<TimeControl>(), Ok(TimeControl::NoLimit));
    assert_eq!("unlimited".parse::<TimeControl>(), Ok(TimeControl::NoLimit));
    assert!("7 min".parse::<TimeControl>().is_err());
    assert_eq!(
        serde_json::to_value(TimeControl::ThirtyMinutes).expect("serialize"),
        "30 min"
    );
    assert_eq!(TimeControl::NoLimit.seconds(), None);
}

#[test]
fn colors_serialize_lowercase() {
    assert_eq!(serde_json::to_value(Color::Black).expect("color"), "black");
    assert_eq!("White".parse::<Color>(), Ok(Color::White));
    assert_eq!(Color::White.promotion_row(), 0);
    assert_eq!(Color::Black.promotion_row(), 7);
    assert_eq!(Color::White.opposite(), Color::Black);
}

#[test]
fn promotion_pieces_use_kind_codes() {
    assert_eq!(
        serde_json::to_value(PromotionPiece::Knight).expect("promotion"),
        "n"
    );
    assert_eq!(PromotionPiece::from_code('R'), Some(PromotionPiece::Rook));
    assert_eq!(PromotionPiece::from_code('k'), None);
    assert_eq!(PromotionPiece::default(), PromotionPiece::Queen);
}

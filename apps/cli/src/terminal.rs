//! Text rendering of a [`BoardView`].

use chess_client_core::view::{HintRole, Shade, SquareView};
use chess_client_core::BoardView;
use chess_shared::domain::Color;

pub const HELP: &str = "\
Commands:
  e2          click a square (select a piece, then click its target)
  e2e4        both clicks at once
  new [color] [minutes|none]
              start a new game, e.g. `new black 5`
  undo        take back the last move
  resign      resign the current game
  hint        ask for a suggested move
  flip        turn the board around
  stats       reload your statistics
  board       redraw the board
  help        show this text
  quit        leave

Marks: [x] selected, (x) or * possible target, {x} hint from, <x> hint to
Squares are always typed as seen from white. `flip` turns the picture and its
labels around but e2 stays e2.";

/// Grid, status and move list. Stable while only the clocks tick.
pub fn draw_board(view: &BoardView) -> String {
    let rows: Vec<&[SquareView]> = view.rows().collect();
    let files = file_line(&rows);
    let files_on_top = rows
        .first()
        .is_some_and(|row| row.iter().any(|square| square.file_label.is_some()));

    let mut out = Vec::new();
    if files_on_top {
        out.push(files.clone());
    }
    for row in &rows {
        let left = row
            .first()
            .and_then(|square| square.rank_label)
            .map_or("  ".to_string(), |rank| format!("{rank} "));
        let right = row
            .last()
            .and_then(|square| square.rank_label)
            .map_or(String::new(), |rank| format!(" {rank}"));
        let cells: String = row.iter().map(cell).collect();
        out.push(format!("{left}{cells}{right}"));
    }
    if !files_on_top {
        out.push(files);
    }

    out.push(String::new());
    out.push(view.status_line.clone());
    out.push(format!(
        "Captured  white: {}  black: {}",
        or_dash(&view.captured_white),
        or_dash(&view.captured_black)
    ));
    out.push(format!("Moves ({}): {}", view.move_count, move_list(view)));
    out.join("\n")
}

/// Everything, clocks and player panel included.
pub fn draw(view: &BoardView) -> String {
    format!(
        "{}\n{}\n{}",
        draw_board(view),
        clock_line(view),
        player_line(view)
    )
}

pub fn clock_line(view: &BoardView) -> String {
    let marker = |color: Color| if view.active_player == color { "*" } else { " " };
    format!(
        "{}White {}   {}Black {}",
        marker(Color::White),
        view.white_clock,
        marker(Color::Black),
        view.black_clock
    )
}

fn player_line(view: &BoardView) -> String {
    let stats = view.stats;
    format!(
        "{} ({})  games {}  won {}  lost {}  drawn {}",
        view.player_name,
        view.player_color.label(),
        stats.games,
        stats.wins,
        stats.losses,
        stats.draws
    )
}

fn cell(square: &SquareView) -> String {
    let body = match square.glyph() {
        Some(glyph) => glyph,
        None if square.possible_move => '*',
        None => match square.shade {
            Shade::Light => ' ',
            Shade::Dark => '·',
        },
    };
    let (open, close) = if square.selected {
        ('[', ']')
    } else if let Some(role) = square.hint {
        match role {
            HintRole::From => ('{', '}'),
            HintRole::To => ('<', '>'),
        }
    } else if square.possible_move && square.piece.is_some() {
        ('(', ')')
    } else {
        (' ', ' ')
    };
    format!("{open}{body}{close}")
}

fn file_line(rows: &[&[SquareView]]) -> String {
    let labels: String = rows
        .iter()
        .flat_map(|row| row.iter())
        .filter_map(|square| square.file_label)
        .map(|file| format!(" {file} "))
        .collect();
    format!("  {labels}")
}

fn move_list(view: &BoardView) -> String {
    if view.moves.is_empty() {
        return "-".to_string();
    }
    view.moves
        .iter()
        .map(|row| match &row.black {
            Some(black) => format!("{}. {} {}", row.number, row.white, black),
            None => format!("{}. {}", row.number, row.white),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn or_dash(glyphs: &str) -> &str {
    if glyphs.is_empty() {
        "-"
    } else {
        glyphs
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;

//! Text rendering of the hex board.
//!
//! Rows are laid out with an offset per rank so the hexagon's silhouette is
//! visible: each row is indented by `|r| * 2` columns and cells sit 4 columns
//! apart, with the `r` coordinate labelled on the left.

use crate::board::Board;
use crate::hex::{Cell, BOARD_RADIUS};
use crate::piece::Color;

const CELL_WIDTH: usize = 4;

pub fn render(board: &Board) -> String {
    let mut out = String::new();

    for r in -BOARD_RADIUS..=BOARD_RADIUS {
        out.push_str(&format!("{r:>3}  "));
        out.push_str(&" ".repeat(r.unsigned_abs() as usize * (CELL_WIDTH / 2)));

        let q_min = (-BOARD_RADIUS).max(-BOARD_RADIUS - r);
        let q_max = BOARD_RADIUS.min(BOARD_RADIUS - r);
        for q in q_min..=q_max {
            let glyph = board.get(Cell::new(q, r)).map_or('.', |p| p.glyph());
            out.push(glyph);
            if q < q_max {
                out.push_str(&" ".repeat(CELL_WIDTH - 1));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "\n{} to move (move {})\n",
        match board.to_move {
            Color::White => "White",
            Color::Black => "Black",
        },
        board.full_move_count
    ));

    out
}

use serde::Serialize;

use underchex::board::Board;
use underchex::display;
use underchex::engine::find_best_move_with_tablebase;
use underchex::piece::Color;
use underchex::tablebase::Tablebases;

const MAX_HALF_MOVES: usize = 120;
const SEARCH_DEPTH: u32 = 3;

#[derive(Serialize)]
struct GameRecord {
    moves: Vec<String>,
    result: String,
    half_moves: u32,
}

fn main() {
    env_logger::init();
    log::info!("underchex selfplay, built {}", env!("BUILD_TIMESTAMP"));

    let mut tablebases = Tablebases::new();
    let mut board = Board::new();
    let mut moves_played: Vec<String> = Vec::new();

    println!("{}", display::render(&board));

    while moves_played.len() < MAX_HALF_MOVES && !board.is_game_over() {
        let (best, stats) = find_best_move_with_tablebase(&board, SEARCH_DEPTH, &mut tablebases);
        let m = match best {
            Some(m) => m,
            None => break,
        };
        log::info!(
            "{:?} plays {} (eval {}, {} nodes)",
            board.to_move,
            m,
            stats.eval,
            stats.nodes_searched
        );
        board.apply_move(&m);
        moves_played.push(m.to_string());
    }

    println!("{}", display::render(&board));

    let result = if board.is_checkmate() {
        match board.to_move {
            Color::White => "Black wins",
            Color::Black => "White wins",
        }
    } else if board.is_stalemate() {
        "Draw"
    } else {
        "Unfinished"
    };
    println!("Result: {result} after {} half-moves", board.half_move_count);

    let record = GameRecord {
        moves: moves_played,
        result: result.to_string(),
        half_moves: board.half_move_count,
    };
    println!("{}", serde_json::to_string(&record).expect("game record serializes"));
}

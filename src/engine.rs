// =============================================================================
// Underchex AI engine
//
// Minimax search with alpha-beta pruning over full board copies. Moves are
// ordered by MVV-LVA (captures of high-value pieces first), promotions and
// centralization so that alpha-beta prunes aggressively. Evaluation is always
// from White's perspective; the searcher maximizes when White is to move.
//
// Positions that reduce to a supported endgame configuration are answered
// from the tablebase instead of being searched.
// =============================================================================

use rand::seq::SliceRandom;

use crate::board::Board;
use crate::hex::{all_cells, Cell, BOARD_RADIUS};
use crate::moves::Move;
use crate::piece::{Color, PieceKind};
use crate::tablebase::{detect_config, Tablebases, Wdl};

pub const INF: i32 = 100_000;
pub const MATE: i32 = 50_000;
pub const DRAW: i32 = 0;

pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Lance => 400,
        PieceKind::Chariot => 400,
        PieceKind::Queen => 900,
        PieceKind::King => 10_000,
    }
}

/// Pieces are generally better near the centre of the hexagon.
fn center_bonus(c: Cell) -> i32 {
    (BOARD_RADIUS - c.center_distance()) as i32 * 5
}

/// White pawns advance toward negative r, Black toward positive r.
fn pawn_advancement(c: Cell, color: Color) -> i32 {
    match color {
        Color::White => (BOARD_RADIUS - c.r) as i32 * 10,
        Color::Black => (BOARD_RADIUS + c.r) as i32 * 10,
    }
}

/// Static evaluation from White's perspective: material plus positional
/// bonuses, mobility for the side to move, and a penalty for being in check.
/// Positions with no legal moves evaluate as mate or draw outright.
pub fn evaluate(board: &Board) -> i32 {
    let legal_moves = board.generate_legal_moves();

    if legal_moves.is_empty() {
        if board.is_in_check(board.to_move) {
            return match board.to_move {
                Color::White => -MATE,
                Color::Black => MATE,
            };
        }
        return DRAW;
    }

    let mut score = 0;
    for cell in all_cells() {
        if let Some(p) = board.get(cell) {
            let mut piece_score = piece_value(p.kind);
            if p.kind == PieceKind::Pawn {
                piece_score += pawn_advancement(cell, p.color);
            } else if p.kind != PieceKind::King {
                piece_score += center_bonus(cell);
            }
            match p.color {
                Color::White => score += piece_score,
                Color::Black => score -= piece_score,
            }
        }
    }

    let mobility = legal_moves.len() as i32 * 2;
    match board.to_move {
        Color::White => score += mobility,
        Color::Black => score -= mobility,
    }

    if board.is_in_check(Color::White) {
        score -= 50;
    }
    if board.is_in_check(Color::Black) {
        score += 50;
    }

    score
}

// =============================================================================
// Move ordering
// =============================================================================

/// Ordering score: MVV-LVA for captures, plus promotion value and a
/// centralization term. Higher scores are searched first.
fn move_order_score(board: &Board, m: &Move) -> i32 {
    let mut score = 0;

    if let Some(victim) = board.get(m.to) {
        let attacker = board.get(m.from).map(|p| piece_value(p.kind)).unwrap_or(0);
        score += piece_value(victim.kind) * 10 - attacker;
    }

    if let Some(kind) = m.promotion {
        score += piece_value(kind) * 5;
    }

    score + center_bonus(m.to)
}

/// Sorts so the most promising moves come first. Each move is scored exactly
/// once; the cached keys are sorted descending.
fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_cached_key(|m| std::cmp::Reverse(move_order_score(board, m)));
}

// =============================================================================
// Search
// =============================================================================

#[derive(Clone, Copy, Default, Debug)]
pub struct SearchStats {
    pub nodes_searched: u64,
    pub depth_reached: u32,
    pub eval: i32,
}

/// Fail-hard alpha-beta over board copies. `maximizing` holds exactly when
/// White is to move. Mate scores fold in the distance from the root so that
/// faster wins and slower losses are preferred. The returned move is only
/// meaningful for the root call.
pub fn alpha_beta(
    board: &Board,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    stats: &mut SearchStats,
) -> (i32, Option<Move>) {
    stats.nodes_searched += 1;

    if depth == 0 {
        return (evaluate(board), None);
    }

    let mut moves = board.generate_legal_moves();
    if moves.is_empty() {
        if board.is_in_check(board.to_move) {
            let ply = (stats.depth_reached - depth) as i32;
            let score = if maximizing { -MATE + ply } else { MATE - ply };
            return (score, None);
        }
        return (DRAW, None);
    }

    order_moves(board, &mut moves);

    let mut best_move = moves[0];
    if maximizing {
        let mut max_eval = -INF;
        for m in &moves {
            let mut clone = board.clone();
            clone.apply_move(m);
            let (eval, _) = alpha_beta(&clone, depth - 1, alpha, beta, false, stats);
            if eval > max_eval {
                max_eval = eval;
                best_move = *m;
            }
            alpha = alpha.max(eval);
            if beta <= alpha {
                break;
            }
        }
        (max_eval, Some(best_move))
    } else {
        let mut min_eval = INF;
        for m in &moves {
            let mut clone = board.clone();
            clone.apply_move(m);
            let (eval, _) = alpha_beta(&clone, depth - 1, alpha, beta, true, stats);
            if eval < min_eval {
                min_eval = eval;
                best_move = *m;
            }
            beta = beta.min(eval);
            if beta <= alpha {
                break;
            }
        }
        (min_eval, Some(best_move))
    }
}

/// Searches to a fixed depth and returns the chosen move with statistics.
/// Returns no move when the game is already over.
pub fn find_best_move(board: &Board, depth: u32) -> (Option<Move>, SearchStats) {
    let mut stats = SearchStats {
        nodes_searched: 0,
        depth_reached: depth,
        eval: 0,
    };

    let maximizing = board.to_move == Color::White;
    let (eval, best) = alpha_beta(board, depth, -INF, INF, maximizing, &mut stats);
    stats.eval = eval;
    log::debug!(
        "depth {} search: eval {}, {} nodes",
        depth,
        eval,
        stats.nodes_searched
    );
    (best, stats)
}

/// A uniformly random legal move, if any.
pub fn random_move(board: &Board) -> Option<Move> {
    let moves = board.generate_legal_moves();
    moves.choose(&mut rand::thread_rng()).copied()
}

/// Tablebase-aware move selection: positions in a supported endgame
/// configuration are answered from the tablebase (with its exact mate
/// distance folded into the eval); anything else falls back to alpha-beta.
pub fn find_best_move_with_tablebase(
    board: &Board,
    depth: u32,
    tablebases: &mut Tablebases,
) -> (Option<Move>, SearchStats) {
    let mut stats = SearchStats {
        nodes_searched: 0,
        depth_reached: depth,
        eval: 0,
    };

    if detect_config(board).is_some() {
        if let Some(probe) = tablebases.probe(board) {
            stats.eval = match probe.wdl {
                Wdl::Win => MATE - probe.dtm,
                Wdl::Loss => -MATE + probe.dtm,
                _ => DRAW,
            };
            if let Some(m) = probe.best_move {
                log::debug!("tablebase move from {} table: {}", probe.config.name(), m);
                return (Some(m), stats);
            }
            if probe.wdl == Wdl::Draw {
                return (random_move(board), stats);
            }
            // A lost position has no stored move; search for best resistance.
        }
    }

    let maximizing = board.to_move == Color::White;
    let (eval, best) = alpha_beta(board, depth, -INF, INF, maximizing, &mut stats);
    stats.eval = eval;
    (best, stats)
}

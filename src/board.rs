use serde::{Deserialize, Serialize};

use crate::hex::{all_cells, Cell, Direction, BOARD_RADIUS, BOARD_SIZE, DIRECTIONS};
use crate::moves::{Move, PROMOTION_KINDS};
use crate::piece::{Color, Piece, PieceKind, LANCE_A, LANCE_B};

/// Knight destinations: the six distinct two-step bent paths on the hex grid.
/// Leaps ignore intermediate occupancy. The set is closed under negation, so
/// the same offsets locate attacking knights from the target's viewpoint.
pub const KNIGHT_OFFSETS: [(i8, i8); 6] = [(1, -2), (-1, -1), (2, -1), (1, 1), (-1, 2), (-2, 1)];

const LANCE_A_DIRS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::NorthWest,
    Direction::SouthEast,
];

const LANCE_B_DIRS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::NorthEast,
    Direction::SouthWest,
];

const CHARIOT_DIRS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthWest,
    Direction::NorthWest,
    Direction::SouthEast,
];

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Board {
    // Indexed by [q + BOARD_RADIUS][r + BOARD_RADIUS]; the corner slots that
    // fall outside the hexagon stay None forever.
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
    pub to_move: Color,
    pub white_king: Cell,
    pub black_king: Cell,
    pub half_move_count: u32,
    pub full_move_count: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board: White to move, king caches at the centre, counters
    /// reset.
    pub fn empty() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            to_move: Color::White,
            white_king: Cell::new(0, 0),
            black_king: Cell::new(0, 0),
            half_move_count: 0,
            full_move_count: 1,
        }
    }

    /// The canonical starting position. Listed placements that fall outside
    /// the hexagon are dropped by `set`.
    pub fn new() -> Self {
        let mut board = Board::empty();

        // White (south side, positive r)
        board.set(Cell::new(0, 4), Piece::new(PieceKind::King, Color::White));
        board.set(Cell::new(-1, 4), Piece::new(PieceKind::Queen, Color::White));
        board.set(Cell::new(1, 4), Piece::new(PieceKind::Knight, Color::White));
        board.set(Cell::new(-2, 4), Piece::lance(Color::White, LANCE_A));
        board.set(Cell::new(2, 4), Piece::lance(Color::White, LANCE_B));
        board.set(Cell::new(-1, 3), Piece::new(PieceKind::Chariot, Color::White));
        board.set(Cell::new(0, 3), Piece::new(PieceKind::Knight, Color::White));
        board.set(Cell::new(1, 3), Piece::new(PieceKind::Chariot, Color::White));
        for q in -2..=3 {
            board.set(Cell::new(q, 2), Piece::new(PieceKind::Pawn, Color::White));
        }

        // Black (north side, negative r); the back rank mirrors White's
        // left-to-right, not point-for-point.
        board.set(Cell::new(0, -4), Piece::new(PieceKind::King, Color::Black));
        board.set(Cell::new(1, -4), Piece::new(PieceKind::Queen, Color::Black));
        board.set(Cell::new(-1, -4), Piece::new(PieceKind::Knight, Color::Black));
        board.set(Cell::new(2, -4), Piece::lance(Color::Black, LANCE_A));
        board.set(Cell::new(-2, -4), Piece::lance(Color::Black, LANCE_B));
        board.set(Cell::new(1, -3), Piece::new(PieceKind::Chariot, Color::Black));
        board.set(Cell::new(0, -3), Piece::new(PieceKind::Knight, Color::Black));
        board.set(Cell::new(-1, -3), Piece::new(PieceKind::Chariot, Color::Black));
        for q in -3..=2 {
            board.set(Cell::new(q, -2), Piece::new(PieceKind::Pawn, Color::Black));
        }

        board
    }

    /// Empties the board in place and resets turn state and counters.
    pub fn clear(&mut self) {
        *self = Board::empty();
    }

    fn index(c: Cell) -> (usize, usize) {
        (
            (c.q + BOARD_RADIUS) as usize,
            (c.r + BOARD_RADIUS) as usize,
        )
    }

    pub fn get(&self, c: Cell) -> Option<Piece> {
        if !c.is_valid() {
            return None;
        }
        let (qi, ri) = Self::index(c);
        self.cells[qi][ri]
    }

    /// Places a piece, maintaining the king cache. Off-board cells are
    /// ignored. King placement must go through here so the cache never
    /// desynchronizes from the cells.
    pub fn set(&mut self, c: Cell, piece: Piece) {
        if !c.is_valid() {
            return;
        }
        let (qi, ri) = Self::index(c);
        self.cells[qi][ri] = Some(piece);
        if piece.kind == PieceKind::King {
            match piece.color {
                Color::White => self.white_king = c,
                Color::Black => self.black_king = c,
            }
        }
    }

    pub fn clear_cell(&mut self, c: Cell) {
        if !c.is_valid() {
            return;
        }
        let (qi, ri) = Self::index(c);
        self.cells[qi][ri] = None;
    }

    pub fn king(&self, color: Color) -> Cell {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    // -----------------------------------------------------------------------
    // Attack and check detection
    // -----------------------------------------------------------------------

    /// Does any piece of `by_color` attack `target`?
    ///
    /// Walks each of the six rays outward from the target; the first piece
    /// met decides whether that ray delivers an attack. Knights are checked
    /// separately against their leap offsets.
    pub fn is_cell_attacked(&self, target: Cell, by_color: Color) -> bool {
        for dir in DIRECTIONS {
            let mut from = target.step(dir);
            let mut dist = 1;
            while from.is_valid() {
                if let Some(p) = self.get(from) {
                    if p.color == by_color && attacks_along(p, dir, dist) {
                        return true;
                    }
                    break;
                }
                from = from.step(dir);
                dist += 1;
            }
        }

        for (dq, dr) in KNIGHT_OFFSETS {
            let from = target.offset(dq, dr);
            if !from.is_valid() {
                continue;
            }
            if let Some(p) = self.get(from) {
                if p.kind == PieceKind::Knight && p.color == by_color {
                    return true;
                }
            }
        }

        false
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_cell_attacked(self.king(color), color.opposite())
    }

    // -----------------------------------------------------------------------
    // Move generation
    // -----------------------------------------------------------------------

    /// Every move matching the piece rules for the side to move, with no
    /// check constraint.
    pub fn generate_pseudo_legal_moves(&self) -> Vec<Move> {
        let color = self.to_move;
        let mut moves = Vec::new();

        for cell in all_cells() {
            if let Some(piece) = self.get(cell) {
                if piece.color != color {
                    continue;
                }
                match piece.kind {
                    PieceKind::Pawn => self.generate_pawn_moves(cell, color, &mut moves),
                    PieceKind::Knight => self.generate_knight_moves(cell, color, &mut moves),
                    PieceKind::Lance => {
                        let dirs = if piece.variant == LANCE_A {
                            &LANCE_A_DIRS
                        } else {
                            &LANCE_B_DIRS
                        };
                        self.generate_rider_moves(cell, color, dirs, &mut moves);
                    }
                    PieceKind::Chariot => {
                        self.generate_rider_moves(cell, color, &CHARIOT_DIRS, &mut moves)
                    }
                    PieceKind::Queen => {
                        self.generate_rider_moves(cell, color, &DIRECTIONS, &mut moves)
                    }
                    PieceKind::King => self.generate_king_moves(cell, color, &mut moves),
                }
            }
        }

        moves
    }

    fn generate_rider_moves(
        &self,
        from: Cell,
        color: Color,
        dirs: &[Direction],
        moves: &mut Vec<Move>,
    ) {
        for &dir in dirs {
            let mut to = from.step(dir);
            while to.is_valid() {
                match self.get(to) {
                    None => moves.push(Move::new(from, to)),
                    Some(p) if p.color != color => {
                        moves.push(Move::new(from, to));
                        break;
                    }
                    Some(_) => break,
                }
                to = to.step(dir);
            }
        }
    }

    fn generate_king_moves(&self, from: Cell, color: Color, moves: &mut Vec<Move>) {
        for dir in DIRECTIONS {
            let to = from.step(dir);
            if !to.is_valid() {
                continue;
            }
            if self.get(to).map(|p| p.color == color).unwrap_or(false) {
                continue;
            }
            moves.push(Move::new(from, to));
        }
    }

    fn generate_knight_moves(&self, from: Cell, color: Color, moves: &mut Vec<Move>) {
        for (dq, dr) in KNIGHT_OFFSETS {
            let to = from.offset(dq, dr);
            if !to.is_valid() {
                continue;
            }
            if self.get(to).map(|p| p.color == color).unwrap_or(false) {
                continue;
            }
            moves.push(Move::new(from, to));
        }
    }

    fn generate_pawn_moves(&self, from: Cell, color: Color, moves: &mut Vec<Move>) {
        let (forward, diag_left, diag_right) = match color {
            Color::White => (
                Direction::North,
                Direction::NorthWest,
                Direction::NorthEast,
            ),
            Color::Black => (
                Direction::South,
                Direction::SouthWest,
                Direction::SouthEast,
            ),
        };

        // Non-capturing push: a single step forward onto an empty cell.
        // There is no two-cell initial advance and no en passant.
        let to = from.step(forward);
        if to.is_valid() && self.get(to).is_none() {
            push_pawn_move(from, to, color, moves);
        }

        // Captures: straight forward as well as both forward diagonals.
        for dir in [forward, diag_left, diag_right] {
            let to = from.step(dir);
            if !to.is_valid() {
                continue;
            }
            if let Some(target) = self.get(to) {
                if target.color != color {
                    push_pawn_move(from, to, color, moves);
                }
            }
        }
    }

    /// Pseudo-legal moves that also leave the mover's king safe.
    pub fn generate_legal_moves(&self) -> Vec<Move> {
        self.generate_pseudo_legal_moves()
            .into_iter()
            .filter(|m| {
                let mut clone = self.clone();
                clone.apply_move(m);
                !clone.is_in_check(self.to_move)
            })
            .collect()
    }

    /// The sole legality predicate for externally submitted moves. Rejects
    /// moves from empty cells, from opponent pieces, and off-board cells;
    /// the move (including its promotion choice) must appear in the
    /// pseudo-legal list and must not leave the mover's king in check.
    pub fn is_move_legal(&self, m: &Move) -> bool {
        if !m.from.is_valid() || !m.to.is_valid() {
            return false;
        }
        let piece = match self.get(m.from) {
            Some(p) => p,
            None => return false,
        };
        if piece.color != self.to_move {
            return false;
        }
        if !self.generate_pseudo_legal_moves().contains(m) {
            return false;
        }

        let mut clone = self.clone();
        clone.apply_move(m);
        !clone.is_in_check(self.to_move)
    }

    /// Applies a move with no validation; callers guarantee legality.
    pub fn apply_move(&mut self, m: &Move) {
        let mut piece = match self.get(m.from) {
            Some(p) => p,
            None => return,
        };

        if let Some(kind) = m.promotion {
            piece.kind = kind;
            if kind == PieceKind::Lance {
                piece.variant = LANCE_A;
            }
        }

        self.clear_cell(m.from);
        self.set(m.to, piece);

        if self.to_move == Color::Black {
            self.full_move_count += 1;
        }
        self.to_move = self.to_move.opposite();
        self.half_move_count += 1;
    }

    // -----------------------------------------------------------------------
    // Terminal states
    // -----------------------------------------------------------------------

    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.to_move) && self.generate_legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.to_move) && self.generate_legal_moves().is_empty()
    }

    pub fn is_game_over(&self) -> bool {
        self.generate_legal_moves().is_empty()
    }
}

/// Can `piece`, met `dist` cells out along the ray `dir` from a target,
/// attack back down that ray?
fn attacks_along(piece: Piece, dir: Direction, dist: i8) -> bool {
    match piece.kind {
        PieceKind::Queen => true,
        PieceKind::King => dist == 1,
        PieceKind::Lance => {
            if piece.variant == LANCE_A {
                LANCE_A_DIRS.contains(&dir)
            } else {
                LANCE_B_DIRS.contains(&dir)
            }
        }
        PieceKind::Chariot => CHARIOT_DIRS.contains(&dir),
        PieceKind::Pawn => {
            // A white pawn pushes toward N/NE/NW, so an attacking white pawn
            // sits on the S/SE/SW ray out of the target; Black symmetrically.
            dist == 1
                && match piece.color {
                    Color::White => matches!(
                        dir,
                        Direction::South | Direction::SouthEast | Direction::SouthWest
                    ),
                    Color::Black => matches!(
                        dir,
                        Direction::North | Direction::NorthEast | Direction::NorthWest
                    ),
                }
        }
        PieceKind::Knight => false,
    }
}

fn is_promotion_rank(to: Cell, color: Color) -> bool {
    match color {
        Color::White => to.r == -BOARD_RADIUS,
        Color::Black => to.r == BOARD_RADIUS,
    }
}

/// Pushes a pawn move, fanning out into one move per promotion choice when
/// the destination is the far rank.
fn push_pawn_move(from: Cell, to: Cell, color: Color, moves: &mut Vec<Move>) {
    if is_promotion_rank(to, color) {
        for kind in PROMOTION_KINDS {
            moves.push(Move::promoting(from, to, kind));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece_count(board: &Board, color: Color) -> usize {
        all_cells()
            .filter(|&c| board.get(c).map(|p| p.color == color).unwrap_or(false))
            .count()
    }

    /// Kings far apart on opposite edges, a neutral scaffold for piece tests.
    fn kings_only() -> Board {
        let mut board = Board::empty();
        board.set(Cell::new(0, 4), Piece::new(PieceKind::King, Color::White));
        board.set(Cell::new(0, -4), Piece::new(PieceKind::King, Color::Black));
        board
    }

    #[test]
    fn starting_position_kings_and_queens() {
        let board = Board::new();
        assert_eq!(board.to_move, Color::White);
        assert_eq!(board.white_king, Cell::new(0, 4));
        assert_eq!(board.black_king, Cell::new(0, -4));

        let wq = board.get(Cell::new(-1, 4)).unwrap();
        assert_eq!((wq.kind, wq.color), (PieceKind::Queen, Color::White));
        let bq = board.get(Cell::new(1, -4)).unwrap();
        assert_eq!((bq.kind, bq.color), (PieceKind::Queen, Color::Black));

        // The surviving lances sit on opposite wings, both variant A.
        let wl = board.get(Cell::new(-2, 4)).unwrap();
        assert_eq!((wl.kind, wl.variant), (PieceKind::Lance, LANCE_A));
        let bl = board.get(Cell::new(2, -4)).unwrap();
        assert_eq!((bl.kind, bl.variant), (PieceKind::Lance, LANCE_A));
    }

    #[test]
    fn starting_position_is_materially_balanced() {
        let board = Board::new();
        assert_eq!(piece_count(&board, Color::White), 11);
        assert_eq!(piece_count(&board, Color::Black), 11);
    }

    #[test]
    fn off_board_placements_are_dropped() {
        // The canonical setup lists a few cells beyond the hexagon
        // (|s| > 4 on the wide ranks); they simply never materialize.
        let board = Board::new();
        assert!(!Cell::new(1, 4).is_valid());
        assert!(!Cell::new(2, 4).is_valid());
        assert!(!Cell::new(3, 2).is_valid());
        assert_eq!(board.get(Cell::new(1, 4)), None);
        assert_eq!(board.get(Cell::new(3, 2)), None);
    }

    #[test]
    fn set_tracks_king_cells() {
        let mut board = Board::empty();
        board.set(Cell::new(2, -2), Piece::new(PieceKind::King, Color::White));
        assert_eq!(board.white_king, Cell::new(2, -2));
        board.set(Cell::new(-3, 1), Piece::new(PieceKind::King, Color::Black));
        assert_eq!(board.black_king, Cell::new(-3, 1));

        board.set(Cell::new(0, 0), Piece::new(PieceKind::Queen, Color::White));
        assert_eq!(
            board.white_king,
            Cell::new(2, -2),
            "a queen must not move the king cache"
        );
    }

    #[test]
    fn apply_move_flips_turn_and_counts() {
        let mut board = Board::new();
        board.apply_move(&Move::new(Cell::new(0, 2), Cell::new(0, 1)));
        assert_eq!(board.to_move, Color::Black);
        assert_eq!(board.half_move_count, 1);
        assert_eq!(board.full_move_count, 1);

        board.apply_move(&Move::new(Cell::new(0, -2), Cell::new(0, -1)));
        assert_eq!(board.to_move, Color::White);
        assert_eq!(board.half_move_count, 2);
        assert_eq!(board.full_move_count, 2, "full moves tick after Black");
    }

    #[test]
    fn cloned_board_is_independent() {
        let board = Board::new();
        let mut clone = board.clone();
        clone.apply_move(&Move::new(Cell::new(0, 2), Cell::new(0, 1)));
        assert_eq!(
            board.get(Cell::new(0, 2)).map(|p| p.kind),
            Some(PieceKind::Pawn)
        );
        assert_eq!(board.to_move, Color::White);
        assert_ne!(board, clone);
    }

    #[test]
    fn queen_slides_until_blocked() {
        let mut board = Board::empty();
        board.set(Cell::new(0, 0), Piece::new(PieceKind::Queen, Color::White));
        board.set(Cell::new(4, 0), Piece::new(PieceKind::King, Color::White));

        let slide = Move::new(Cell::new(0, 0), Cell::new(0, -3));
        assert!(board.is_move_legal(&slide));

        board.set(Cell::new(0, -1), Piece::new(PieceKind::Pawn, Color::White));
        assert!(!board.is_move_legal(&slide), "own pawn blocks the file");
    }

    #[test]
    fn pawn_captures_straight_forward() {
        let mut board = kings_only();
        board.set(Cell::new(0, 2), Piece::new(PieceKind::Pawn, Color::White));
        board.set(Cell::new(0, 1), Piece::new(PieceKind::Pawn, Color::Black));

        let capture = Move::new(Cell::new(0, 2), Cell::new(0, 1));
        assert!(board.is_move_legal(&capture));

        let mut after = board.clone();
        after.apply_move(&capture);
        let taken = after.get(Cell::new(0, 1)).unwrap();
        assert_eq!((taken.kind, taken.color), (PieceKind::Pawn, Color::White));
    }

    #[test]
    fn pawn_captures_diagonally_forward() {
        let mut board = kings_only();
        board.set(Cell::new(0, 2), Piece::new(PieceKind::Pawn, Color::White));
        board.set(Cell::new(1, 1), Piece::new(PieceKind::Pawn, Color::Black));
        assert!(board.is_move_legal(&Move::new(Cell::new(0, 2), Cell::new(1, 1))));
    }

    #[test]
    fn pawn_has_no_double_advance() {
        let mut board = kings_only();
        board.set(Cell::new(0, 2), Piece::new(PieceKind::Pawn, Color::White));
        assert!(!board.is_move_legal(&Move::new(Cell::new(0, 2), Cell::new(0, 0))));
    }

    #[test]
    fn pawn_cannot_capture_empty_diagonal() {
        let mut board = kings_only();
        board.set(Cell::new(0, 2), Piece::new(PieceKind::Pawn, Color::White));
        assert!(!board.is_move_legal(&Move::new(Cell::new(0, 2), Cell::new(1, 1))));
        assert!(!board.is_move_legal(&Move::new(Cell::new(0, 2), Cell::new(-1, 2))));
    }

    #[test]
    fn knight_leaps_over_pieces() {
        let mut board = kings_only();
        board.set(Cell::new(0, 0), Piece::new(PieceKind::Knight, Color::White));
        for dir in DIRECTIONS {
            board.set(
                Cell::new(0, 0).step(dir),
                Piece::new(PieceKind::Pawn, Color::White),
            );
        }

        assert!(board.is_move_legal(&Move::new(Cell::new(0, 0), Cell::new(1, -2))));
        assert!(
            !board.is_move_legal(&Move::new(Cell::new(0, 0), Cell::new(1, 0))),
            "adjacent cells are not knight destinations"
        );
    }

    #[test]
    fn lance_variants_ride_different_diagonals() {
        let mut board = kings_only();
        board.set(Cell::new(0, 2), Piece::lance(Color::White, LANCE_A));
        let a_targets: Vec<Cell> = board
            .generate_pseudo_legal_moves()
            .into_iter()
            .filter(|m| m.from == Cell::new(0, 2))
            .map(|m| m.to)
            .collect();
        assert!(
            a_targets.contains(&Cell::new(0, -2)),
            "lance A rides the N axis"
        );
        assert!(
            !a_targets.contains(&Cell::new(2, 0)),
            "NE is not a lance A line"
        );

        let mut board = kings_only();
        board.set(Cell::new(0, 0), Piece::lance(Color::White, LANCE_B));
        let b_targets: Vec<Cell> = board
            .generate_pseudo_legal_moves()
            .into_iter()
            .filter(|m| m.from == Cell::new(0, 0))
            .map(|m| m.to)
            .collect();
        assert!(
            b_targets.contains(&Cell::new(2, -2)),
            "lance B rides the NE axis"
        );
        assert!(
            !b_targets.contains(&Cell::new(-2, 0)),
            "NW is not a lance B line"
        );
    }

    #[test]
    fn promotion_push_offers_all_four_choices() {
        let mut board = kings_only();
        board.set(Cell::new(3, -3), Piece::new(PieceKind::Pawn, Color::White));

        let promos: Vec<Option<PieceKind>> = board
            .generate_pseudo_legal_moves()
            .into_iter()
            .filter(|m| m.from == Cell::new(3, -3) && m.to == Cell::new(3, -4))
            .map(|m| m.promotion)
            .collect();
        assert_eq!(
            promos,
            vec![
                Some(PieceKind::Queen),
                Some(PieceKind::Lance),
                Some(PieceKind::Chariot),
                Some(PieceKind::Knight),
            ]
        );
    }

    #[test]
    fn promoted_lance_enters_as_variant_a() {
        let mut board = kings_only();
        board.set(Cell::new(3, -3), Piece::new(PieceKind::Pawn, Color::White));

        let promo = Move::promoting(Cell::new(3, -3), Cell::new(3, -4), PieceKind::Lance);
        assert!(board.is_move_legal(&promo));
        board.apply_move(&promo);
        let lance = board.get(Cell::new(3, -4)).unwrap();
        assert_eq!((lance.kind, lance.variant), (PieceKind::Lance, LANCE_A));
    }

    #[test]
    fn promotion_rank_push_requires_a_choice() {
        let mut board = kings_only();
        board.set(Cell::new(3, -3), Piece::new(PieceKind::Pawn, Color::White));

        let bare = Move::new(Cell::new(3, -3), Cell::new(3, -4));
        assert!(!board.is_move_legal(&bare));
    }

    #[test]
    fn white_pawn_attacks_forward_and_diagonals() {
        let mut board = Board::empty();
        board.set(Cell::new(0, 0), Piece::new(PieceKind::Pawn, Color::White));

        assert!(board.is_cell_attacked(Cell::new(0, -1), Color::White)); // N
        assert!(board.is_cell_attacked(Cell::new(1, -1), Color::White)); // NE
        assert!(board.is_cell_attacked(Cell::new(-1, 0), Color::White)); // NW
        assert!(
            !board.is_cell_attacked(Cell::new(0, 1), Color::White),
            "pawns never attack backward"
        );
    }

    #[test]
    fn blocked_rider_does_not_attack_through() {
        let mut board = Board::empty();
        board.set(Cell::new(0, 3), Piece::new(PieceKind::Queen, Color::White));
        board.set(Cell::new(0, 1), Piece::new(PieceKind::Pawn, Color::White));
        assert!(board.is_cell_attacked(Cell::new(0, 1), Color::White));
        assert!(!board.is_cell_attacked(Cell::new(0, 0), Color::White));
    }

    #[test]
    fn legal_moves_are_a_subset_that_keeps_the_king_safe() {
        let board = Board::new();
        let pseudo = board.generate_pseudo_legal_moves();
        let legal = board.generate_legal_moves();
        assert!(!legal.is_empty());
        for m in &legal {
            assert!(pseudo.contains(m));
            let mut clone = board.clone();
            clone.apply_move(m);
            assert!(
                !clone.is_in_check(board.to_move),
                "{m} leaves the king in check"
            );
        }
    }

    #[test]
    fn pinned_chariot_has_pseudo_moves_but_no_legal_ones() {
        let mut board = Board::empty();
        board.set(Cell::new(0, 2), Piece::new(PieceKind::King, Color::White));
        board.set(Cell::new(0, 0), Piece::new(PieceKind::Chariot, Color::White));
        board.set(Cell::new(0, -2), Piece::new(PieceKind::Queen, Color::Black));
        board.set(Cell::new(0, -4), Piece::new(PieceKind::King, Color::Black));

        let pseudo = board.generate_pseudo_legal_moves();
        assert!(pseudo.iter().any(|m| m.from == Cell::new(0, 0)));

        let legal = board.generate_legal_moves();
        assert!(
            legal.iter().all(|m| m.from != Cell::new(0, 0)),
            "the chariot is pinned on a file it cannot ride"
        );
    }

    #[test]
    fn is_move_legal_rejects_bad_submissions() {
        let board = Board::new();
        // No piece at the source.
        assert!(!board.is_move_legal(&Move::new(Cell::new(0, 0), Cell::new(0, 1))));
        // Opponent's piece.
        assert!(!board.is_move_legal(&Move::new(Cell::new(0, -2), Cell::new(0, -1))));
        // Off-board cells.
        assert!(!board.is_move_legal(&Move::new(Cell::new(5, 0), Cell::new(4, 0))));
        assert!(!board.is_move_legal(&Move::new(Cell::new(0, 2), Cell::new(3, 3))));
        // Not a pawn pattern.
        assert!(!board.is_move_legal(&Move::new(Cell::new(0, 2), Cell::new(1, 2))));
    }

    #[test]
    fn cornered_king_is_checkmated() {
        let mut board = Board::empty();
        board.set(Cell::new(0, -4), Piece::new(PieceKind::King, Color::Black));
        board.set(Cell::new(0, -3), Piece::new(PieceKind::Queen, Color::White));
        board.set(Cell::new(0, -2), Piece::new(PieceKind::King, Color::White));
        board.to_move = Color::Black;

        assert!(board.is_in_check(Color::Black));
        assert!(board.is_checkmate());
        assert!(!board.is_stalemate());
        assert!(board.is_game_over());
    }

    #[test]
    fn cornered_king_with_no_check_is_stalemated() {
        let mut board = Board::empty();
        board.set(Cell::new(0, -4), Piece::new(PieceKind::King, Color::Black));
        board.set(Cell::new(-1, -2), Piece::new(PieceKind::Queen, Color::White));
        board.set(Cell::new(0, 4), Piece::new(PieceKind::King, Color::White));
        board.to_move = Color::Black;

        assert!(!board.is_in_check(Color::Black));
        assert!(board.is_stalemate());
        assert!(!board.is_checkmate());
        assert!(board.is_game_over());
    }
}

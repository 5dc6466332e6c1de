// =============================================================================
// Endgame tablebases
//
// Perfect play for endings with at most one piece besides the kings:
// KvK, KQvK, KLvK, KCvK and KNvK. Each table is built once by retrograde
// analysis — terminal positions are seeded, then a fixed-point sweep labels
// positions Win/Loss from their successors, and whatever the fixed point
// cannot decide is a draw. Lookups are keyed by a fixed-seed Zobrist hash so
// every run produces identical tables.
// =============================================================================

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::board::Board;
use crate::engine::{DRAW, MATE};
use crate::hex::{all_cells, Cell, BOARD_RADIUS, BOARD_SIZE};
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceKind, LANCE_A, LANCE_B};

/// Entry budget per table. KLvK is the largest space: both lance variants
/// times both owning colors.
pub const DEFAULT_TABLE_CAPACITY: usize = 2_000_000;

/// Safety cap on fixed-point sweeps; the loop exits as soon as a sweep
/// resolves nothing.
const MAX_SWEEPS: usize = 200;

// =============================================================================
// Zobrist hashing
// =============================================================================

const ZOBRIST_SEED: u64 = 0x1234_5678_ABCD_EF01;

fn xorshift64(state: &mut u64) -> u64 {
    *state ^= *state << 13;
    *state ^= *state >> 17;
    *state ^= *state << 5;
    *state
}

struct ZobristKeys {
    // [q + R][r + R][kind][color][variant]; the variant axis keeps the two
    // lances from colliding.
    piece: [[[[[u64; 2]; 2]; 6]; BOARD_SIZE]; BOARD_SIZE],
    side: u64,
}

lazy_static! {
    static ref ZOBRIST: ZobristKeys = {
        let mut state = ZOBRIST_SEED;
        let mut piece = [[[[[0u64; 2]; 2]; 6]; BOARD_SIZE]; BOARD_SIZE];
        for per_q in piece.iter_mut() {
            for per_r in per_q.iter_mut() {
                for per_kind in per_r.iter_mut() {
                    for per_color in per_kind.iter_mut() {
                        for key in per_color.iter_mut() {
                            *key = xorshift64(&mut state);
                        }
                    }
                }
            }
        }
        let side = xorshift64(&mut state);
        ZobristKeys { piece, side }
    };
}

fn piece_key(cell: Cell, piece: Piece) -> u64 {
    debug_assert!(piece.variant <= 1);
    let qi = (cell.q + BOARD_RADIUS) as usize;
    let ri = (cell.r + BOARD_RADIUS) as usize;
    ZOBRIST.piece[qi][ri][piece.kind as usize][piece.color as usize][piece.variant as usize]
}

/// Position fingerprint: XOR of one key per occupied cell, plus the side key
/// when Black is to move. Deterministic across runs.
pub fn position_hash(board: &Board) -> u64 {
    let mut hash = 0;
    for cell in all_cells() {
        if let Some(p) = board.get(cell) {
            hash ^= piece_key(cell, p);
        }
    }
    if board.to_move == Color::Black {
        hash ^= ZOBRIST.side;
    }
    hash
}

/// Hash of the position after `m`, derived by XOR deltas from the current
/// hash. Agrees with recomputing `position_hash` on the moved board.
fn hash_after_move(board: &Board, hash: u64, m: &Move) -> u64 {
    let mut piece = match board.get(m.from) {
        Some(p) => p,
        None => return hash,
    };
    let mut hash = hash ^ piece_key(m.from, piece);
    if let Some(captured) = board.get(m.to) {
        hash ^= piece_key(m.to, captured);
    }
    if let Some(kind) = m.promotion {
        piece.kind = kind;
        if kind == PieceKind::Lance {
            piece.variant = LANCE_A;
        }
    }
    hash ^= piece_key(m.to, piece);
    hash ^ ZOBRIST.side
}

// =============================================================================
// Configurations
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TablebaseConfig {
    KvK,
    KQvK,
    KLvK,
    KCvK,
    KNvK,
}

pub const TABLEBASE_CONFIGS: [TablebaseConfig; 5] = [
    TablebaseConfig::KvK,
    TablebaseConfig::KQvK,
    TablebaseConfig::KLvK,
    TablebaseConfig::KCvK,
    TablebaseConfig::KNvK,
];

impl TablebaseConfig {
    pub fn name(self) -> &'static str {
        match self {
            TablebaseConfig::KvK => "KvK",
            TablebaseConfig::KQvK => "KQvK",
            TablebaseConfig::KLvK => "KLvK",
            TablebaseConfig::KCvK => "KCvK",
            TablebaseConfig::KNvK => "KNvK",
        }
    }

    fn piece_kind(self) -> Option<PieceKind> {
        match self {
            TablebaseConfig::KvK => None,
            TablebaseConfig::KQvK => Some(PieceKind::Queen),
            TablebaseConfig::KLvK => Some(PieceKind::Lance),
            TablebaseConfig::KCvK => Some(PieceKind::Chariot),
            TablebaseConfig::KNvK => Some(PieceKind::Knight),
        }
    }
}

/// Classifies a position by its non-King census, ignoring piece color:
/// bare kings select KvK, a single queen/lance/chariot/knight of either
/// color selects the matching table, everything else is unsupported.
pub fn detect_config(board: &Board) -> Option<TablebaseConfig> {
    let mut count = 0;
    let mut kind = None;
    for cell in all_cells() {
        if let Some(p) = board.get(cell) {
            if p.kind == PieceKind::King {
                continue;
            }
            count += 1;
            kind = Some(p.kind);
        }
    }

    match (count, kind) {
        (0, _) => Some(TablebaseConfig::KvK),
        (1, Some(PieceKind::Queen)) => Some(TablebaseConfig::KQvK),
        (1, Some(PieceKind::Lance)) => Some(TablebaseConfig::KLvK),
        (1, Some(PieceKind::Chariot)) => Some(TablebaseConfig::KCvK),
        (1, Some(PieceKind::Knight)) => Some(TablebaseConfig::KNvK),
        _ => None,
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Win/Draw/Loss from the side-to-move's viewpoint.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Wdl {
    Unknown,
    Win,
    Draw,
    Loss,
}

#[derive(Clone, Copy, Debug)]
pub struct TablebaseEntry {
    pub wdl: Wdl,
    /// Plies to mate: 0 at the position being mated, -1 for draws.
    pub dtm: i32,
    /// Stored only for winning positions.
    pub best_move: Option<Move>,
}

#[derive(Clone, Copy, Debug)]
pub struct ProbeResult {
    pub wdl: Wdl,
    pub dtm: i32,
    pub best_move: Option<Move>,
    pub config: TablebaseConfig,
}

pub struct Tablebase {
    config: TablebaseConfig,
    entries: HashMap<(u64, Color), TablebaseEntry>,
    capacity: usize,
    generated: bool,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl Tablebase {
    fn new(config: TablebaseConfig, capacity: usize) -> Tablebase {
        Tablebase {
            config,
            entries: HashMap::new(),
            capacity,
            generated: false,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    /// Insertion fails silently once the capacity is reached; tables should
    /// be sized so this never happens.
    fn insert(&mut self, hash: u64, side: Color, entry: TablebaseEntry) -> bool {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&(hash, side)) {
            debug_assert!(false, "{} tablebase over capacity", self.config.name());
            return false;
        }
        match entry.wdl {
            Wdl::Win => self.wins += 1,
            Wdl::Draw => self.draws += 1,
            Wdl::Loss => self.losses += 1,
            Wdl::Unknown => {}
        }
        self.entries.insert((hash, side), entry);
        true
    }

    fn get(&self, hash: u64, side: Color) -> Option<&TablebaseEntry> {
        self.entries.get(&(hash, side))
    }

    pub fn config(&self) -> TablebaseConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// `(wins, draws, losses)` over all stored entries.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.wins, self.draws, self.losses)
    }
}

#[derive(Clone, Copy, Default, Debug, serde::Serialize)]
pub struct TablebaseStats {
    pub total_entries: usize,
    pub total_wins: usize,
    pub total_draws: usize,
    pub total_losses: usize,
    pub tables_generated: usize,
}

// =============================================================================
// Generation (retrograde analysis)
// =============================================================================

fn kings_placement_legal(wk: Cell, bk: Cell) -> bool {
    wk != bk && wk.distance(bk) > 1
}

/// The side that is *not* to move may not be in check.
fn position_legal(board: &Board) -> bool {
    !board.is_in_check(board.to_move.opposite())
}

/// Checkmate is a loss at distance 0 for the side to move; stalemate is a
/// draw. Non-terminal positions return None.
fn terminal_outcome(board: &Board) -> Option<(Wdl, i32)> {
    if !board.generate_legal_moves().is_empty() {
        return None;
    }
    if board.is_in_check(board.to_move) {
        Some((Wdl::Loss, 0))
    } else {
        Some((Wdl::Draw, -1))
    }
}

/// Bare kings can never mate: every legal KvK position is recorded as a draw,
/// stalemates included.
fn generate_kvk(table: &mut Tablebase) {
    let cells: Vec<Cell> = all_cells().collect();

    for &wk in &cells {
        for &bk in &cells {
            if !kings_placement_legal(wk, bk) {
                continue;
            }
            let mut board = Board::empty();
            board.set(wk, Piece::new(PieceKind::King, Color::White));
            board.set(bk, Piece::new(PieceKind::King, Color::Black));

            for side in [Color::White, Color::Black] {
                board.to_move = side;
                if !position_legal(&board) {
                    continue;
                }
                table.insert(
                    position_hash(&board),
                    side,
                    TablebaseEntry {
                        wdl: Wdl::Draw,
                        dtm: -1,
                        best_move: None,
                    },
                );
            }
        }
    }
}

/// A still-undecided position in the worklist; the board is rebuilt on
/// demand to keep the list small.
#[derive(Clone, Copy)]
struct PendingPosition {
    white_king: Cell,
    black_king: Cell,
    piece_cell: Cell,
    piece: Piece,
    to_move: Color,
    hash: u64,
}

impl PendingPosition {
    fn board(&self) -> Board {
        let mut board = Board::empty();
        board.set(self.white_king, Piece::new(PieceKind::King, Color::White));
        board.set(self.black_king, Piece::new(PieceKind::King, Color::Black));
        board.set(self.piece_cell, self.piece);
        board.to_move = self.to_move;
        board
    }
}

/// King + one piece vs king, the piece taken in both colors (and both
/// variants for lances).
fn generate_kpvk(table: &mut Tablebase, kind: PieceKind) {
    let cells: Vec<Cell> = all_cells().collect();
    let variants: &[u8] = if kind == PieceKind::Lance {
        &[LANCE_A, LANCE_B]
    } else {
        &[0]
    };

    let mut pending: Vec<PendingPosition> = Vec::new();

    // Phase 1: enumerate every legal placement; record terminal outcomes and
    // queue the rest for relaxation.
    for &wk in &cells {
        for &bk in &cells {
            if !kings_placement_legal(wk, bk) {
                continue;
            }
            for &pc in &cells {
                if pc == wk || pc == bk {
                    continue;
                }
                for owner in [Color::White, Color::Black] {
                    for &variant in variants {
                        let piece = Piece {
                            kind,
                            color: owner,
                            variant,
                        };
                        let mut board = Board::empty();
                        board.set(wk, Piece::new(PieceKind::King, Color::White));
                        board.set(bk, Piece::new(PieceKind::King, Color::Black));
                        board.set(pc, piece);

                        for side in [Color::White, Color::Black] {
                            board.to_move = side;
                            if !position_legal(&board) {
                                continue;
                            }
                            let hash = position_hash(&board);
                            if let Some((wdl, dtm)) = terminal_outcome(&board) {
                                table.insert(
                                    hash,
                                    side,
                                    TablebaseEntry {
                                        wdl,
                                        dtm,
                                        best_move: None,
                                    },
                                );
                            } else {
                                pending.push(PendingPosition {
                                    white_king: wk,
                                    black_king: bk,
                                    piece_cell: pc,
                                    piece,
                                    to_move: side,
                                    hash,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    log::debug!(
        "{}: {} terminal seeds, {} positions to relax",
        table.config.name(),
        table.len(),
        pending.len()
    );

    // Phase 2: fixed-point backward induction. A position is a win as soon as
    // any successor is a known loss for the opponent (fastest mate kept), a
    // loss once every successor is a known opponent win (slowest mate kept).
    let mut sweep = 0;
    while sweep < MAX_SWEEPS && !pending.is_empty() {
        sweep += 1;
        let mut still_pending = Vec::with_capacity(pending.len());
        let mut resolved = 0usize;

        for pos in pending {
            let board = pos.board();
            let opponent = pos.to_move.opposite();
            let moves = board.generate_legal_moves();

            let mut winning: Option<(i32, Move)> = None;
            let mut all_moves_lose = true;
            let mut max_loss_dtm = 0;

            for m in &moves {
                let successor = hash_after_move(&board, pos.hash, m);
                match table.get(successor, opponent) {
                    Some(entry) if entry.wdl == Wdl::Loss => {
                        let dtm = entry.dtm + 1;
                        if winning.map_or(true, |(best, _)| dtm < best) {
                            winning = Some((dtm, *m));
                        }
                    }
                    Some(entry) if entry.wdl == Wdl::Win => {
                        max_loss_dtm = max_loss_dtm.max(entry.dtm);
                    }
                    // A drawn or still-undecided successor rules out a
                    // forced loss here.
                    _ => all_moves_lose = false,
                }
            }

            if let Some((dtm, m)) = winning {
                table.insert(
                    pos.hash,
                    pos.to_move,
                    TablebaseEntry {
                        wdl: Wdl::Win,
                        dtm,
                        best_move: Some(m),
                    },
                );
                resolved += 1;
            } else if all_moves_lose && !moves.is_empty() {
                table.insert(
                    pos.hash,
                    pos.to_move,
                    TablebaseEntry {
                        wdl: Wdl::Loss,
                        dtm: max_loss_dtm + 1,
                        best_move: None,
                    },
                );
                resolved += 1;
            } else {
                still_pending.push(pos);
            }
        }

        pending = still_pending;
        log::debug!(
            "{}: sweep {} resolved {}, {} left",
            table.config.name(),
            sweep,
            resolved,
            pending.len()
        );
        if resolved == 0 {
            break;
        }
    }

    // Phase 3: the fixed point cannot improve on these, so they are draws.
    for pos in pending {
        table.insert(
            pos.hash,
            pos.to_move,
            TablebaseEntry {
                wdl: Wdl::Draw,
                dtm: -1,
                best_move: None,
            },
        );
    }
}

// =============================================================================
// Context and probe API
// =============================================================================

/// Owns the five tables. Generation is lazy and idempotent per
/// configuration; dropping the context releases everything.
pub struct Tablebases {
    tables: [Tablebase; 5],
}

impl Default for Tablebases {
    fn default() -> Self {
        Self::new()
    }
}

impl Tablebases {
    pub fn new() -> Tablebases {
        Tablebases::with_capacity(DEFAULT_TABLE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Tablebases {
        Tablebases {
            tables: TABLEBASE_CONFIGS.map(|config| Tablebase::new(config, capacity)),
        }
    }

    pub fn table(&self, config: TablebaseConfig) -> &Tablebase {
        &self.tables[config as usize]
    }

    /// Builds the table for `config` unless it already exists.
    pub fn generate(&mut self, config: TablebaseConfig) {
        let table = &mut self.tables[config as usize];
        if table.generated {
            return;
        }
        log::info!("generating {} tablebase", config.name());
        match config.piece_kind() {
            None => generate_kvk(table),
            Some(kind) => generate_kpvk(table, kind),
        }
        table.generated = true;
        log::info!(
            "{}: {} positions ({} win / {} draw / {} loss)",
            config.name(),
            table.len(),
            table.wins,
            table.draws,
            table.losses
        );
    }

    pub fn generate_all(&mut self) {
        for config in TABLEBASE_CONFIGS {
            self.generate(config);
        }
    }

    /// Looks the position up, generating its table on first use. Returns
    /// None for unsupported configurations or absent entries; a decided
    /// Win/Draw/Loss otherwise.
    pub fn probe(&mut self, board: &Board) -> Option<ProbeResult> {
        let config = detect_config(board)?;
        self.generate(config);

        let table = &self.tables[config as usize];
        let entry = table.get(position_hash(board), board.to_move)?;
        if entry.wdl == Wdl::Unknown {
            return None;
        }
        Some(ProbeResult {
            wdl: entry.wdl,
            dtm: entry.dtm,
            best_move: entry.best_move,
            config,
        })
    }

    /// The probed result as an alpha-beta-comparable score, when available.
    pub fn score(&mut self, board: &Board) -> Option<i32> {
        self.probe(board).map(|p| match p.wdl {
            Wdl::Win => MATE - p.dtm,
            Wdl::Loss => -MATE + p.dtm,
            _ => DRAW,
        })
    }

    /// The stored best move; present only for winning positions.
    pub fn best_move(&mut self, board: &Board) -> Option<Move> {
        self.probe(board).and_then(|p| p.best_move)
    }

    pub fn stats(&self) -> TablebaseStats {
        let mut stats = TablebaseStats::default();
        for table in &self.tables {
            if table.generated {
                stats.total_entries += table.len();
                stats.total_wins += table.wins;
                stats.total_draws += table.draws;
                stats.total_losses += table.losses;
                stats.tables_generated += 1;
            }
        }
        stats
    }

    /// Releases every table; the next probe regenerates on demand.
    pub fn clear(&mut self) {
        for table in &mut self.tables {
            table.entries.clear();
            table.generated = false;
            table.wins = 0;
            table.draws = 0;
            table.losses = 0;
        }
    }
}

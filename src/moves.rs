use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hex::Cell;
use crate::piece::{Color, Piece, PieceKind};

/// The pieces a pawn may promote to, in generation order.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Lance,
    PieceKind::Chariot,
    PieceKind::Knight,
];

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Cell, to: Cell) -> Move {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    pub fn promoting(from: Cell, to: Cell, kind: PieceKind) -> Move {
        Move {
            from,
            to,
            promotion: Some(kind),
        }
    }
}

#[derive(Error, PartialEq, Eq, Debug)]
pub enum ParseMoveError {
    #[error("expected `q1,r1 q2,r2`, `q1,r1,q2,r2` or `q1,r1 q2,r2 X`, got `{0}`")]
    Malformed(String),
    #[error("bad coordinate `{0}`")]
    BadCoordinate(String),
    #[error("unknown promotion piece `{0}` (expected Q, L, C or N)")]
    BadPromotion(String),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Accepts `"q1,r1 q2,r2"`, `"q1,r1,q2,r2"` and `"q1,r1 q2,r2 X"` where
    /// X is a promotion letter, case-insensitive.
    fn from_str(s: &str) -> Result<Move, ParseMoveError> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [all] => {
                let parts: Vec<&str> = all.split(',').collect();
                if parts.len() != 4 {
                    return Err(ParseMoveError::Malformed(s.to_string()));
                }
                Ok(Move::new(
                    parse_cell(parts[0], parts[1])?,
                    parse_cell(parts[2], parts[3])?,
                ))
            }
            [from, to] => Ok(Move::new(parse_pair(from)?, parse_pair(to)?)),
            [from, to, promo] => Ok(Move {
                from: parse_pair(from)?,
                to: parse_pair(to)?,
                promotion: Some(parse_promotion(promo)?),
            }),
            _ => Err(ParseMoveError::Malformed(s.to_string())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", Piece::new(kind, Color::White).glyph())?;
        }
        Ok(())
    }
}

fn parse_pair(token: &str) -> Result<Cell, ParseMoveError> {
    let parts: Vec<&str> = token.split(',').collect();
    if parts.len() != 2 {
        return Err(ParseMoveError::Malformed(token.to_string()));
    }
    parse_cell(parts[0], parts[1])
}

fn parse_cell(q: &str, r: &str) -> Result<Cell, ParseMoveError> {
    let q = q
        .parse::<i8>()
        .map_err(|_| ParseMoveError::BadCoordinate(q.to_string()))?;
    let r = r
        .parse::<i8>()
        .map_err(|_| ParseMoveError::BadCoordinate(r.to_string()))?;
    Ok(Cell::new(q, r))
}

fn parse_promotion(token: &str) -> Result<PieceKind, ParseMoveError> {
    let mut chars = token.chars();
    let kind = match (chars.next(), chars.next()) {
        (Some(c), None) => match c.to_ascii_uppercase() {
            'Q' => Some(PieceKind::Queen),
            'L' => Some(PieceKind::Lance),
            'C' => Some(PieceKind::Chariot),
            'N' => Some(PieceKind::Knight),
            _ => None,
        },
        _ => None,
    };
    kind.ok_or_else(|| ParseMoveError::BadPromotion(token.to_string()))
}

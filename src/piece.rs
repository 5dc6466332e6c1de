use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum PieceKind {
    Pawn,
    Knight,
    Lance,
    Chariot,
    Queen,
    King,
}

/// Lance variants: A rides {N, S, NW, SE}, B rides {N, S, NE, SW}.
pub const LANCE_A: u8 = 0;
pub const LANCE_B: u8 = 1;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    /// Meaningful only for lances; 0 everywhere else.
    pub variant: u8,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece {
            kind,
            color,
            variant: 0,
        }
    }

    pub fn lance(color: Color, variant: u8) -> Piece {
        Piece {
            kind: PieceKind::Lance,
            color,
            variant,
        }
    }

    /// Display glyph: uppercase for White, lowercase for Black.
    pub fn glyph(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Lance => 'L',
            PieceKind::Chariot => 'C',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        };
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_follow_color_case() {
        assert_eq!(Piece::new(PieceKind::Queen, Color::White).glyph(), 'Q');
        assert_eq!(Piece::new(PieceKind::Queen, Color::Black).glyph(), 'q');
        assert_eq!(Piece::new(PieceKind::Pawn, Color::White).glyph(), 'P');
        assert_eq!(Piece::lance(Color::Black, LANCE_B).glyph(), 'l');
    }

    #[test]
    fn lance_constructor_keeps_variant() {
        let a = Piece::lance(Color::White, LANCE_A);
        let b = Piece::lance(Color::White, LANCE_B);
        assert_eq!(a.variant, 0);
        assert_eq!(b.variant, 1);
        assert_ne!(a, b);
    }
}

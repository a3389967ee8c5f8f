use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{Bishop, King, Knight, Pawn, Queen, Rook};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceType {
    pub fn is_rook_like(&self) -> bool {
        matches!(self, Queen | Rook)
    }
    /// Letter used in move notation, pawns have none
    pub fn notation_letter(&self) -> Option<char> {
        match self {
            Pawn => None,
            Knight => Some('N'),
            Bishop => Some('B'),
            Rook => Some('R'),
            Queen => Some('Q'),
            King => Some('K'),
        }
    }
}
impl Display for PieceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Pawn => "p",
                Knight => "n",
                Bishop => "b",
                Rook => "r",
                Queen => "q",
                King => "k",
            }
        )
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}
impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            White => Black,
            Black => White,
        }
    }
    /// Row delta of a single pawn push
    pub fn pawn_direction(&self) -> i8 {
        match self {
            White => -1,
            Black => 1,
        }
    }
    pub fn pawn_start_row(&self) -> u8 {
        match self {
            White => 6,
            Black => 1,
        }
    }
    pub fn promotion_row(&self) -> u8 {
        match self {
            White => 0,
            Black => 7,
        }
    }
    /// Row holding the king and rooks at the start of the game
    pub fn home_row(&self) -> u8 {
        match self {
            White => 7,
            Black => 0,
        }
    }
}
impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self == &Black { "b" } else { "w" })
    }
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Piece {
        Piece { piece_type, color }
    }

    /// Reads a FEN letter, uppercase being white
    pub fn from_char(c: char) -> Option<Piece> {
        let piece_type = match c.to_ascii_lowercase() {
            'p' => Pawn,
            'n' => Knight,
            'b' => Bishop,
            'r' => Rook,
            'q' => Queen,
            'k' => King,
            _ => return None,
        };
        let color = if c.is_ascii_lowercase() { Black } else { White };
        Some(Piece { piece_type, color })
    }

    /// The compact two character code, color first ("wK", "bp", ...)
    pub fn code(&self) -> String {
        let kind = match self.piece_type {
            Pawn => 'p',
            other => other.notation_letter().unwrap_or('?'),
        };
        format!("{}{}", self.color, kind)
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = self.piece_type.to_string();
        write!(
            f,
            "{}",
            if self.color == White {
                s.to_uppercase()
            } else {
                s
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_letters() {
        assert_eq!(Piece::from_char('K'), Some(Piece::new(King, White)));
        assert_eq!(Piece::from_char('n'), Some(Piece::new(Knight, Black)));
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::new(Queen, Black).to_string(), "q");
        assert_eq!(Piece::new(Rook, White).to_string(), "R");
    }

    #[test]
    fn compact_codes() {
        assert_eq!(Piece::new(King, White).code(), "wK");
        assert_eq!(Piece::new(Pawn, Black).code(), "bp");
    }

    #[test]
    fn pawn_geometry_is_mirrored() {
        for color in [White, Black] {
            let travelled = color.promotion_row() as i8 - color.pawn_start_row() as i8;
            assert_eq!(travelled, 6 * color.pawn_direction());
            assert_eq!(color.opposite().opposite(), color);
        }
    }
}

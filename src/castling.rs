use crate::piece::Color;
use crate::piece::Color::{Black, White};
use crate::square::Square;
use std::fmt::{Display, Formatter};

/// Four independent rights, one bit each: KQkq from high to low
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);

    pub fn new() -> CastlingRights {
        CastlingRights(0b1111)
    }

    /// Reads the castling field of a FEN string ("KQkq", "Kq", "-", ...)
    pub fn from_fen(s: &str) -> CastlingRights {
        let mut res = CastlingRights::NONE;
        for (letter, side, color) in [
            ('K', CastleSide::KingSide, White),
            ('Q', CastleSide::QueenSide, White),
            ('k', CastleSide::KingSide, Black),
            ('q', CastleSide::QueenSide, Black),
        ] {
            if s.contains(letter) {
                res.0 |= Self::bit(side, color)
            }
        }
        res
    }

    fn bit(side: CastleSide, color: Color) -> u8 {
        match (color, side) {
            (White, CastleSide::KingSide) => 0b1000,
            (White, CastleSide::QueenSide) => 0b0100,
            (Black, CastleSide::KingSide) => 0b0010,
            (Black, CastleSide::QueenSide) => 0b0001,
        }
    }

    /// Returns the (kingside, queenside) castling rights of a given color
    pub fn get(&self, color: Color) -> (bool, bool) {
        (
            self.has(CastleSide::KingSide, color),
            self.has(CastleSide::QueenSide, color),
        )
    }

    pub fn has(&self, side: CastleSide, color: Color) -> bool {
        self.0 & Self::bit(side, color) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Marks the given color as unable to castle on either side
    pub fn uncastle(&mut self, color: Color) {
        self.revoke(CastleSide::KingSide, color);
        self.revoke(CastleSide::QueenSide, color);
    }

    pub fn revoke(&mut self, side: CastleSide, color: Color) {
        self.0 &= !Self::bit(side, color)
    }

    /// A rook of `owner` left (or was captured on) `sq`: if that is one of its
    /// home squares, the matching right is gone for good
    pub fn revoke_for_rook_square(&mut self, owner: Color, sq: Square) {
        for side in [CastleSide::KingSide, CastleSide::QueenSide] {
            if side.rook_origin(owner) == sq {
                self.revoke(side, owner)
            }
        }
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let (wking, wqueen) = self.get(White);
        let (bking, bqueen) = self.get(Black);
        write!(
            f,
            "{}{}{}{}",
            if wking { "K" } else { "" },
            if wqueen { "Q" } else { "" },
            if bking { "k" } else { "" },
            if bqueen { "q" } else { "" }
        )
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the king and the rook start and land for each castle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub fn king_origin(&self, color: Color) -> Square {
        Square::at(color.home_row(), 4)
    }
    pub fn king_target(&self, color: Color) -> Square {
        match self {
            Self::KingSide => Square::at(color.home_row(), 6),
            Self::QueenSide => Square::at(color.home_row(), 2),
        }
    }
    pub fn rook_origin(&self, color: Color) -> Square {
        match self {
            Self::KingSide => Square::at(color.home_row(), 7),
            Self::QueenSide => Square::at(color.home_row(), 0),
        }
    }
    pub fn rook_target(&self, color: Color) -> Square {
        match self {
            Self::KingSide => Square::at(color.home_row(), 5),
            Self::QueenSide => Square::at(color.home_row(), 3),
        }
    }
    /// Identifies a castle from its king destination column
    pub fn from_king_target(target: Square) -> CastleSide {
        if target.col() > 4 {
            Self::KingSide
        } else {
            Self::QueenSide
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_field_round_trip() {
        for field in ["KQkq", "Kq", "k", "-"] {
            assert_eq!(CastlingRights::from_fen(field).to_string(), field);
        }
        assert_eq!(CastlingRights::new(), CastlingRights::from_fen("KQkq"));
    }

    #[test]
    fn rights_are_independent() {
        let mut rights = CastlingRights::new();
        rights.revoke(CastleSide::QueenSide, White);
        assert_eq!(rights.get(White), (true, false));
        assert_eq!(rights.get(Black), (true, true));
        rights.uncastle(Black);
        assert_eq!(rights.get(Black), (false, false));
        assert_eq!(rights.to_string(), "K");
    }

    #[test]
    fn only_home_rook_squares_revoke() {
        let mut rights = CastlingRights::new();
        rights.revoke_for_rook_square(White, Square::at(3, 7));
        assert_eq!(rights, CastlingRights::new());
        rights.revoke_for_rook_square(Black, Square::at(7, 7));
        assert_eq!(rights, CastlingRights::new());
        rights.revoke_for_rook_square(Black, Square::at(0, 7));
        assert_eq!(rights.get(Black), (false, true));
        rights.revoke_for_rook_square(White, Square::at(7, 0));
        assert_eq!(rights.get(White), (true, false));
    }
}

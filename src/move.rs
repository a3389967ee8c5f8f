use crate::castling::CastleSide;
use crate::piece::{Piece, PieceType};
use crate::square::Square;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveFlags {
    Normal,
    /// A pawn reaching the farthest rank, always promoted to a queen
    Promotion,
    EnPassant,
    Castle,
}

/// One ply, recording everything needed to take it back.
/// Moves compare equal when their origin and target squares match.
#[derive(Debug, Copy, Clone)]
pub struct Move {
    origin: Square,
    target: Square,
    moved: Piece,
    captured: Option<Piece>,
    flags: MoveFlags,
}

impl Move {
    /// A regular move or capture. Pawns landing on their promotion row get
    /// flagged as promotions
    pub fn new(origin: Square, target: Square, moved: Piece, captured: Option<Piece>) -> Move {
        let flags = if moved.piece_type == PieceType::Pawn
            && target.row() == moved.color.promotion_row()
        {
            MoveFlags::Promotion
        } else {
            MoveFlags::Normal
        };
        Move {
            origin,
            target,
            moved,
            captured,
            flags,
        }
    }

    /// The captured pawn is the enemy pawn standing next to the origin
    pub fn new_en_passant(origin: Square, target: Square, moved: Piece) -> Move {
        Move {
            origin,
            target,
            moved,
            captured: Some(Piece::new(PieceType::Pawn, moved.color.opposite())),
            flags: MoveFlags::EnPassant,
        }
    }

    /// Castles are recorded as the king's two square step
    pub fn new_castle(origin: Square, target: Square, king: Piece) -> Move {
        Move {
            origin,
            target,
            moved: king,
            captured: None,
            flags: MoveFlags::Castle,
        }
    }

    pub fn origin(&self) -> Square {
        self.origin
    }
    pub fn target(&self) -> Square {
        self.target
    }
    pub fn moved_piece(&self) -> Piece {
        self.moved
    }
    pub fn captured_piece(&self) -> Option<Piece> {
        self.captured
    }
    pub fn flags(&self) -> MoveFlags {
        self.flags
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
    pub fn is_promotion(&self) -> bool {
        self.flags == MoveFlags::Promotion
    }
    pub fn is_en_passant(&self) -> bool {
        self.flags == MoveFlags::EnPassant
    }
    pub fn is_castle(&self) -> bool {
        self.flags == MoveFlags::Castle
    }

    pub fn castle_side(&self) -> Option<CastleSide> {
        if self.is_castle() {
            Some(CastleSide::from_king_target(self.target))
        } else {
            None
        }
    }

    /// Square of the pawn removed by an en passant capture:
    /// the mover's origin row, the target's column
    pub fn en_passant_victim(&self) -> Square {
        Square::at(self.origin.row(), self.target.col())
    }

    /// Collision free fingerprint of the four coordinates
    /// ```
    /// use warden::{Move, Piece, PieceType, Color, square::Square};
    /// let pawn = Piece::new(PieceType::Pawn, Color::White);
    /// let e2 = Square::new(6, 4).unwrap();
    /// let e4 = Square::new(4, 4).unwrap();
    /// assert_eq!(Move::new(e2, e4, pawn, None).id(), 6444);
    /// ```
    pub fn id(&self) -> u16 {
        self.origin.row() as u16 * 1000
            + self.origin.col() as u16 * 100
            + self.target.row() as u16 * 10
            + self.target.col() as u16
    }

    /// Short algebraic notation, without check markers or disambiguation
    pub fn notation(&self) -> String {
        if let Some(side) = self.castle_side() {
            return String::from(match side {
                CastleSide::KingSide => "0-0",
                CastleSide::QueenSide => "0-0-0",
            });
        }

        let mut s = match self.moved.piece_type.notation_letter() {
            Some(letter) => letter.to_string(),
            None if self.is_capture() => self.origin.file_char().to_string(),
            None => String::new(),
        };
        if self.is_capture() {
            s.push('x');
        }
        s.push_str(&self.target.to_string());
        match self.flags {
            MoveFlags::Promotion => s.push('Q'),
            MoveFlags::EnPassant => s.push_str(" e.p."),
            _ => (),
        }
        s
    }

    /// Parses a move formatted in long algebraic notation ("e2e4", "e7e8q").
    /// Flags can't be inferred from text alone, so only the squares are returned
    pub fn parse(mv: &str) -> Option<(Square, Square)> {
        if !(4..=5).contains(&mv.len()) || !mv.is_ascii() {
            return None;
        }
        let origin = Square::parse(&mv[0..2])?;
        let target = Square::parse(&mv[2..4])?;
        match &mv[4..] {
            "" | "q" | "Q" => Some((origin, target)),
            _ => None,
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
impl Eq for Move {}
impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}

/// Long algebraic notation, the format `parse` reads back
impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_promotion() {
            write!(f, "{}{}q", self.origin, self.target)
        } else {
            write!(f, "{}{}", self.origin, self.target)
        }
    }
}

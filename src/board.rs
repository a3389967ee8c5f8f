use crate::error::ChessError;
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;
use std::fmt::{Display, Formatter};

pub const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// The 8x8 grid, nothing more. Game rules live in `GameState`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub const EMPTY: Board = Board {
        cells: [[None; 8]; 8],
    };

    /// The standard initial position
    pub fn standard() -> Board {
        let mut b = Board::EMPTY;
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for color in [Color::White, Color::Black] {
            for (col, piece_type) in back_rank.iter().enumerate() {
                b.cells[color.home_row() as usize][col] = Some(Piece::new(*piece_type, color));
                b.cells[color.pawn_start_row() as usize][col] =
                    Some(Piece::new(PieceType::Pawn, color));
            }
        }
        b
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.row() as usize][sq.col() as usize]
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.get(sq).map(|p| p.color)
    }

    /// Places a piece on a given square, overwriting whatever was there
    pub fn add_piece(&mut self, piece: Piece, sq: Square) {
        self.cells[sq.row() as usize][sq.col() as usize] = Some(piece);
    }

    /// Clears the given square, returning the piece that has been removed if any
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.row() as usize][sq.col() as usize].take()
    }

    /// Sets the content of a square, returning its previous content
    pub fn replace(&mut self, sq: Square, content: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.cells[sq.row() as usize][sq.col() as usize], content)
    }

    /// Every occupied square holding a piece of the given color
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }

    /// Finds the king of a given color by scanning the grid.
    /// `GameState` caches this, the scan is the reference it must agree with
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, p)| p.piece_type == PieceType::King)
            .map(|(sq, _)| sq)
    }

    /*
    FEN PLACEMENT
     */
    pub fn from_fen_placement(placement: &str) -> Result<Board, ChessError> {
        let bad = || ChessError::InvalidFen(placement.to_string());
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(bad());
        }

        let mut b = Board::EMPTY;
        for (row, description) in rows.iter().enumerate() {
            let mut col = 0usize;
            for c in description.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or_else(bad)?;
                    if col >= 8 {
                        return Err(bad());
                    }
                    b.cells[row][col] = Some(piece);
                    col += 1;
                }
            }
            if col != 8 {
                return Err(bad());
            }
        }
        Ok(b)
    }

    pub fn fen_placement(&self) -> String {
        let mut fen = String::new();
        for (row, cells) in self.cells.iter().enumerate() {
            let mut empty_counter = 0;
            for cell in cells {
                match cell {
                    Some(p) => {
                        if empty_counter != 0 {
                            fen.push_str(&empty_counter.to_string())
                        }
                        empty_counter = 0;
                        fen.push_str(&p.to_string())
                    }
                    None => empty_counter += 1,
                }
            }
            if empty_counter != 0 {
                fen.push_str(&empty_counter.to_string())
            }
            if row != 7 {
                fen.push('/')
            }
        }
        fen
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            let mut line = format!("{} ", 8 - row);
            for cell in cells {
                match cell {
                    None => line.push_str(". "),
                    Some(p) => line.push_str(&(p.to_string() + " ")),
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_board_matches_start_placement() {
        let b = Board::standard();
        assert_eq!(b.fen_placement(), START_PLACEMENT);
        assert_eq!(Board::from_fen_placement(START_PLACEMENT), Ok(b));
        assert_eq!(b.find_king(Color::White), Some(Square::at(7, 4)));
        assert_eq!(b.find_king(Color::Black), Some(Square::at(0, 4)));
        assert_eq!(b.pieces(Color::White).count(), 16);
    }

    #[test]
    fn placement_round_trip() {
        let placement = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R";
        let b = Board::from_fen_placement(placement).unwrap();
        assert_eq!(b.fen_placement(), placement);
        assert_eq!(
            b.get(Square::at(3, 3)),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );
    }

    #[test]
    fn rejects_malformed_placement() {
        assert!(Board::from_fen_placement("8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen_placement("9/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen_placement("ppppppppp/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen_placement("x7/8/8/8/8/8/8/8").is_err());
    }

    #[test]
    fn add_and_remove() {
        let mut b = Board::EMPTY;
        let e4 = Square::at(4, 4);
        let knight = Piece::new(PieceType::Knight, Color::Black);
        b.add_piece(knight, e4);
        assert_eq!(b.color_on(e4), Some(Color::Black));
        assert_eq!(b.replace(e4, None), Some(knight));
        assert!(b.is_empty(e4));
        assert_eq!(b.remove_piece(e4), None);
    }
}

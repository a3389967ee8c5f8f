use crate::error::ChessError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A square of the 8x8 board.
/// Rows go top to bottom starting from Black's back rank (row 0 is rank 8),
/// columns go left to right starting from White's queenside (col 0 is the a-file).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

/// A step between two squares, as (row delta, col delta)
pub type Direction = (i8, i8);

impl Square {
    /// Builds a square from possibly out of range coordinates
    /// ```
    /// use warden::square::Square;
    /// assert!(Square::new(7, 4).is_some());
    /// assert!(Square::new(8, 0).is_none());
    /// assert!(Square::new(0, -1).is_none());
    /// ```
    pub fn new(row: i32, col: i32) -> Option<Square> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    /// Same as `new`, for coordinates coming from outside the engine
    pub fn try_new(row: i32, col: i32) -> Result<Square, ChessError> {
        Self::new(row, col).ok_or(ChessError::SquareOutOfRange { row, col })
    }

    /// Only used for compile time constants, where coordinates are known to be valid
    pub(crate) const fn at(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    pub fn row(&self) -> u8 {
        self.row
    }
    pub fn col(&self) -> u8 {
        self.col
    }

    /// The square reached by stepping `dr` rows and `dc` columns, if still on the board
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        Self::new(self.row as i32 + dr as i32, self.col as i32 + dc as i32)
    }

    /// The square `distance` steps away along `direction`
    pub fn step(&self, direction: Direction, distance: i8) -> Option<Square> {
        self.offset(direction.0 * distance, direction.1 * distance)
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.col) as char
    }
    pub fn rank_char(&self) -> char {
        (b'8' - self.row) as char
    }

    /// Every square, row by row from the top left corner
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }

    /// Parses a square from a given string slice,
    /// only caring that the first two characters form a valid square representation
    /// ```
    /// use warden::square::Square;
    /// assert_eq!(Square::parse("e4"), Square::new(4, 4));
    /// assert_eq!(Square::parse("d2someotherstuff"), Square::new(6, 3));
    /// assert_eq!(Square::parse("randoma1stuff"), None);
    /// assert_eq!(Square::parse("k9"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let col = match chars.next()? {
            c @ 'a'..='h' => c as i32 - 'a' as i32,
            _ => return None,
        };
        let rank = match chars.next()?.to_digit(10) {
            Some(i) if (1..=8).contains(&i) => i as i32,
            _ => return None,
        };
        Self::new(8 - rank, col)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        Self::parse(s).ok_or_else(|| ChessError::InvalidSquare(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representation_matches_board_orientation() {
        assert_eq!(Square::at(7, 0).to_string(), "a1");
        assert_eq!(Square::at(0, 7).to_string(), "h8");
        assert_eq!(Square::at(4, 4).to_string(), "e4");
        assert_eq!("g1".parse::<Square>(), Ok(Square::at(7, 6)));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert_eq!(
            Square::try_new(3, 8),
            Err(ChessError::SquareOutOfRange { row: 3, col: 8 })
        );
        assert!(matches!("e44".parse::<Square>(), Err(ChessError::InvalidSquare(_))));
        assert!(matches!("i1".parse::<Square>(), Err(ChessError::InvalidSquare(_))));
    }

    #[test]
    fn offsets_stay_on_board() {
        let a8 = Square::at(0, 0);
        assert_eq!(a8.offset(-1, 0), None);
        assert_eq!(a8.offset(1, 1), Some(Square::at(1, 1)));
        assert_eq!(a8.step((1, 1), 7), Some(Square::at(7, 7)));
        assert_eq!(a8.step((1, 1), 8), None);
        assert_eq!(Square::all().count(), 64);
    }
}

use crate::board::Board;
use crate::piece::{Color, PieceType};
use crate::square::{Direction, Square};
use arrayvec::ArrayVec;

pub const ORTHOGONAL: [Direction; 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
pub const DIAGONAL: [Direction; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub const KNIGHT_OFFSETS: [Direction; 8] = [
    (-2, -1),
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, -1),
    (2, 1),
    (-1, -2),
    (1, -2),
];
pub const KING_OFFSETS: [Direction; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Direction recorded for knight checks, which can't be blocked
pub const KNIGHT_CHECK: Direction = (0, 0);

/// A friendly piece that may only move along `direction` (either way),
/// `direction` pointing from the king towards the pinning slider
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    pub direction: Direction,
}
impl Pin {
    pub fn allows(&self, direction: Direction) -> bool {
        direction == self.direction || direction == (-self.direction.0, -self.direction.1)
    }
}

/// An enemy piece attacking the king, `direction` pointing from the king to it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Check {
    pub attacker: Square,
    pub direction: Direction,
}
impl Check {
    /// Squares a non king move has to land on to deal with this check: the
    /// attacker itself, plus every square between it and the king for sliders
    pub fn valid_squares(&self, king_square: Square) -> ArrayVec<Square, 7> {
        let mut squares = ArrayVec::new();
        if self.direction == KNIGHT_CHECK {
            squares.push(self.attacker);
            return squares;
        }
        for distance in 1..8 {
            match king_square.step(self.direction, distance) {
                Some(sq) => {
                    squares.push(sq);
                    if sq == self.attacker {
                        break;
                    }
                }
                None => break,
            }
        }
        squares
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub in_check: bool,
    pub pins: Vec<Pin>,
    pub checks: Vec<Check>,
}
impl Analysis {
    pub fn pin_on(&self, sq: Square) -> Option<&Pin> {
        self.pins.iter().find(|p| p.square == sq)
    }
}

/// Checks and pins against `side`'s king standing on `king_square`.
///
/// Rays are scanned outwards from the king. On each ray the first friendly
/// piece is remembered as a pin candidate, a second one kills the ray. The
/// first enemy piece found either checks (no candidate), pins the candidate,
/// or is harmless if it can't attack along that ray. `side`'s own king is
/// transparent, so the scan stays valid when `king_square` is a square the
/// king is only considering moving to.
pub fn analyze(board: &Board, side: Color, king_square: Square) -> Analysis {
    let mut analysis = Analysis::default();

    for direction in ORTHOGONAL.iter().chain(DIAGONAL.iter()) {
        let mut candidate: Option<Square> = None;
        for distance in 1..8 {
            let sq = match king_square.step(*direction, distance) {
                Some(sq) => sq,
                None => break,
            };
            let piece = match board.get(sq) {
                Some(p) => p,
                None => continue,
            };
            if piece.color == side {
                if piece.piece_type == PieceType::King {
                    continue;
                }
                if candidate.is_some() {
                    break;
                }
                candidate = Some(sq);
                continue;
            }

            if attacks_along(piece.piece_type, piece.color, *direction, distance) {
                match candidate {
                    None => analysis.checks.push(Check {
                        attacker: sq,
                        direction: *direction,
                    }),
                    Some(pinned) => analysis.pins.push(Pin {
                        square: pinned,
                        direction: *direction,
                    }),
                }
            }
            break;
        }
    }

    for offset in KNIGHT_OFFSETS {
        if let Some(sq) = king_square.offset(offset.0, offset.1) {
            match board.get(sq) {
                Some(p) if p.color != side && p.piece_type == PieceType::Knight => {
                    analysis.checks.push(Check {
                        attacker: sq,
                        direction: KNIGHT_CHECK,
                    })
                }
                _ => (),
            }
        }
    }

    analysis.in_check = !analysis.checks.is_empty();
    analysis
}

/// Whether a piece of kind `piece_type` and color `attacker`, standing
/// `distance` steps from a target along `direction` (target to piece), hits it
fn attacks_along(piece_type: PieceType, attacker: Color, direction: Direction, distance: i8) -> bool {
    let diagonal = direction.0 != 0 && direction.1 != 0;
    match piece_type {
        PieceType::Queen => true,
        PieceType::Rook => !diagonal,
        PieceType::Bishop => diagonal,
        PieceType::King => distance == 1,
        // Seen from the target, an attacking pawn sits one step against its own push direction
        PieceType::Pawn => distance == 1 && diagonal && direction.0 == -attacker.pawn_direction(),
        PieceType::Knight => false,
    }
}

/// Whether `by` attacks `sq`, with the other side's king seen through
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    analyze(board, by.opposite(), sq).in_check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn board(placement: &str) -> Board {
        Board::from_fen_placement(placement).unwrap()
    }

    #[test]
    fn nothing_to_report_at_start() {
        let b = Board::standard();
        assert_eq!(analyze(&b, Color::White, sq("e1")), Analysis::default());
        assert_eq!(analyze(&b, Color::Black, sq("e8")), Analysis::default());
    }

    #[test]
    fn slider_check_and_pin() {
        // White king e1, white bishop d2 pinned by the b4 bishop, rook e8 checking
        let b = board("4r2k/8/8/8/1b6/8/3B4/4K3");
        let analysis = analyze(&b, Color::White, sq("e1"));
        assert!(analysis.in_check);
        assert_eq!(
            analysis.checks,
            vec![Check {
                attacker: sq("e8"),
                direction: (-1, 0)
            }]
        );
        assert_eq!(
            analysis.pins,
            vec![Pin {
                square: sq("d2"),
                direction: (-1, -1)
            }]
        );
        assert_eq!(
            analysis.checks[0].valid_squares(sq("e1")).as_slice(),
            &[sq("e2"), sq("e3"), sq("e4"), sq("e5"), sq("e6"), sq("e7"), sq("e8")]
        );
    }

    #[test]
    fn two_friendly_pieces_shield_the_king() {
        let b = board("4r2k/8/8/8/8/4N3/4B3/4K3");
        let analysis = analyze(&b, Color::White, sq("e1"));
        assert!(!analysis.in_check);
        assert!(analysis.pins.is_empty());
    }

    #[test]
    fn pawn_checks_depend_on_their_color() {
        // Black pawn on d2 attacks e1, a white pawn there would not
        let b = board("7k/8/8/8/8/8/3p4/4K3");
        assert!(analyze(&b, Color::White, sq("e1")).in_check);
        let b = board("7k/8/8/8/8/8/3P4/4K3");
        assert!(!analyze(&b, Color::White, sq("e1")).in_check);
        // Black pawn on d3 is two rows away
        let b = board("7k/8/8/8/8/3p4/8/4K3");
        assert!(!analyze(&b, Color::White, sq("e1")).in_check);
        // White pawn on f7 checks the black king on e8, a black pawn behind it doesn't
        let b = board("4k3/5P2/8/8/8/8/8/4K3");
        assert!(analyze(&b, Color::Black, sq("e8")).in_check);
        let b = board("8/8/8/8/8/8/5p2/4k2K");
        assert!(!analyze(&b, Color::Black, sq("e1")).in_check);
    }

    #[test]
    fn knight_checks_use_the_sentinel_direction() {
        let b = board("4k3/8/8/8/8/5n2/8/4K3");
        let analysis = analyze(&b, Color::White, sq("e1"));
        assert_eq!(
            analysis.checks,
            vec![Check {
                attacker: sq("f3"),
                direction: KNIGHT_CHECK
            }]
        );
        assert_eq!(
            analysis.checks[0].valid_squares(sq("e1")).as_slice(),
            &[sq("f3")]
        );
    }

    #[test]
    fn double_check() {
        let b = board("4k3/8/8/8/8/5n2/8/4K2r");
        let analysis = analyze(&b, Color::White, sq("e1"));
        assert_eq!(analysis.checks.len(), 2);
        assert!(analysis.checks.iter().any(|c| c.direction == (0, 1)));
    }

    #[test]
    fn own_king_is_transparent() {
        // Stepping from e1 to d1 keeps the king on the rook's line
        let b = board("4k3/8/8/8/8/8/8/4K2r");
        assert!(is_attacked(&b, sq("d1"), Color::Black));
        assert!(!is_attacked(&b, sq("d2"), Color::Black));
        assert!(!is_attacked(&b, sq("a5"), Color::White));
    }

    #[test]
    fn kings_guard_adjacent_squares() {
        let b = board("8/8/8/4k3/8/8/8/4K3");
        assert!(is_attacked(&b, sq("e4"), Color::Black));
        assert!(!is_attacked(&b, sq("e3"), Color::Black));
        assert!(is_attacked(&b, sq("d2"), Color::White));
    }
}

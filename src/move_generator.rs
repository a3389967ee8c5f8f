use crate::{
    attacks::{self, Pin, DIAGONAL, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL},
    board::Board,
    castling::{CastleSide, CastlingRights},
    movelist::MoveList,
    piece::{Color, Piece, PieceType},
    r#move::Move,
    square::{Direction, Square},
};

struct MoveGenInfo<'a> {
    pub move_list: MoveList,
    pub board: &'a Board,
    pub side: Color,
    pub king_square: Square,
    pub pins: &'a [Pin],
    pub ep_target: Option<Square>,
}

impl<'a> MoveGenInfo<'a> {
    fn pin_on(&self, sq: Square) -> Option<Pin> {
        self.pins.iter().find(|p| p.square == sq).copied()
    }

    /// Pushes a move onto `target` unless it holds a friendly piece.
    /// Returns whether a slider may keep going past `target`
    fn push_unless_friendly(&mut self, origin: Square, piece: Piece, target: Square) -> bool {
        match self.board.get(target) {
            None => {
                self.move_list.push(Move::new(origin, target, piece, None));
                true
            }
            Some(p) if p.color != self.side => {
                self.move_list.push(Move::new(origin, target, piece, Some(p)));
                false
            }
            Some(_) => false,
        }
    }
}

/// Generates every pseudo legal move of `side`: piece movement rules only,
/// except that pinned pieces stay on their pin axis and the king never steps
/// onto an attacked square. Castling is left to `castle_moves`.
pub fn generate(
    board: &Board,
    side: Color,
    king_square: Square,
    pins: &[Pin],
    ep_target: Option<Square>,
) -> MoveList {
    let mut info = MoveGenInfo {
        move_list: MoveList::default(),
        board,
        side,
        king_square,
        pins,
        ep_target,
    };

    for (origin, piece) in board.pieces(side) {
        match piece.piece_type {
            PieceType::Pawn => pawn_moves(origin, piece, &mut info),
            PieceType::Knight => knight_moves(origin, piece, &mut info),
            PieceType::Bishop => slider_moves(origin, piece, &DIAGONAL, &mut info),
            PieceType::Rook => slider_moves(origin, piece, &ORTHOGONAL, &mut info),
            PieceType::Queen => {
                slider_moves(origin, piece, &DIAGONAL, &mut info);
                slider_moves(origin, piece, &ORTHOGONAL, &mut info);
            }
            PieceType::King => king_moves(origin, piece, &mut info),
        }
    }

    info.move_list
}

fn pawn_moves(origin: Square, pawn: Piece, info: &mut MoveGenInfo) {
    let pin = info.pin_on(origin);
    let allowed = |direction: Direction| pin.map_or(true, |p| p.allows(direction));
    let forward = info.side.pawn_direction();

    if let Some(one_step) = origin.offset(forward, 0) {
        if info.board.is_empty(one_step) && allowed((forward, 0)) {
            info.move_list.push(Move::new(origin, one_step, pawn, None));
            if origin.row() == info.side.pawn_start_row() {
                if let Some(two_steps) = origin.offset(2 * forward, 0) {
                    if info.board.is_empty(two_steps) {
                        info.move_list.push(Move::new(origin, two_steps, pawn, None));
                    }
                }
            }
        }
    }

    for side_step in [-1, 1] {
        let target = match origin.offset(forward, side_step) {
            Some(sq) => sq,
            None => continue,
        };
        if !allowed((forward, side_step)) {
            continue;
        }
        match info.board.get(target) {
            Some(p) if p.color != info.side => {
                info.move_list.push(Move::new(origin, target, pawn, Some(p)))
            }
            _ => (),
        }
        if info.ep_target == Some(target)
            && !en_passant_exposes_king(info.board, info.side, info.king_square, origin, target)
        {
            info.move_list.push(Move::new_en_passant(origin, target, pawn))
        }
    }
}

/// Taking en passant removes two pawns from the same rank at once, which the
/// pin scan can't see. When the king shares that rank, look past both pawns
/// for an enemy rook or queen that would then hit the king.
fn en_passant_exposes_king(
    board: &Board,
    side: Color,
    king_square: Square,
    origin: Square,
    target: Square,
) -> bool {
    if king_square.row() != origin.row() {
        return false;
    }
    let victim = Square::at(origin.row(), target.col());
    let step = if origin.col() > king_square.col() { 1 } else { -1 };

    let mut distance = 1;
    while let Some(sq) = king_square.offset(0, step * distance) {
        distance += 1;
        if sq == origin || sq == victim {
            continue;
        }
        if let Some(p) = board.get(sq) {
            return p.color != side && p.piece_type.is_rook_like();
        }
    }
    false
}

fn knight_moves(origin: Square, knight: Piece, info: &mut MoveGenInfo) {
    // A pinned knight can never stay on its pin axis
    if info.pin_on(origin).is_some() {
        return;
    }
    for (dr, dc) in KNIGHT_OFFSETS {
        if let Some(target) = origin.offset(dr, dc) {
            info.push_unless_friendly(origin, knight, target);
        }
    }
}

fn slider_moves(origin: Square, piece: Piece, directions: &[Direction], info: &mut MoveGenInfo) {
    let pin = info.pin_on(origin);
    for direction in directions {
        if pin.map_or(false, |p| !p.allows(*direction)) {
            continue;
        }
        for distance in 1..8 {
            match origin.step(*direction, distance) {
                Some(target) => {
                    if !info.push_unless_friendly(origin, piece, target) {
                        break;
                    }
                }
                None => break,
            }
        }
    }
}

fn king_moves(origin: Square, king: Piece, info: &mut MoveGenInfo) {
    for (dr, dc) in KING_OFFSETS {
        let target = match origin.offset(dr, dc) {
            Some(sq) => sq,
            None => continue,
        };
        if info.board.color_on(target) == Some(info.side) {
            continue;
        }
        if !attacks::is_attacked(info.board, target, info.side.opposite()) {
            info.push_unless_friendly(origin, king, target);
        }
    }
}

/// Castling moves of `side`, to be called only when it is not in check.
/// The squares between king and rook must be empty, and the two squares the
/// king crosses must not be attacked.
pub fn castle_moves(
    board: &Board,
    side: Color,
    king_square: Square,
    rights: CastlingRights,
) -> MoveList {
    let mut move_list = MoveList::default();
    let king = Piece::new(PieceType::King, side);

    for castle in [CastleSide::KingSide, CastleSide::QueenSide] {
        if !rights.has(castle, side) {
            continue;
        }
        let (step, between): (i8, i8) = match castle {
            CastleSide::KingSide => (1, 2),
            CastleSide::QueenSide => (-1, 3),
        };
        let path_is_empty = (1..=between).all(|distance| {
            king_square
                .offset(0, step * distance)
                .map_or(false, |sq| board.is_empty(sq))
        });
        if !path_is_empty {
            continue;
        }
        let crossed_is_safe = (1..=2).all(|distance| {
            king_square
                .offset(0, step * distance)
                .map_or(false, |sq| !attacks::is_attacked(board, sq, side.opposite()))
        });
        if !crossed_is_safe {
            continue;
        }
        move_list.push(Move::new_castle(king_square, castle.king_target(side), king));
    }

    move_list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attacks::analyze;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn pseudo_legal(placement: &str, side: Color, ep_target: Option<Square>) -> MoveList {
        let board = Board::from_fen_placement(placement).unwrap();
        let king_square = board.find_king(side).unwrap();
        let analysis = analyze(&board, side, king_square);
        generate(&board, side, king_square, &analysis.pins, ep_target)
    }

    fn targets_from(moves: &MoveList, origin: Square) -> Vec<Square> {
        let mut targets: Vec<Square> = moves
            .iter()
            .filter(|m| m.origin() == origin)
            .map(|m| m.target())
            .collect();
        targets.sort();
        targets
    }

    fn squares(names: &[&str]) -> Vec<Square> {
        let mut v: Vec<Square> = names.iter().map(|n| sq(n)).collect();
        v.sort();
        v
    }

    #[test]
    fn twenty_moves_at_start() {
        let moves = pseudo_legal(crate::board::START_PLACEMENT, Color::White, None);
        assert_eq!(moves.len(), 20);
        assert_eq!(targets_from(&moves, sq("g1")), squares(&["f3", "h3"]));
        assert_eq!(targets_from(&moves, sq("e2")), squares(&["e3", "e4"]));
    }

    #[test]
    fn pinned_bishop_stays_on_its_diagonal() {
        // White king a1, bishop c3, black queen e5
        let moves = pseudo_legal("7k/8/8/4q3/8/2B5/8/K7", Color::White, None);
        assert_eq!(targets_from(&moves, sq("c3")), squares(&["b2", "d4", "e5"]));
    }

    #[test]
    fn bishop_pinned_on_a_file_cannot_move() {
        // The rook pins along the file, off every bishop direction
        let moves = pseudo_legal("4r2k/8/8/8/8/4B3/8/4K3", Color::White, None);
        assert!(targets_from(&moves, sq("e3")).is_empty());
    }

    #[test]
    fn pinned_rook_slides_along_the_pin() {
        let moves = pseudo_legal("4r2k/8/8/8/8/4R3/8/4K3", Color::White, None);
        assert_eq!(
            targets_from(&moves, sq("e3")),
            squares(&["e2", "e4", "e5", "e6", "e7", "e8"])
        );
    }

    #[test]
    fn pinned_knight_has_no_moves() {
        let moves = pseudo_legal("4r2k/8/8/8/8/4N3/8/4K3", Color::White, None);
        assert!(targets_from(&moves, sq("e3")).is_empty());
    }

    #[test]
    fn pinned_pawn_keeps_only_moves_on_the_axis() {
        // Pinned on the file: may push, may not capture
        let moves = pseudo_legal("4r2k/8/8/8/8/3p4/4P3/4K3", Color::White, None);
        assert_eq!(targets_from(&moves, sq("e2")), squares(&["e3", "e4"]));
        // Pinned on the diagonal: may only take the pinner
        let moves = pseudo_legal("7k/8/8/8/8/2b5/3P4/4K3", Color::White, None);
        assert_eq!(targets_from(&moves, sq("d2")), squares(&["c3"]));
    }

    #[test]
    fn pawn_rules() {
        // Blocked double push, captures only onto enemies, promotion flag
        let moves = pseudo_legal("1n5k/P7/8/8/8/4n3/3PP3/K7", Color::White, None);
        assert_eq!(targets_from(&moves, sq("d2")), squares(&["d3", "d4", "e3"]));
        assert!(targets_from(&moves, sq("e2")).is_empty());
        let promotions: Vec<&Move> = moves.iter().filter(|m| m.origin() == sq("a7")).collect();
        assert_eq!(promotions.len(), 2);
        assert!(promotions.iter().all(|m| m.is_promotion()));
    }

    #[test]
    fn en_passant_target_is_honoured() {
        let moves = pseudo_legal("7k/8/8/3pP3/8/8/8/K7", Color::White, Some(sq("d6")));
        let ep: Vec<&Move> = moves.iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].target(), sq("d6"));
        assert_eq!(ep[0].en_passant_victim(), sq("d5"));
    }

    #[test]
    fn en_passant_cannot_uncover_a_rank_attack() {
        // King a5, pawns b5/c5, rook h5: taking would empty the rank
        let moves = pseudo_legal("7k/8/8/KPp4r/8/8/8/8", Color::White, Some(sq("c6")));
        assert!(!moves.iter().any(|m| m.is_en_passant()));
        // A third piece on the rank keeps it closed
        let moves = pseudo_legal("7k/8/8/KPp2n1r/8/8/8/8", Color::White, Some(sq("c6")));
        assert!(moves.iter().any(|m| m.is_en_passant()));
        // Same with the king on the right of the pawns
        let moves = pseudo_legal("7k/8/8/r2pPK2/8/8/8/8", Color::White, Some(sq("d6")));
        assert!(!moves.iter().any(|m| m.is_en_passant()));
        // A rook behind the king can't reach through it
        let moves = pseudo_legal("7k/8/8/r1BKPp2/8/8/8/8", Color::White, Some(sq("f6")));
        assert!(moves.iter().any(|m| m.is_en_passant()));
    }

    #[test]
    fn king_avoids_attacked_squares() {
        let moves = pseudo_legal("3r3k/8/8/8/8/8/8/4K3", Color::White, None);
        assert_eq!(targets_from(&moves, sq("e1")), squares(&["e2", "f1", "f2"]));
    }

    #[test]
    fn castling_needs_empty_and_safe_squares() {
        let board = Board::from_fen_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let castles = castle_moves(&board, Color::White, sq("e1"), CastlingRights::new());
        assert_eq!(
            castles.iter().map(|m| m.target()).collect::<Vec<_>>(),
            vec![sq("g1"), sq("c1")]
        );
        let only_queenside = CastlingRights::from_fen("Qkq");
        let castles = castle_moves(&board, Color::White, sq("e1"), only_queenside);
        assert_eq!(castles.len(), 1);

        // b1 only has to be empty, d1 and c1 must be safe
        let board = Board::from_fen_placement("1r2k2r/8/8/8/8/8/8/R3K2R").unwrap();
        assert_eq!(
            castle_moves(&board, Color::White, sq("e1"), CastlingRights::new()).len(),
            2
        );
        let board = Board::from_fen_placement("2r1k2r/8/8/8/8/8/8/R3K2R").unwrap();
        assert_eq!(
            castle_moves(&board, Color::White, sq("e1"), CastlingRights::new()).len(),
            1
        );
        let board = Board::from_fen_placement("r3k2r/8/8/8/8/8/8/RN2K1NR").unwrap();
        assert!(castle_moves(&board, Color::White, sq("e1"), CastlingRights::new()).is_empty());
        // A pawn guards f1 diagonally even though it can't move there
        let board = Board::from_fen_placement("r3k3/8/8/8/8/8/6p1/R3K2R").unwrap();
        let castles = castle_moves(&board, Color::White, sq("e1"), CastlingRights::new());
        assert_eq!(castles.iter().map(|m| m.target()).collect::<Vec<_>>(), vec![sq("c1")]);
    }
}

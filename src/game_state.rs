use crate::attacks::{self, Analysis};
use crate::board::Board;
use crate::castling::{CastleSide, CastlingRights};
use crate::error::ChessError;
use crate::history::{History, Snapshot};
use crate::move_generator::{castle_moves, generate};
use crate::movelist::MoveList;
use crate::piece::Color::{Black, White};
use crate::piece::{Color, Piece, PieceType};
use crate::r#move::{Move, MoveFlags};
use crate::square::Square;
use std::fmt::{Display, Formatter};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A game in progress: the board, whose turn it is, and everything needed to
/// take moves back.
///
/// Single owner, single writer. Callers wanting to explore several lines at
/// once work on clones.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    // Indexed by color, always equal to where the kings actually stand
    king_squares: [Square; 2],
    history: History,
    checkmate: bool,
    stalemate: bool,
}

impl GameState {
    /// A game at the standard initial position
    pub fn new() -> GameState {
        let snapshot = Snapshot {
            castling_rights: CastlingRights::new(),
            ep_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        };
        let mut king_squares = [Square::at(0, 4); 2];
        king_squares[White as usize] = Square::at(7, 4);
        GameState {
            board: Board::standard(),
            side_to_move: White,
            king_squares,
            history: History::new(snapshot),
            checkmate: false,
            stalemate: false,
        }
    }

    /// Sets up a game from a FEN string. The clocks are optional.
    /// Castling rights whose king or rook isn't on its home square are dropped
    pub fn from_fen(fen: &str) -> Result<GameState, ChessError> {
        let bad = || ChessError::InvalidFen(fen.to_string());
        let mut sections = fen.split_whitespace();
        let board = Board::from_fen_placement(sections.next().ok_or_else(bad)?)?;
        let side_to_move = match sections.next() {
            Some("w") => White,
            Some("b") => Black,
            _ => return Err(bad()),
        };
        let castling_rights = match sections.next() {
            Some(field) if field.chars().all(|c| "KQkq-".contains(c)) => {
                CastlingRights::from_fen(field)
            }
            _ => return Err(bad()),
        };
        let ep_target = match sections.next() {
            Some("-") => None,
            Some(field) => {
                let target = field.parse::<Square>().map_err(|_| bad())?;
                if !Self::is_en_passant_target(&board, side_to_move, target) {
                    return Err(bad());
                }
                Some(target)
            }
            None => return Err(bad()),
        };
        let halfmove_clock = match sections.next() {
            Some(field) => field.parse::<u32>().map_err(|_| bad())?,
            None => 0,
        };
        let fullmove_number = match sections.next() {
            Some(field) => field.parse::<u32>().map_err(|_| bad())?,
            None => 1,
        };

        let mut king_squares = [Square::at(0, 0); 2];
        for color in [White, Black] {
            let mut kings = board
                .pieces(color)
                .filter(|(_, p)| p.piece_type == PieceType::King);
            king_squares[color as usize] = match (kings.next(), kings.next()) {
                (Some((sq, _)), None) => sq,
                _ => return Err(bad()),
            };
        }

        let castling_rights = Self::sanitize_castling_rights(&board, castling_rights);
        let snapshot = Snapshot {
            castling_rights,
            ep_target,
            halfmove_clock,
            fullmove_number,
        };
        Ok(GameState {
            board,
            side_to_move,
            king_squares,
            history: History::new(snapshot),
            checkmate: false,
            stalemate: false,
        })
    }

    /// Whether `target` is where a pawn of the side that just moved could have
    /// passed on a double step: empty, with that pawn right past it and its
    /// start square left empty
    fn is_en_passant_target(board: &Board, side_to_move: Color, target: Square) -> bool {
        let pusher = side_to_move.opposite();
        let forward = pusher.pawn_direction();
        if target.row() as i8 != pusher.pawn_start_row() as i8 + forward || !board.is_empty(target) {
            return false;
        }
        let pawn_there = target
            .offset(forward, 0)
            .map_or(false, |sq| board.get(sq) == Some(Piece::new(PieceType::Pawn, pusher)));
        let start_empty = target
            .offset(-forward, 0)
            .map_or(false, |sq| board.is_empty(sq));
        pawn_there && start_empty
    }

    fn sanitize_castling_rights(board: &Board, mut rights: CastlingRights) -> CastlingRights {
        for color in [White, Black] {
            for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                let king_home = board.get(side.king_origin(color))
                    == Some(Piece::new(PieceType::King, color));
                let rook_home = board.get(side.rook_origin(color))
                    == Some(Piece::new(PieceType::Rook, color));
                if !(king_home && rook_home) {
                    rights.revoke(side, color)
                }
            }
        }
        rights
    }

    pub fn fen(&self) -> String {
        let snapshot = self.history.current();
        format!(
            "{} {} {} {} {} {}",
            self.board.fen_placement(),
            self.side_to_move,
            snapshot.castling_rights,
            snapshot
                .ep_target
                .map_or_else(|| String::from("-"), |sq| sq.to_string()),
            snapshot.halfmove_clock,
            snapshot.fullmove_number
        )
    }

    /*
    GETTERS
     */
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color as usize]
    }
    pub fn castling_rights(&self) -> CastlingRights {
        self.history.current().castling_rights
    }
    pub fn en_passant_target(&self) -> Option<Square> {
        self.history.current().ep_target
    }
    pub fn halfmove_clock(&self) -> u32 {
        self.history.current().halfmove_clock
    }
    pub fn fullmove_number(&self) -> u32 {
        self.history.current().fullmove_number
    }
    pub fn history(&self) -> &History {
        &self.history
    }
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.moves()
    }
    pub fn last_move(&self) -> Option<Move> {
        self.history.last_move()
    }
    /// Notation of every move played so far, oldest first
    pub fn notation_log(&self) -> Vec<String> {
        self.history.moves().map(|m| m.notation()).collect()
    }

    /// Only meaningful after `legal_moves` was called for the current position
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }
    /// Only meaningful after `legal_moves` was called for the current position
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    pub fn in_check(&self) -> bool {
        self.analyze().in_check
    }

    /// Checks and pins against the side to move
    pub fn analyze(&self) -> Analysis {
        attacks::analyze(
            &self.board,
            self.side_to_move,
            self.king_square(self.side_to_move),
        )
    }

    /*
    LEGAL MOVES
     */

    /// Every legal move of the side to move, updating the checkmate and
    /// stalemate flags. This is the only authoritative move list.
    pub fn legal_moves(&mut self) -> MoveList {
        let (moves, in_check) = self.compute_legal_moves();
        if moves.is_empty() {
            self.checkmate = in_check;
            self.stalemate = !in_check;
            log::debug!(
                "{} has no legal move: {}",
                self.side_to_move,
                if in_check { "checkmate" } else { "stalemate" }
            );
        } else {
            self.checkmate = false;
            self.stalemate = false;
        }
        moves
    }

    /// Legal moves without touching the terminal flags, along with whether the
    /// side to move is in check
    pub fn compute_legal_moves(&self) -> (MoveList, bool) {
        let side = self.side_to_move;
        let king_square = self.king_square(side);
        let analysis = attacks::analyze(&self.board, side, king_square);
        let mut moves = generate(
            &self.board,
            side,
            king_square,
            &analysis.pins,
            self.en_passant_target(),
        );

        match analysis.checks.as_slice() {
            [] => moves.append(&castle_moves(
                &self.board,
                side,
                king_square,
                self.castling_rights(),
            )),
            [check] => {
                // King moves already avoid attacked squares
                let valid_squares = check.valid_squares(king_square);
                moves.retain(|m| {
                    m.moved_piece().piece_type == PieceType::King
                        || valid_squares.contains(&m.target())
                        || (m.is_en_passant() && valid_squares.contains(&m.en_passant_victim()))
                })
            }
            // Double check: only the king can do something about it
            _ => moves.retain(|m| m.moved_piece().piece_type == PieceType::King),
        }

        (moves, analysis.in_check)
    }

    /*
    MOVE MAKING
     */

    /// Plays a move.
    /// The move is expected to come from `legal_moves` for the current
    /// position, anything else leaves the game in an undefined state
    pub fn apply_move(&mut self, mv: Move) {
        let side = self.side_to_move;
        let origin = mv.origin();
        let target = mv.target();
        let moved = mv.moved_piece();

        self.board.remove_piece(origin);
        let placed = if mv.is_promotion() {
            Piece::new(PieceType::Queen, side)
        } else {
            moved
        };
        self.board.add_piece(placed, target);

        match mv.flags() {
            MoveFlags::EnPassant => {
                self.board.remove_piece(mv.en_passant_victim());
            }
            MoveFlags::Castle => {
                let castle = CastleSide::from_king_target(target);
                if let Some(rook) = self.board.remove_piece(castle.rook_origin(side)) {
                    self.board.add_piece(rook, castle.rook_target(side));
                }
            }
            _ => (),
        }

        if moved.piece_type == PieceType::King {
            self.king_squares[side as usize] = target;
        }

        let previous = *self.history.current();
        let ep_target = if moved.piece_type == PieceType::Pawn
            && (origin.row() as i8 - target.row() as i8).abs() == 2
        {
            Some(Square::at((origin.row() + target.row()) / 2, origin.col()))
        } else {
            None
        };
        let halfmove_clock = if moved.piece_type == PieceType::Pawn || mv.is_capture() {
            0
        } else {
            previous.halfmove_clock + 1
        };
        let fullmove_number = if side == Black {
            previous.fullmove_number + 1
        } else {
            previous.fullmove_number
        };
        let snapshot = Snapshot {
            castling_rights: Self::castling_rights_after(previous.castling_rights, &mv),
            ep_target,
            halfmove_clock,
            fullmove_number,
        };

        self.history.push(mv, snapshot);
        self.side_to_move = side.opposite();
        log::trace!("applied {} ({})", mv.notation(), mv);
    }

    /// King moves lose both rights, rooks leaving or being captured on a home
    /// square lose that side's right
    fn castling_rights_after(mut rights: CastlingRights, mv: &Move) -> CastlingRights {
        if let Some(captured) = mv.captured_piece() {
            if captured.piece_type == PieceType::Rook {
                rights.revoke_for_rook_square(captured.color, mv.target());
            }
        }
        let moved = mv.moved_piece();
        match moved.piece_type {
            PieceType::King => rights.uncastle(moved.color),
            PieceType::Rook => rights.revoke_for_rook_square(moved.color, mv.origin()),
            _ => (),
        }
        rights
    }

    /// Takes back the last move. Does nothing when no move was played.
    /// Terminal flags are cleared, call `legal_moves` again to refresh them
    pub fn undo_move(&mut self) {
        let mv = match self.history.pop() {
            Some(mv) => mv,
            None => {
                log::debug!("undo requested with an empty history");
                return;
            }
        };
        self.side_to_move = self.side_to_move.opposite();
        let side = self.side_to_move;
        let moved = mv.moved_piece();

        self.board.add_piece(moved, mv.origin());
        match mv.flags() {
            MoveFlags::EnPassant => {
                self.board.remove_piece(mv.target());
                self.board.replace(mv.en_passant_victim(), mv.captured_piece());
            }
            MoveFlags::Castle => {
                self.board.remove_piece(mv.target());
                let castle = CastleSide::from_king_target(mv.target());
                if let Some(rook) = self.board.remove_piece(castle.rook_target(side)) {
                    self.board.add_piece(rook, castle.rook_origin(side));
                }
            }
            _ => {
                self.board.replace(mv.target(), mv.captured_piece());
            }
        }

        if moved.piece_type == PieceType::King {
            self.king_squares[side as usize] = mv.origin();
        }
        self.checkmate = false;
        self.stalemate = false;
        log::trace!("undid {}", mv);
    }

    /// Given a string, plays the move if it is legal. Both long algebraic
    /// ("g1f3") and this engine's notation ("Nf3", "0-0") are understood.
    /// Notation shared by several legal moves is refused as ambiguous
    pub fn apply_str(&mut self, move_str: &str) -> Result<Move, ChessError> {
        let move_str = move_str.trim();
        let legal_moves = self.legal_moves();

        let found = match Move::parse(move_str) {
            Some((origin, target)) => legal_moves
                .iter()
                .find(|m| m.origin() == origin && m.target() == target),
            None => {
                if move_str.is_empty() {
                    return Err(ChessError::BadMoveFormat(move_str.to_string()));
                }
                // Notation doesn't disambiguate, two pieces may share one
                let mut matching = legal_moves.iter().filter(|m| {
                    let notation = m.notation();
                    notation == move_str || notation.trim_end_matches(" e.p.") == move_str
                });
                match (matching.next(), matching.next()) {
                    (Some(_), Some(_)) => {
                        return Err(ChessError::AmbiguousMove(move_str.to_string()))
                    }
                    (found, _) => found,
                }
            }
        };

        match found {
            Some(mv) => {
                let mv = *mv;
                self.apply_move(mv);
                Ok(mv)
            }
            None => Err(ChessError::IllegalMove(move_str.to_string())),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f, "side to move: {}", self.side_to_move)?;
        writeln!(f, "castling rights: {}", self.castling_rights())?;
        writeln!(
            f,
            "en passant: {}",
            self.en_passant_target()
                .map_or_else(|| String::from("-"), |sq| sq.to_string())
        )?;
        write!(f, "fen: {}", self.fen())
    }
}

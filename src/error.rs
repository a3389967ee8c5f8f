use thiserror::Error;

/// Errors surfaced to callers feeding the engine external input.
/// Check, checkmate and stalemate are game state, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("square out of range: ({row}, {col})")]
    SquareOutOfRange { row: i32, col: i32 },

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("badly formatted move: {0}")]
    BadMoveFormat(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("ambiguous move: {0}, use long algebraic notation (e.g. a1d1)")]
    AmbiguousMove(String),
}

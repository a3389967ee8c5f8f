use std::panic;
use std::thread;
use std::time::Instant;

pub mod attacks;
pub mod board;
pub mod castling;
pub mod console;
pub mod error;
pub mod game_state;
pub mod history;
pub mod move_generator;
pub mod movelist;
pub mod piece;
pub mod square;
mod r#move;

pub use crate::board::Board;
pub use crate::error::ChessError;
pub use crate::game_state::{GameState, START_FEN};
pub use crate::movelist::MoveList;
pub use crate::piece::{Color, Piece, PieceType};
pub use crate::r#move::{Move, MoveFlags};

/// Prints a perft table for every depth up to `depth`
pub fn perft(depth: u32, fen: Option<String>, threads: usize) -> Result<(), ChessError> {
    let state = match fen {
        None => GameState::new(),
        Some(f) => GameState::from_fen(&f)?,
    };
    println!("{}\n", state);
    println!("depth nodes\n--------");
    for d in 0..depth + 1 {
        let start = Instant::now();
        let nodes = parallel_count(&state, d, threads);
        let elapsed = start.elapsed();
        println!(
            "{}     {} ({}s, {} nps)",
            d,
            nodes,
            elapsed.as_secs_f32(),
            nodes as f32 / elapsed.as_secs_f32()
        );
    }
    Ok(())
}

/// Number of leaf nodes of the legal move tree `depth` plies deep
pub fn count_nodes(state: &mut GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let (moves, _) = state.compute_legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0u64;
    for mv in &moves {
        state.apply_move(*mv);
        nodes += count_nodes(state, depth - 1);
        state.undo_move()
    }
    nodes
}

/// Leaf count below each legal move of the current position
pub fn divide(state: &mut GameState, depth: u32) -> Vec<(Move, u64)> {
    let (moves, _) = state.compute_legal_moves();
    let mut results = Vec::with_capacity(moves.len());
    for mv in &moves {
        state.apply_move(*mv);
        results.push((*mv, count_nodes(state, depth.saturating_sub(1))));
        state.undo_move();
    }
    results
}

/// Same as `count_nodes`, with the root moves shared between `threads`
/// workers, each one playing on its own copy of the game
pub fn parallel_count(state: &GameState, depth: u32, threads: usize) -> u64 {
    if depth <= 1 || threads <= 1 {
        return count_nodes(&mut state.clone(), depth);
    }
    let (moves, _) = state.compute_legal_moves();
    let chunk_size = (moves.len() + threads - 1) / threads;
    if chunk_size == 0 {
        return 0;
    }

    thread::scope(|scope| {
        let workers: Vec<_> = moves
            .as_slice()
            .chunks(chunk_size)
            .map(|chunk| {
                let mut local = state.clone();
                scope.spawn(move || {
                    let mut nodes = 0u64;
                    for mv in chunk {
                        local.apply_move(*mv);
                        nodes += count_nodes(&mut local, depth - 1);
                        local.undo_move();
                    }
                    nodes
                })
            })
            .collect();
        sum_worker_counts(workers.into_iter().map(|w| w.join()))
    })
}

/// Adds up the workers' counts. A worker that panicked panics the caller too
fn sum_worker_counts<I: IntoIterator<Item = thread::Result<u64>>>(results: I) -> u64 {
    results
        .into_iter()
        .map(|r| match r {
            Ok(nodes) => nodes,
            Err(payload) => panic::resume_unwind(payload),
        })
        .sum()
}

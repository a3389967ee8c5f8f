use criterion::{criterion_group, criterion_main, Criterion};
use warden::GameState;

// A pure perft function, with no node counting, simply apply/undo and
// legal move generation
fn perft(state: &mut GameState, depth: u64) {
    if depth == 0 {
        return;
    }
    let (moves, _) = state.compute_legal_moves();
    for m in &moves {
        state.apply_move(*m);
        perft(state, depth - 1);
        state.undo_move();
    }
}

fn perft_bench(c: &mut Criterion) {
    // The positions are taken from the chess programming wiki
    // https://www.chessprogramming.org/Perft_Results
    let mut state = GameState::new();
    c.bench_function("perft initial 4", |b| b.iter(|| perft(&mut state, 4)));
    state = GameState::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .unwrap();
    c.bench_function("perft kiwipete 3", |b| b.iter(|| perft(&mut state, 3)));
    state = GameState::from_fen("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10")
        .unwrap();
    c.bench_function("perft alternative 3", |b| b.iter(|| perft(&mut state, 3)));
}

fn legal_moves_bench(c: &mut Criterion) {
    let state = GameState::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .unwrap();
    c.bench_function("legal moves kiwipete", |b| b.iter(|| state.compute_legal_moves()));
}

criterion_group!(benches, perft_bench, legal_moves_bench);
criterion_main!(benches);

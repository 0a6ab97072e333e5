use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use quarto::{
    engine::Engine,
    notation::{parse_move, parse_piece},
    state::{GameState, Move},
};

/// Histories and the piece then selected, from late middlegame to endgame
const POSITIONS: [(&str, &str); 4] = [
    ("BCGP-a1 NRPT-d4 BRGT-b2 NCPP-c3 BCPT-a4 NRGP-d1 BRPP-b3 NCGT-c2", "BCGT"),
    (
        "NRPP-b3 NRPT-a1 BCGT-a3 NCPP-c2 BRGP-c3 NCGT-b2 NCPT-d4 BCGP-d2 NRGT-c4",
        "BRPT",
    ),
    (
        "NRGP-d1 NCGT-c4 BCPP-d2 NCPP-b3 BRGP-b4 BRGT-d3 BRPT-a2 NCPT-b2 BCGP-a4 NRPP-a3",
        "NCGP",
    ),
    (
        "NRPP-b3 NRPT-a1 BCGT-a3 NCPP-c2 BRGP-c3 NCGT-b2 NCPT-d4 BCGP-d2 NRGT-c4 BRPT-b1",
        "NRGP",
    ),
];

fn states() -> Vec<(String, GameState)> {
    POSITIONS
        .into_iter()
        .map(|(history, selected)| {
            let moves: Vec<Move> = history
                .split_whitespace()
                .map(|mv| parse_move(mv).unwrap())
                .collect();
            let state = GameState::from_history(&moves)
                .unwrap()
                .with_selected(parse_piece(selected).unwrap())
                .unwrap();
            (format!("{} plies, {selected}", moves.len()), state)
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let states = states();

    let mut group = c.benchmark_group("win detection");
    for (name, state) in states.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), state, |b, state| {
            b.iter(|| state.board().check_win());
        });
    }
    group.finish();

    let mut group = c.benchmark_group("move generation");
    for (name, state) in states.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), state, |b, state| {
            b.iter(|| state.valid_moves());
        });
    }
    group.finish();

    let mut group = c.benchmark_group("full search");
    group
        .sample_size(10)
        .measurement_time(Duration::from_secs(30));
    for (name, state) in states.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), state, |b, state| {
            let mut engine = Engine::default();
            b.iter(|| engine.search(state));
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

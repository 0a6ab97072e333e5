use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use log::{info, warn};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::{ThreadPoolBuilder, prelude::*};

use quarto::{
    engine::{Engine, SearchStats},
    state::{AiMove, GameState},
};

/// Times searches on random mid-game positions
#[derive(Parser, Debug)]
struct Args {
    /// Search depth
    #[arg(short, long, default_value_t = 8)]
    depth: u8,

    /// Number of positions to search
    #[arg(short, long, default_value_t = 1)]
    games: usize,

    /// Number of random plies played before searching
    #[arg(short, long, default_value_t = 10)]
    moves: usize,

    /// Print aggregated search statistics
    #[arg(short, long)]
    stats: bool,

    /// Number of positions searched concurrently, each with its own engine
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Seed for position generation; random if not given
    #[arg(long)]
    seed: Option<u64>,
}

/// Totals over every searched position
#[derive(Debug, Default)]
struct Totals {
    searched: usize,
    skipped: usize,
    stats: SearchStats,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.jobs == 0 {
        bail!("--jobs must be at least 1");
    }
    let pool = ThreadPoolBuilder::new()
        .num_threads(args.jobs)
        .build()
        .context("Failed to build thread pool")?;

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!(
        "Running {} games ({} random plies each, depth {}, seed {seed})",
        args.games, args.moves, args.depth
    );

    let totals = Mutex::new(Totals::default());
    pool.install(|| {
        (0..args.games).into_par_iter().for_each(|game| {
            // One seed per game, so results don't depend on scheduling
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(game as u64));
            let state = random_position(&mut rng, args.moves);

            if state.is_game_over() || state.selected().is_none() {
                warn!("Game {}: already finished, skipping", game + 1);
                totals.lock().skipped += 1;
                return;
            }

            let mut engine = Engine::with_depth(args.depth);
            let result = engine.search(&state);
            info!(
                "Game {}: score {}, {} nodes in {:?}",
                game + 1,
                result.score,
                result.stats.nodes,
                result.stats.elapsed
            );

            let mut totals = totals.lock();
            totals.searched += 1;
            totals.stats.merge(&result.stats);
        });
    });

    let totals = totals.into_inner();
    if totals.searched == 0 {
        bail!("No position was searched ({} skipped)", totals.skipped);
    }
    report(&totals, args.stats);

    Ok(())
}

/// Plays `plies` random moves from the empty board
///
/// The first ply only selects a piece. Stops early once the game is over.
fn random_position(rng: &mut impl Rng, plies: usize) -> GameState {
    let mut state = GameState::initial();
    let opening = state.available_pieces().iter().nth(rng.random_range(0..16));
    if let Some(piece) = opening {
        state = state.apply_move(AiMove::select(piece));
    }

    for _ in 0..plies {
        if state.is_game_over() {
            break;
        }
        let moves = state.valid_moves();
        if moves.is_empty() {
            break;
        }
        state = state.apply_move(moves[rng.random_range(0..moves.len())]);
    }

    state
}

fn report(totals: &Totals, show_stats: bool) {
    let searched = totals.searched as u32;
    let stats = &totals.stats;

    println!("=== RESULTS OVER {} POSITIONS ===", totals.searched);
    println!("Skipped: {}", totals.skipped);
    println!("Average time: {:?}", stats.elapsed / searched);
    println!("Total search time: {:?}", stats.elapsed);

    if show_stats {
        let per_position = |n: u64| n as f64 / totals.searched as f64;
        let per_node =
            |d: Duration| Duration::from_secs_f64(d.as_secs_f64() / stats.nodes.max(1) as f64);

        println!();
        println!("=== SEARCH STATISTICS ===");
        println!("Nodes: {} ({:.1} per position)", stats.nodes, per_position(stats.nodes));
        println!("Time per node: {:?}", per_node(stats.elapsed));
        println!(
            "Table hits: {} ({:.1} per position)",
            stats.table_hits,
            per_position(stats.table_hits)
        );
        println!(
            "Table misses: {} ({:.1} per position)",
            stats.table_misses,
            per_position(stats.table_misses)
        );
        let lookups = stats.table_hits + stats.table_misses;
        if lookups > 0 {
            println!("Hit rate: {:.2}%", stats.table_hits as f64 / lookups as f64 * 100.0);
        }
        println!("Leaf evaluations: {}", stats.leaf_evaluations);
        println!("Terminal evaluations: {}", stats.terminal_evaluations);
        println!("Cutoffs: {}", stats.cutoffs);
    }
}

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};

use energy_2048::grid::Grid;
use energy_2048::search::Search;

/// Autoplay a slide-and-merge game with the energy-minimizing search.
#[derive(Parser)]
#[command(name = "energy-2048")]
struct Args {
    /// RNG seed for a reproducible run (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Board edge length
    #[arg(long, default_value_t = 4)]
    size: usize,
    /// Stop after this many moves
    #[arg(long)]
    steps: Option<u64>,
    /// Use the one-ply greedy strategy instead of the recursive search
    #[arg(long)]
    greedy: bool,
    /// Suppress the status line and final board printout
    #[arg(long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut grid = Grid::new(args.size);
    grid.add_start_tiles(&mut rng);

    let pb = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | {msg}").unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let start = Instant::now();
    let mut total_score: u64 = 0;
    let mut move_count: u64 = 0;
    let mut won = false;

    loop {
        let direction = {
            let search = Search::new(&grid);
            if args.greedy {
                search.get_best_greedy()
            } else {
                search.get_best()
            }
        };
        let Some(direction) = direction else { break };

        let outcome = grid.shift(direction);
        if !outcome.moved {
            break;
        }
        move_count += 1;
        total_score += u64::from(outcome.score);
        if outcome.won {
            won = true;
            break;
        }

        grid.computer_move(&mut rng);

        if let Some(limit) = args.steps {
            if move_count >= limit {
                break;
            }
        }
        if !grid.moves_available() {
            break;
        }

        if let Some(pb) = &pb {
            if move_count % 10 == 0 {
                let rate = move_count as f64 / start.elapsed().as_secs_f64().max(1e-6);
                pb.set_message(format!(
                    "moves: {} | moves/sec: {:.1} | score: {}",
                    move_count, rate, total_score
                ));
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let elapsed = start.elapsed().as_secs_f64().max(1e-6);
    if !args.quiet {
        println!("{}", grid);
    }
    println!(
        "Moves: {} | moves/sec: {:.1} | score: {} | highest tile: {} | {}",
        move_count,
        move_count as f64 / elapsed,
        total_score,
        grid.highest_tile(),
        if won { "won" } else { "game over" }
    );
}

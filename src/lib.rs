//! energy-2048: a slide-and-merge grid engine plus an energy-minimizing
//! move search.
//!
//! This crate provides:
//! - A `Grid` type owning an N×N matrix of optional tiles, with the full
//!   move/merge algorithm, availability and terminal checks (`grid` module)
//! - Heuristic evaluators over a grid snapshot: `entropy`, `entropy2` and
//!   the pairwise-potential `map_energy` (`heuristic` module)
//! - A depth-bounded `Search` that ranks the player's candidate moves by
//!   minimizing board energy, plus a cheaper one-ply greedy variant
//!   (`search` module)
//!
//! Quick start:
//! ```
//! use energy_2048::grid::Grid;
//! use energy_2048::search::Search;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board setup with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut grid = Grid::new(4);
//! grid.add_start_tiles(&mut rng);
//!
//! if let Some(direction) = Search::new(&grid).get_best() {
//!     let outcome = grid.shift(direction);
//!     assert!(outcome.moved);
//!     // The computer replies by spawning a random tile
//!     grid.computer_move(&mut rng);
//! }
//! ```
//!
//! All randomness flows through an injected `rand::Rng`, so every run can be
//! reproduced from a seed. The search itself is deterministic.

pub mod grid;
pub mod heuristic;
pub mod search;

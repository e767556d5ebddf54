//! Move selection: a depth-bounded recursive search and a one-ply greedy
//! alternative, both ranking the player's candidate moves by minimizing
//! board energy.
//!
//! The search never branches on the computer's random tile placement; the
//! heuristic's preference for calm, ordered boards stands in for whatever
//! the spawn does. Every candidate is explored on an independent clone, so
//! the originating grid and sibling branches are never disturbed.

use rayon::prelude::*;

use crate::grid::{Direction, Grid};

/// Recursion depth at which a board is scored instead of expanded.
const LEAF_LEVEL: u32 = 2;

/// Outcome of a search step: the recommended direction (if any) and the
/// minimum leaf energy found beneath it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// `None` means "no recommendation": the turn flag was down or no
    /// direction produced a legal move. Callers must not apply a move then.
    pub dir: Option<Direction>,
    pub score: f64,
}

/// Energy of one top-level branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchScore {
    pub dir: Direction,
    pub energy: f64,
    /// False when the move is a no-op for the current board.
    pub legal: bool,
}

/// Stateless move-selection strategy bound to one originating grid.
pub struct Search<'a> {
    grid: &'a Grid,
}

impl<'a> Search<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Search { grid }
    }

    /// Recommend a move via the depth-bounded search, or `None` when no
    /// legal move exists.
    ///
    /// ```
    /// use energy_2048::grid::{Direction, Grid};
    /// use energy_2048::search::Search;
    ///
    /// let grid = Grid::from_rows(&[
    ///     [2, 0, 0, 0],
    ///     [2, 0, 0, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    /// ]);
    /// assert_eq!(Search::new(&grid).get_best(), Some(Direction::Up));
    /// ```
    pub fn get_best(&self) -> Option<Direction> {
        self.search(self.grid, 1).dir
    }

    /// Explore the player's replies from `grid`, scoring leaves at
    /// `LEAF_LEVEL` with the board energy and keeping the minimum.
    ///
    /// Expansion is gated on the grid's turn flag, and `shift` lowers that
    /// flag on any clone it moves, so raising `LEAF_LEVEL` alone would not
    /// deepen the search beyond one ply of real branching. That collapse is
    /// part of the tuned behavior and is kept as-is.
    pub fn search(&self, grid: &Grid, level: u32) -> SearchResult {
        if level == LEAF_LEVEL {
            return SearchResult {
                dir: None,
                score: grid.map_energy(),
            };
        }

        let mut best = SearchResult {
            dir: None,
            score: f64::INFINITY,
        };
        if grid.player_turn {
            for dir in Direction::ALL {
                let mut candidate = grid.clone();
                if candidate.shift(dir).moved {
                    let result = self.search(&candidate, level + 1);
                    if result.score < best.score {
                        best = SearchResult {
                            dir: Some(dir),
                            score: result.score,
                        };
                    }
                }
            }
        }
        best
    }

    /// One-ply greedy alternative: try each direction once, short-circuit
    /// on an immediate win, otherwise take the lowest-energy board.
    pub fn get_best_greedy(&self) -> Option<Direction> {
        let mut best_score = f64::INFINITY;
        let mut best_dir = None;

        if self.grid.player_turn {
            for dir in Direction::ALL {
                let mut candidate = self.grid.clone();
                if candidate.shift(dir).moved {
                    if candidate.is_win() {
                        return Some(dir);
                    }
                    let score = candidate.map_energy();
                    if score < best_score {
                        best_score = score;
                        best_dir = Some(dir);
                    }
                }
            }
        }
        best_dir
    }

    /// Score all four top-level branches in parallel.
    ///
    /// Returns a fixed array in order Up/Right/Down/Left; illegal moves are
    /// marked `legal = false`. Each branch works on its own clone and the
    /// evaluators are pure, so the branches are independent.
    pub fn branch_scores(&self) -> [BranchScore; 4] {
        let mut out = Direction::ALL.map(|dir| BranchScore {
            dir,
            energy: 0.0,
            legal: false,
        });
        if !self.grid.player_turn {
            return out;
        }

        let scored: Vec<(usize, BranchScore)> = Direction::ALL
            .par_iter()
            .enumerate()
            .map(|(i, &dir)| {
                let mut candidate = self.grid.clone();
                let branch = if candidate.shift(dir).moved {
                    BranchScore {
                        dir,
                        energy: candidate.map_energy(),
                        legal: true,
                    }
                } else {
                    BranchScore {
                        dir,
                        energy: 0.0,
                        legal: false,
                    }
                };
                (i, branch)
            })
            .collect();
        for (i, branch) in scored {
            out[i] = branch;
        }
        out
    }
}

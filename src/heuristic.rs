//! Heuristic evaluators over a static grid snapshot.
//!
//! All three operate on tile levels (log2 of the value, 0 for an empty
//! cell) and are framed as costs: lower means a calmer, better-ordered
//! board, so the search minimizes them. They are pure functions of grid
//! state with no shared or global state.

use crate::grid::{Grid, Position};

/// Pairwise weight for horizontally adjacent unequal levels.
const BETA_H: f64 = 10.0;

/// Weight on squared increasing-level deltas in `entropy2`.
const CH: f64 = 1.5;

impl Grid {
    /// Level of the cell at (x, y): log2 of its value, 0 if empty.
    fn level(&self, x: i32, y: i32) -> f64 {
        self.cell_content(Position::new(x, y))
            .map_or(0.0, |tile| (tile.value as f64).log2())
    }

    /// The down and right neighbors of (x, y) that lie on the board.
    ///
    /// Restricting the neighbor graph to these two avoids counting each
    /// adjacent pair twice.
    fn forward_neighbors(&self, x: i32, y: i32) -> impl Iterator<Item = Position> + '_ {
        [Position::new(x, y + 1), Position::new(x + 1, y)]
            .into_iter()
            .filter(|position| self.within_bounds(*position))
    }

    /// Boustrophedon disorder measure.
    ///
    /// Sweeps the rows alternating left-to-right and right-to-left,
    /// accumulating the squared delta whenever the level rises along the
    /// sweep, plus the squared occupied-cell count. A board whose levels
    /// never increase along the snake path scores only the occupancy term.
    pub fn entropy(&self) -> f64 {
        let size = self.size() as i32;
        let mut entropy = 0.0;
        let mut cells = 0u32;

        let mut last_level = self.level(0, 0);
        if self.cell_occupied(Position::new(0, 0)) {
            cells += 1;
        }

        let mut reversed = false;
        for y in 0..size {
            for x in 0..size {
                if x == 0 && y == 0 {
                    continue;
                }
                let coord_x = if reversed { size - 1 - x } else { x };
                let level = self.level(coord_x, y);
                if self.cell_occupied(Position::new(coord_x, y)) {
                    cells += 1;
                }
                if level > last_level {
                    let delta = level - last_level;
                    entropy += delta * delta;
                }
                last_level = level;
            }
            reversed = !reversed;
        }

        entropy + f64::from(cells * cells)
    }

    /// Pairwise-potential energy over the down+right neighbor graph.
    ///
    /// Unary potential per cell is its level. Each unequal-level pair costs
    /// `BETA_H` when horizontal and `1/(size - x)` when vertical, so
    /// vertical disorder is punished more toward the left edge. Equal
    /// neighbors cost nothing, which favors few, large, contiguous regions.
    pub fn map_estimation(&self) -> f64 {
        let size = self.size() as i32;
        let mut unary = 0.0;
        let mut pairwise = 0.0;

        for x in 0..size {
            for y in 0..size {
                let level = self.level(x, y);
                unary += level;

                for neighbor in self.forward_neighbors(x, y) {
                    let other = self.level(neighbor.x, neighbor.y);
                    if level == other {
                        continue;
                    }
                    pairwise += if neighbor.y == y {
                        BETA_H
                    } else {
                        1.0 / f64::from(size - x)
                    };
                }
            }
        }

        unary + pairwise
    }

    /// Total board energy; the quantity the search minimizes.
    #[inline]
    pub fn map_energy(&self) -> f64 {
        self.map_estimation()
    }

    /// Neighborhood disorder measure, an alternative to [`Grid::entropy`].
    ///
    /// For every cell and each of its down/right neighbors: a rising level
    /// costs `CH`·delta², and any level gap costs 1.25·|delta| scaled by the
    /// neighbor's level; the cubed occupied-cell count is added on top.
    pub fn entropy2(&self) -> f64 {
        let size = self.size() as i32;
        let mut entropy = 0.0;
        let mut cells = 0u64;

        for y in 0..size {
            for x in 0..size {
                if self.cell_occupied(Position::new(x, y)) {
                    cells += 1;
                }
                let level = self.level(x, y);

                for neighbor in self.forward_neighbors(x, y) {
                    let other = self.level(neighbor.x, neighbor.y);
                    if other > level {
                        let delta = other - level;
                        entropy += CH * delta * delta;
                    }
                    entropy += 1.25 * (other - level).abs() * other;
                }
            }
        }

        entropy + (cells * cells * cells) as f64
    }
}

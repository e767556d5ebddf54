use rand::Rng;
use std::fmt;

/// A direction to slide/merge tiles.
///
/// The discriminants form the stable boundary encoding used by display and
/// input layers: 0=up, 1=right, 2=down, 3=left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in boundary-code order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector in (x, y) space; y grows downward.
    #[inline]
    pub fn vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// The stable boundary code for this direction.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Decode a boundary code back into a direction.
    pub fn from_index(index: u8) -> Option<Direction> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        write!(f, "{}", name)
    }
}

/// A cell coordinate. Signed so stepping off the edge is representable;
/// content queries treat out-of-bounds positions as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    #[inline]
    fn step(self, vector: (i32, i32)) -> Self {
        Position::new(self.x + vector.0, self.y + vector.1)
    }
}

/// A numbered tile occupying one cell.
///
/// `merged` records that the tile was produced by a merge during the current
/// `shift` call; it blocks a second merge in the same lane and is cleared at
/// the start of the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub position: Position,
    pub value: u32,
    merged: bool,
}

impl Tile {
    pub fn new(position: Position, value: u32) -> Self {
        Tile {
            position,
            value,
            merged: false,
        }
    }
}

/// Result of one `shift` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// True if any tile ended up away from its starting cell.
    pub moved: bool,
    /// Sum of the values of all tiles created by merges this call.
    pub score: u32,
    /// True if a merge produced a tile above the win threshold.
    pub won: bool,
}

/// A square board of optional tiles, indexed `[x][y]` (x = column, y = row).
///
/// `Clone` deep-copies every tile, so a cloned grid never aliases the
/// original; the search relies on this to explore hypothetical futures
/// without disturbing the live board.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Option<Tile>>>,
    /// False once a slide or merge has resolved, until the computer's
    /// random-tile reply hands the turn back.
    pub player_turn: bool,
}

impl Grid {
    /// Number of random tiles placed by `add_start_tiles`.
    pub const START_TILES: usize = 2;

    /// A merged tile whose value exceeds this wins the game.
    pub const WIN_VALUE: u32 = 8000;

    /// Allocate an empty `size`×`size` grid with the player to move.
    pub fn new(size: usize) -> Self {
        Grid {
            size,
            cells: vec![vec![None; size]; size],
            player_turn: true,
        }
    }

    /// Build a grid from row-major values; 0 means empty.
    ///
    /// The grid size is the number of rows. Intended for tests and display
    /// layers that already hold a value matrix.
    ///
    /// ```
    /// use energy_2048::grid::{Direction, Grid};
    ///
    /// let mut grid = Grid::from_rows(&[
    ///     [2, 2, 4, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    /// ]);
    /// let outcome = grid.shift(Direction::Left);
    /// assert!(outcome.moved);
    /// assert_eq!(outcome.score, 4);
    /// assert_eq!(grid.to_rows()[0], vec![4, 4, 0, 0]);
    /// ```
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Self {
        let size = rows.len();
        let mut grid = Grid::new(size);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            debug_assert_eq!(row.len(), size, "rows must form a square matrix");
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    let position = Position::new(x as i32, y as i32);
                    grid.insert_tile(Tile::new(position, value));
                }
            }
        }
        grid
    }

    /// Dump tile values row-major; 0 means empty.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        (0..self.size)
            .map(|y| {
                (0..self.size)
                    .map(|x| self.cells[x][y].map_or(0, |tile| tile.value))
                    .collect()
            })
            .collect()
    }

    /// Board edge length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// True if `position` lies on the board.
    #[inline]
    pub fn within_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.x < self.size as i32
            && position.y >= 0
            && position.y < self.size as i32
    }

    /// The tile at `position`, if any. Out-of-bounds positions report empty.
    pub fn cell_content(&self, position: Position) -> Option<&Tile> {
        if self.within_bounds(position) {
            self.cells[position.x as usize][position.y as usize].as_ref()
        } else {
            None
        }
    }

    #[inline]
    pub fn cell_occupied(&self, position: Position) -> bool {
        self.cell_content(position).is_some()
    }

    #[inline]
    pub fn cell_available(&self, position: Position) -> bool {
        !self.cell_occupied(position)
    }

    /// Every empty coordinate on the board.
    pub fn available_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        for x in 0..self.size {
            for y in 0..self.size {
                if self.cells[x][y].is_none() {
                    cells.push(Position::new(x as i32, y as i32));
                }
            }
        }
        cells
    }

    /// True if any cell is empty.
    pub fn cells_available(&self) -> bool {
        self.cells
            .iter()
            .any(|column| column.iter().any(|cell| cell.is_none()))
    }

    /// A uniformly random empty cell, or `None` on a full board.
    pub fn random_available_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let cells = self.available_cells();
        if cells.is_empty() {
            None
        } else {
            Some(cells[rng.gen_range(0..cells.len())])
        }
    }

    /// Place a tile at its own stored position, replacing any occupant.
    pub fn insert_tile(&mut self, tile: Tile) {
        self.cells[tile.position.x as usize][tile.position.y as usize] = Some(tile);
    }

    /// Clear the cell at the tile's stored position.
    pub fn remove_tile(&mut self, tile: &Tile) {
        self.cells[tile.position.x as usize][tile.position.y as usize] = None;
    }

    /// Seed a fresh board with the starting tiles.
    pub fn add_start_tiles<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..Self::START_TILES {
            self.add_random_tile(rng);
        }
    }

    /// Spawn a 2 (90%) or 4 (10%) on a random empty cell.
    ///
    /// Silent no-op on a full board.
    pub fn add_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(cell) = self.random_available_cell(rng) {
            let value = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
            self.insert_tile(Tile::new(cell, value));
        }
    }

    /// Convenience: like `add_random_tile` but uses thread-local RNG.
    pub fn add_random_tile_thread(&mut self) {
        let mut rng = rand::thread_rng();
        self.add_random_tile(&mut rng);
    }

    /// The computer's reply: spawn a random tile and hand the turn back.
    pub fn computer_move<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.add_random_tile(rng);
        self.player_turn = true;
    }

    /// Slide and merge every tile toward `direction`.
    ///
    /// Cells are visited starting from the side the tiles move toward, so a
    /// tile settles into its final slot before the tiles behind it resolve.
    /// Each tile merges at most once per call: a freshly merged tile carries
    /// the `merged` mark and refuses further merges until the next call.
    ///
    /// A direction with no effect returns `moved == false` and leaves the
    /// board untouched; callers must not spawn a tile after such a no-op.
    pub fn shift(&mut self, direction: Direction) -> MoveOutcome {
        let vector = direction.vector();
        let (xs, ys) = self.build_traversals(vector);
        let mut outcome = MoveOutcome::default();

        self.prepare_tiles();

        for &x in &xs {
            for &y in &ys {
                let cell = Position::new(x as i32, y as i32);
                let tile = match self.cell_content(cell) {
                    Some(tile) => *tile,
                    None => continue,
                };
                let (farthest, next) = self.find_farthest_position(cell, vector);

                let mergeable = matches!(
                    self.cell_content(next),
                    Some(other) if other.value == tile.value && !other.merged
                );
                let final_position = if mergeable {
                    let merged = Tile {
                        position: next,
                        value: tile.value * 2,
                        merged: true,
                    };
                    self.remove_tile(&tile);
                    self.insert_tile(merged);
                    outcome.score += merged.value;
                    if merged.value > Self::WIN_VALUE {
                        outcome.won = true;
                    }
                    next
                } else {
                    self.move_tile(cell, farthest);
                    farthest
                };

                if final_position != cell {
                    // The player's turn ends as soon as any tile moves.
                    self.player_turn = false;
                    outcome.moved = true;
                }
            }
        }

        outcome
    }

    /// True while any move remains: an empty cell, or an adjacent equal pair.
    pub fn moves_available(&self) -> bool {
        self.cells_available() || self.tile_matches_available()
    }

    /// True if two orthogonally adjacent cells hold equal values.
    pub fn tile_matches_available(&self) -> bool {
        for x in 0..self.size as i32 {
            for y in 0..self.size as i32 {
                let tile = match self.cell_content(Position::new(x, y)) {
                    Some(tile) => tile,
                    None => continue,
                };
                for direction in Direction::ALL {
                    let neighbor = Position::new(x, y).step(direction.vector());
                    if let Some(other) = self.cell_content(neighbor) {
                        if other.value == tile.value {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// True if any tile's value exceeds the win threshold.
    pub fn is_win(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .any(|tile| tile.value > Self::WIN_VALUE)
    }

    /// Largest tile value on the board, 0 when empty.
    pub fn highest_tile(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .map(|tile| tile.value)
            .max()
            .unwrap_or(0)
    }

    /// Clear merge marks before a new move resolves.
    fn prepare_tiles(&mut self) {
        for column in &mut self.cells {
            for cell in column {
                if let Some(tile) = cell {
                    tile.merged = false;
                }
            }
        }
    }

    /// Visit order over both axes: descending on an axis whose vector
    /// component is +1, ascending otherwise.
    fn build_traversals(&self, vector: (i32, i32)) -> (Vec<usize>, Vec<usize>) {
        let mut xs: Vec<usize> = (0..self.size).collect();
        let mut ys: Vec<usize> = (0..self.size).collect();
        if vector.0 == 1 {
            xs.reverse();
        }
        if vector.1 == 1 {
            ys.reverse();
        }
        (xs, ys)
    }

    /// Walk from `cell` along `vector` over empty cells.
    ///
    /// Returns the farthest empty cell reached and the first blocked (or
    /// out-of-bounds) cell beyond it, which is the merge candidate.
    fn find_farthest_position(&self, cell: Position, vector: (i32, i32)) -> (Position, Position) {
        let mut previous = cell;
        let mut probe = cell.step(vector);
        while self.within_bounds(probe) && self.cell_available(probe) {
            previous = probe;
            probe = probe.step(vector);
        }
        (previous, probe)
    }

    fn move_tile(&mut self, from: Position, to: Position) {
        if from == to {
            return;
        }
        if let Some(mut tile) = self.cells[from.x as usize][from.y as usize].take() {
            tile.position = to;
            self.cells[to.x as usize][to.y as usize] = Some(tile);
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                match self.cells[x][y] {
                    Some(tile) => write!(f, "{} ", tile.value)?,
                    None => write!(f, "_ ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn tile_sum(grid: &Grid) -> u64 {
        grid.to_rows()
            .iter()
            .flatten()
            .map(|&v| u64::from(v))
            .sum()
    }

    #[test]
    fn shift_left_merges_once_per_pair() {
        let mut grid = Grid::from_rows(&[
            [2, 2, 4, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = grid.shift(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.score, 4);
        assert!(!outcome.won);
        // The merged 4 must not chain into the existing 4.
        assert_eq!(grid.to_rows()[0], vec![4, 4, 0, 0]);
    }

    #[test]
    fn shift_left_merges_pairs_independently() {
        let mut grid = Grid::from_rows(&[
            [2, 2, 2, 2],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = grid.shift(Direction::Left);
        assert_eq!(grid.to_rows()[0], vec![4, 4, 0, 0]);
        assert_eq!(outcome.score, 8);
    }

    #[test]
    fn traversal_resolves_destination_side_first() {
        // The leading 2 reaches the wall first, the next pair merges behind
        // it, and the freshly merged 4 blocks the trailing tile.
        let mut grid = Grid::from_rows(&[
            [0, 2, 2, 2],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = grid.shift(Direction::Left);
        assert_eq!(grid.to_rows()[0], vec![4, 2, 0, 0]);
        assert_eq!(outcome.score, 4);
    }

    #[test]
    fn shift_right_traverses_descending() {
        let mut grid = Grid::from_rows(&[
            [2, 2, 4, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = grid.shift(Direction::Right);
        assert_eq!(grid.to_rows()[0], vec![0, 0, 4, 4]);
        assert_eq!(outcome.score, 4);
    }

    #[test]
    fn shift_up_and_down_work_on_columns() {
        let mut grid = Grid::from_rows(&[
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [4, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut up = grid.clone();
        let outcome = up.shift(Direction::Up);
        assert_eq!(outcome.score, 4);
        assert_eq!(up.to_rows()[0][0], 4);
        assert_eq!(up.to_rows()[1][0], 4);
        assert_eq!(up.to_rows()[2][0], 0);

        let outcome = grid.shift(Direction::Down);
        assert_eq!(outcome.score, 4);
        assert_eq!(grid.to_rows()[3][0], 4);
        assert_eq!(grid.to_rows()[2][0], 4);
        assert_eq!(grid.to_rows()[1][0], 0);
    }

    #[test]
    fn noop_shift_reports_unmoved_and_changes_nothing() {
        let mut grid = Grid::from_rows(&[
            [2, 0, 0, 0],
            [4, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let before = grid.to_rows();
        let outcome = grid.shift(Direction::Left);
        assert!(!outcome.moved);
        assert_eq!(outcome.score, 0);
        assert!(!outcome.won);
        assert_eq!(grid.to_rows(), before);
        // The turn flag only flips when something moved.
        assert!(grid.player_turn);
    }

    #[test]
    fn merges_conserve_tile_mass() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut grid = Grid::new(4);
        grid.add_start_tiles(&mut rng);
        for _ in 0..30 {
            for direction in Direction::ALL {
                let before = tile_sum(&grid);
                let outcome = grid.shift(direction);
                assert_eq!(tile_sum(&grid), before);
                if outcome.moved {
                    grid.computer_move(&mut rng);
                    break;
                }
            }
            if !grid.moves_available() {
                break;
            }
        }
    }

    #[test]
    fn score_equals_sum_of_merged_values() {
        let mut grid = Grid::from_rows(&[
            [2, 2, 0, 0],
            [8, 8, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = grid.shift(Direction::Left);
        assert_eq!(outcome.score, 4 + 16);
    }

    #[test]
    fn clone_is_isolated_from_original() {
        let grid = Grid::from_rows(&[
            [2, 2, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let before = grid.to_rows();
        let mut copy = grid.clone();
        let outcome = copy.shift(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(grid.to_rows(), before);
        assert!(grid.player_turn);
        assert!(!copy.player_turn);
        assert_eq!(copy.size(), grid.size());
    }

    #[test]
    fn packed_board_with_distinct_neighbors_is_terminal() {
        let mut grid = Grid::from_rows(&[
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [512, 1024, 2048, 4096],
            [8192, 2, 4, 8],
        ]);
        assert!(!grid.cells_available());
        assert!(!grid.tile_matches_available());
        assert!(!grid.moves_available());
        for direction in Direction::ALL {
            assert!(!grid.shift(direction).moved);
        }
    }

    #[test]
    fn packed_board_with_one_equal_pair_has_moves() {
        let grid = Grid::from_rows(&[
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [512, 1024, 2048, 4096],
            [8192, 2, 4, 4],
        ]);
        assert!(!grid.cells_available());
        assert!(grid.tile_matches_available());
        assert!(grid.moves_available());
    }

    #[test]
    fn out_of_bounds_queries_report_empty() {
        let grid = Grid::from_rows(&[
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [512, 1024, 2048, 4096],
            [8192, 2, 4, 8],
        ]);
        assert!(grid.cell_content(Position::new(-1, 0)).is_none());
        assert!(grid.cell_content(Position::new(0, -1)).is_none());
        assert!(grid.cell_content(Position::new(4, 0)).is_none());
        assert!(grid.cell_content(Position::new(0, 4)).is_none());
        assert!(grid.cell_available(Position::new(-1, -1)));
    }

    #[test]
    fn random_tile_lands_on_an_empty_cell_with_legal_value() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(4);
        grid.add_random_tile(&mut rng);
        let values: Vec<u32> = grid
            .to_rows()
            .into_iter()
            .flatten()
            .filter(|&v| v != 0)
            .collect();
        assert_eq!(values.len(), 1);
        assert!(values[0] == 2 || values[0] == 4);
        assert_eq!(grid.available_cells().len(), 15);
    }

    #[test]
    fn add_random_tile_on_full_board_is_a_noop() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut grid = Grid::from_rows(&[
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [512, 1024, 2048, 4096],
            [8192, 2, 4, 8],
        ]);
        let before = grid.to_rows();
        grid.add_random_tile(&mut rng);
        assert_eq!(grid.to_rows(), before);
    }

    #[test]
    fn start_tiles_seed_two_cells() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(4);
        grid.add_start_tiles(&mut rng);
        assert_eq!(grid.available_cells().len(), 14);
        assert!(grid.player_turn);
    }

    #[test]
    fn win_detection_uses_the_threshold() {
        let grid = Grid::from_rows(&[
            [8192, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        assert!(grid.is_win());

        let grid = Grid::from_rows(&[
            [4096, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        assert!(!grid.is_win());
    }

    #[test]
    fn merging_past_the_threshold_sets_won() {
        let mut grid = Grid::from_rows(&[
            [4096, 4096, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = grid.shift(Direction::Left);
        assert!(outcome.moved);
        assert!(outcome.won);
        assert_eq!(outcome.score, 8192);
        assert!(grid.is_win());
    }

    #[test]
    fn reduced_two_by_two_example() {
        let mut grid = Grid::from_rows(&[[2, 2], [0, 0]]);
        let outcome = grid.shift(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.score, 4);
        assert_eq!(grid.to_rows(), vec![vec![4, 0], vec![0, 0]]);
    }

    #[test]
    fn computer_move_restores_player_turn() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = Grid::from_rows(&[
            [2, 2, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        assert!(grid.shift(Direction::Left).moved);
        assert!(!grid.player_turn);
        let empty_before = grid.available_cells().len();
        grid.computer_move(&mut rng);
        assert!(grid.player_turn);
        assert_eq!(grid.available_cells().len(), empty_before - 1);
    }

    #[test]
    fn direction_boundary_codes_are_stable() {
        assert_eq!(Direction::Up.index(), 0);
        assert_eq!(Direction::Right.index(), 1);
        assert_eq!(Direction::Down.index(), 2);
        assert_eq!(Direction::Left.index(), 3);
        for direction in Direction::ALL {
            assert_eq!(Direction::from_index(direction.index()), Some(direction));
        }
        assert_eq!(Direction::from_index(4), None);
        assert_eq!(Direction::Left.to_string(), "left");
    }

    #[test]
    fn display_renders_rows_with_underscores() {
        let grid = Grid::from_rows(&[[2, 0], [0, 4]]);
        assert_eq!(grid.to_string(), "2 _ \n_ 4 \n");
    }

    #[test]
    fn highest_tile_tracks_the_maximum() {
        assert_eq!(Grid::new(4).highest_tile(), 0);
        let grid = Grid::from_rows(&[[2, 0], [0, 64]]);
        assert_eq!(grid.highest_tile(), 64);
    }
}

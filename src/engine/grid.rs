use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::line::{compact_line, LineOutcome};
use super::tile::MergeSlot;
use super::{EngineError, Move, Tile};

/// Side length used when callers have no preference.
pub const DEFAULT_SIZE: usize = 4;

/// An N×N 2048 grid snapshot.
///
/// Cells are owned, row-major, indexed `[row][col]`. A `Grid` is never
/// mutated once handed out: moves return a fresh snapshot, so any number
/// of branches can be explored from the same state without aliasing.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridRepr", into = "GridRepr")]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
    score: u64,
}

impl Grid {
    /// An all-empty grid with score 0. No tile is spawned.
    pub fn empty(size: usize) -> Result<Self, EngineError> {
        if size == 0 {
            return Err(EngineError::ZeroSize);
        }
        Ok(Grid { size, cells: vec![Tile::EMPTY; size * size], score: 0 })
    }

    /// A fresh grid seeded with a single 2 at a uniformly random cell.
    ///
    /// ```
    /// use grid_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let g = Grid::new(4, &mut rng).unwrap();
    /// assert_eq!(g.count_empty(), 15);
    /// assert_eq!(g.highest_tile(), 2);
    /// assert_eq!(g.score(), 0);
    /// ```
    pub fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, EngineError> {
        Ok(Self::empty(size)?.with_random_tile(rng))
    }

    /// Convenience: like `new` but uses thread-local RNG.
    pub fn new_thread(size: usize) -> Result<Self, EngineError> {
        let mut rng = rand::thread_rng();
        Self::new(size, &mut rng)
    }

    /// Build a snapshot from explicit row values and a starting score.
    ///
    /// Every row must have as many cells as there are rows, and every value
    /// must be 0 or a power of two >= 2.
    ///
    /// ```
    /// use grid_2048::engine::Grid;
    /// let g = Grid::from_values([[2, 0], [0, 4]], 12).unwrap();
    /// assert_eq!(g.values(), vec![vec![2, 0], vec![0, 4]]);
    /// assert_eq!(g.score(), 12);
    /// assert!(Grid::from_values([[2, 0, 0], [0, 4, 0]], 0).is_err());
    /// ```
    pub fn from_values<I, R>(rows: I, score: u64) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u64]>,
    {
        let rows: Vec<R> = rows.into_iter().collect();
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::ZeroSize);
        }
        let mut cells = Vec::with_capacity(size * size);
        for row in &rows {
            let row = row.as_ref();
            if row.len() != size {
                return Err(EngineError::NotSquare { expected: size, found: row.len() });
            }
            for &v in row {
                cells.push(Tile::from_value(v)?);
            }
        }
        Ok(Grid { size, cells, score })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cumulative sum of every merge result since this line of play began,
    /// saturating at `u64::MAX`.
    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Row-major tiles.
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.cells
    }

    /// Iterate over rows as tile slices.
    pub fn rows(&self) -> std::slice::Chunks<'_, Tile> {
        self.cells.chunks(self.size)
    }

    /// Face values as an N×N matrix (0 = empty).
    pub fn values(&self) -> Vec<Vec<u64>> {
        self.rows().map(|row| row.iter().map(|t| t.value()).collect()).collect()
    }

    /// Face value at `[row][col]`, `None` when out of bounds.
    pub fn value(&self, row: usize, col: usize) -> Option<u64> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.cells[row * self.size + col].value())
    }

    /// Count the number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|t| t.is_empty()).count()
    }

    /// `(row, col)` of every empty cell in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_empty())
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    /// Highest face value on the grid, 0 when empty.
    pub fn highest_tile(&self) -> u64 {
        self.cells.iter().map(|t| t.value()).max().unwrap_or(0)
    }

    /// Slide/merge in `dir` without spawning. Returns the new snapshot and
    /// whether any tile moved or merged.
    ///
    /// ```
    /// use grid_2048::engine::{Grid, Move};
    /// let g = Grid::from_values([[2, 2], [0, 4]], 0).unwrap();
    /// let (moved, changed) = g.shift(Move::Left);
    /// assert!(changed);
    /// assert_eq!(moved.values(), vec![vec![4, 0], vec![4, 0]]);
    /// assert_eq!(moved.score(), 4);
    /// assert_eq!(g.score(), 0);
    /// ```
    pub fn shift(&self, dir: Move) -> (Grid, bool) {
        let (cells, outcome) = self.resolve(dir);
        let next = Grid { size: self.size, cells, score: self.score.saturating_add(outcome.gained) };
        (next, outcome.changed)
    }

    /// Perform a move, then spawn a 2 on a random empty cell if the move
    /// changed anything, using the provided RNG.
    ///
    /// The receiver is left untouched. When nothing moved the returned grid
    /// equals the receiver cell for cell and no tile is spawned.
    ///
    /// ```
    /// use grid_2048::engine::{Grid, Move};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let g = Grid::from_values([[0, 2], [0, 0]], 0).unwrap();
    /// let (next, changed) = g.get_moved(Move::Left, &mut rng);
    /// assert!(changed);
    /// assert_eq!(next.value(0, 0), Some(2));
    /// assert_eq!(next.count_empty(), 2);
    /// ```
    pub fn get_moved<R: Rng + ?Sized>(&self, dir: Move, rng: &mut R) -> (Grid, bool) {
        let (next, changed) = self.shift(dir);
        if changed {
            (next.with_random_tile(rng), true)
        } else {
            (next, false)
        }
    }

    /// Convenience: like `get_moved` but uses thread-local RNG.
    pub fn get_moved_thread(&self, dir: Move) -> (Grid, bool) {
        let mut rng = rand::thread_rng();
        self.get_moved(dir, &mut rng)
    }

    /// Place a 2 on an empty cell chosen uniformly at random. A full grid is
    /// returned unchanged.
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        let empty: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_empty())
            .map(|(idx, _)| idx)
            .collect();
        if empty.is_empty() {
            return self;
        }
        let idx = empty[rng.gen_range(0..empty.len())];
        self.cells[idx] = Tile::TWO;
        log::trace!("spawned 2 at ({}, {})", idx / self.size, idx % self.size);
        self
    }

    /// Directions that would change the grid, in `Move::ALL` order.
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::ALL.into_iter().filter(|&m| self.resolve(m).1.changed).collect()
    }

    /// True when no empty cell remains and no two horizontally or vertically
    /// adjacent cells hold the same value. Adjacent 2^63 tiles can't merge
    /// and don't count.
    ///
    /// ```
    /// use grid_2048::engine::Grid;
    /// assert!(Grid::from_values([[2, 4], [4, 2]], 0).unwrap().is_over());
    /// assert!(!Grid::from_values([[2, 2], [4, 8]], 0).unwrap().is_over());
    /// assert!(!Grid::from_values([[2, 0], [4, 8]], 0).unwrap().is_over());
    /// ```
    pub fn is_over(&self) -> bool {
        if self.cells.iter().any(|t| t.is_empty()) {
            return false;
        }
        let n = self.size;
        for row in 0..n {
            for col in 0..n {
                let here = MergeSlot::from(self.cells[row * n + col]);
                if col + 1 < n && here.can_merge(MergeSlot::from(self.cells[row * n + col + 1])) {
                    return false;
                }
                if row + 1 < n && here.can_merge(MergeSlot::from(self.cells[(row + 1) * n + col])) {
                    return false;
                }
            }
        }
        true
    }

    /// Would a left-to-right pass over every row merge anything?
    ///
    /// Read-only lookahead: neither the grid nor its score is touched.
    pub fn equal_in_row(&self) -> bool {
        self.resolve(Move::Left).1.merges > 0
    }

    /// Would a top-to-bottom pass over every column merge anything?
    pub fn equal_in_column(&self) -> bool {
        self.resolve(Move::Up).1.merges > 0
    }

    /// Cell indices of line `line` for `dir`, ordered so the pass always
    /// slides toward position 0.
    fn line_indices(&self, dir: Move, line: usize) -> impl Iterator<Item = usize> + '_ {
        let n = self.size;
        (0..n).map(move |i| {
            let pos = if dir.is_reversed() { n - 1 - i } else { i };
            if dir.is_vertical() { pos * n + line } else { line * n + pos }
        })
    }

    /// Run the line pass for every line in `dir` into a new cell buffer.
    fn resolve(&self, dir: Move) -> (Vec<Tile>, LineOutcome) {
        let mut cells = self.cells.clone();
        let mut outcome = LineOutcome::default();
        let mut buf: Vec<MergeSlot> = Vec::with_capacity(self.size);
        for line in 0..self.size {
            buf.clear();
            buf.extend(self.line_indices(dir, line).map(|idx| MergeSlot::from(self.cells[idx])));
            outcome.absorb(compact_line(&mut buf));
            for (idx, slot) in self.line_indices(dir, line).zip(&buf) {
                cells[idx] = slot.tile();
            }
        }
        (cells, outcome)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.size)
            .field("score", &self.score)
            .field("values", &self.values())
            .finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divider = "-".repeat(self.size * 8);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f, "{}", divider)?;
            }
            let cells: Vec<String> = row.iter().map(|t| format_val(*t)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(tile: Tile) -> String {
    if tile.is_empty() {
        return " ".repeat(7);
    }
    format!("{:^7}", tile.value())
}

/// Wire shape for a `Grid`; converting back re-checks every invariant.
#[derive(Serialize, Deserialize)]
pub(crate) struct GridRepr {
    size: usize,
    cells: Vec<u64>,
    score: u64,
}

impl From<Grid> for GridRepr {
    fn from(grid: Grid) -> Self {
        GridRepr {
            size: grid.size,
            cells: grid.cells.iter().map(|t| t.value()).collect(),
            score: grid.score,
        }
    }
}

impl TryFrom<GridRepr> for Grid {
    type Error = EngineError;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        if repr.size == 0 {
            return Err(EngineError::ZeroSize);
        }
        let expected = repr.size * repr.size;
        if repr.cells.len() != expected {
            return Err(EngineError::NotSquare { expected, found: repr.cells.len() });
        }
        let cells = repr.cells.into_iter().map(Tile::from_value).collect::<Result<Vec<_>, _>>()?;
        Ok(Grid { size: repr.size, cells, score: repr.score })
    }
}

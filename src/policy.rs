//! Move-selection policies.
//!
//! Policies only use the public `Grid` surface (`shift`, `legal_moves`,
//! `equal_in_row`, `equal_in_column`). They never spawn tiles; the caller
//! applies the chosen move with `Grid::get_moved`.
//!
//! ```
//! use grid_2048::engine::Grid;
//! use grid_2048::policy::{Policy, PolicyKind};
//! let g = Grid::from_values([[2, 2], [0, 0]], 0).unwrap();
//! let mut p = PolicyKind::Greedy.build(0);
//! assert!(p.next_move(&g).is_some());
//! ```

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::engine::{Grid, Move};

/// Preference order used for tie-breaking and fallbacks.
pub const PREFERENCE: [Move; 4] = [Move::Left, Move::Up, Move::Right, Move::Down];

/// Chooses the next direction for a grid.
pub trait Policy: Send {
    /// `None` only when no direction changes the grid.
    fn next_move(&mut self, grid: &Grid) -> Option<Move>;
}

/// Selectable policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PolicyKind {
    /// Highest immediate score gain.
    #[default]
    Greedy,
    /// Merge along rows, then columns, when a merge is available.
    MergeFirst,
    /// Rotate Left, Up, Right, Down.
    Cycle,
    /// Uniformly random legal move.
    Random,
}

impl PolicyKind {
    /// Build a boxed policy. `seed` only matters for `Random`.
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Greedy => Box::new(Greedy),
            PolicyKind::MergeFirst => Box::new(MergeFirst),
            PolicyKind::Cycle => Box::new(Cycle::default()),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

/// One-ply greedy: the legal move with the best resulting score.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Policy for Greedy {
    fn next_move(&mut self, grid: &Grid) -> Option<Move> {
        let mut best: Option<(Move, u64)> = None;
        for dir in PREFERENCE {
            let (next, changed) = grid.shift(dir);
            if !changed {
                continue;
            }
            match best {
                Some((_, score)) if score >= next.score() => {}
                _ => best = Some((dir, next.score())),
            }
        }
        best.map(|(dir, _)| dir)
    }
}

/// Uses the cheap merge lookahead before falling back to preference order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeFirst;

impl Policy for MergeFirst {
    fn next_move(&mut self, grid: &Grid) -> Option<Move> {
        if grid.equal_in_row() {
            return Some(Move::Left);
        }
        if grid.equal_in_column() {
            return Some(Move::Up);
        }
        first_legal(grid, PREFERENCE)
    }
}

/// Rotates through `PREFERENCE`, skipping directions that would not move.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cycle {
    next: usize,
}

impl Policy for Cycle {
    fn next_move(&mut self, grid: &Grid) -> Option<Move> {
        for offset in 0..PREFERENCE.len() {
            let idx = (self.next + offset) % PREFERENCE.len();
            if grid.shift(PREFERENCE[idx]).1 {
                self.next = (idx + 1) % PREFERENCE.len();
                return Some(PREFERENCE[idx]);
            }
        }
        None
    }
}

/// Picks uniformly among legal moves from its own seeded RNG.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Policy for RandomPolicy {
    fn next_move(&mut self, grid: &Grid) -> Option<Move> {
        grid.legal_moves().choose(&mut self.rng).copied()
    }
}

fn first_legal(grid: &Grid, order: [Move; 4]) -> Option<Move> {
    order.into_iter().find(|&dir| grid.shift(dir).1)
}

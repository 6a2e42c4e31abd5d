//! Engine module: N×N 2048 grid snapshots, the move/merge pass, random
//! spawns and the terminal check.
//!
//! - `Grid` is an owned, immutable snapshot; every move returns a new one.
//! - `Move` is the direction type with its numeric and text conversions.
//! - `Tile` is the cell value type (0 = empty, otherwise a power of two).
//! - Line compaction and the move-scoped merge marker live in private
//!   submodules.

mod grid;
mod line;
mod moves;
mod tile;

pub(crate) use grid::GridRepr;
pub use grid::{Grid, DEFAULT_SIZE};
pub use moves::Move;
pub use tile::Tile;

/// Errors raised by the engine.
///
/// Every operation on a valid `Grid` is total; these only come from
/// converting outside input into engine types.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),
    #[error("invalid tile value {value}: must be 0 or a power of two >= 2")]
    InvalidTile { value: u64 },
    #[error("grid size must be at least 1")]
    ZeroSize,
    #[error("grid is not square: expected {expected} cells, found {found}")]
    NotSquare { expected: usize, found: usize },
}

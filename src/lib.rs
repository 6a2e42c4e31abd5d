//! grid-2048: an immutable-snapshot 2048 grid engine
//!
//! This crate provides:
//! - An N×N `Grid` snapshot type with the move/merge pass, random spawns and
//!   the terminal check (`engine` module)
//! - Simple move-selection policies built on the public grid API (`policy`)
//! - Seeded, parallel self-play (`play`)
//! - A postcard snapshot encoding (`serialization`)
//!
//! Quick start:
//! ```
//! use grid_2048::engine::{Grid, Move, DEFAULT_SIZE};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic grid initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = Grid::new(DEFAULT_SIZE, &mut rng).unwrap();
//! let (g1, changed) = g0.get_moved(Move::Left, &mut rng);
//! assert!(g1.score() >= g0.score());
//! assert!(changed || g1 == g0);
//! ```
//!
//! Moves never mutate the receiver, so branching is just calling
//! `get_moved` (or the spawn-free `shift`) several times on one grid:
//! ```
//! use grid_2048::engine::{Grid, Move};
//!
//! let g = Grid::from_values([[2, 2, 0], [0, 4, 4], [0, 0, 0]], 0).unwrap();
//! let best = Move::ALL
//!     .into_iter()
//!     .map(|m| (m, g.shift(m)))
//!     .filter(|(_, (_, changed))| *changed)
//!     .max_by_key(|(_, (next, _))| next.score())
//!     .map(|(m, _)| m);
//! assert!(best.is_some());
//! assert_eq!(g.score(), 0);
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use grid_2048::engine::Grid;
//! use grid_2048::policy::{Policy, Greedy};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut policy = Greedy;
//! let mut g = Grid::new(4, &mut rng).unwrap();
//! let mut moves = 0u32;
//! while !g.is_over() && moves < 8 {
//!     match policy.next_move(&g) {
//!         Some(dir) => g = g.get_moved(dir, &mut rng).0,
//!         None => break,
//!     }
//!     moves += 1;
//! }
//! assert!(moves > 0);
//! ```
//!
pub mod engine;
pub mod play;
pub mod policy;
pub mod serialization;

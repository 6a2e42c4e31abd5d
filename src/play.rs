//! Headless self-play: drive a `Policy` against the engine until the grid
//! is over, the policy gives up, or a move cap is hit.
//!
//! Every game owns its RNG, seeded from the game seed, so a seed fully
//! determines the game. Batches run games in parallel with rayon; game `i`
//! of a batch uses `base_seed + i`.
//!
//! ```
//! use grid_2048::play::{play_game, PlayConfig};
//! let cfg = PlayConfig { max_moves: Some(20), ..PlayConfig::default() };
//! let a = play_game(&cfg, 5).unwrap();
//! let b = play_game(&cfg, 5).unwrap();
//! assert_eq!(a, b);
//! assert!(a.moves <= 20);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::engine::{EngineError, Grid, Move, DEFAULT_SIZE};
use crate::policy::PolicyKind;

/// Knobs for a self-play run. Defaults: 4×4, greedy, no cap, random seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayConfig {
    pub size: usize,
    /// Base seed; `None` draws one from thread entropy.
    pub seed: Option<u64>,
    /// Stop after this many moves.
    pub max_moves: Option<u64>,
    pub policy: PolicyKind,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE, seed: None, max_moves: None, policy: PolicyKind::default() }
    }
}

impl PlayConfig {
    /// The configured seed, or a fresh random one.
    pub fn base_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Outcome of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub seed: u64,
    pub moves: u64,
    pub score: u64,
    pub highest_tile: u64,
    /// The grid reached a terminal state (as opposed to hitting the cap).
    pub over: bool,
    pub final_grid: Grid,
}

/// Play one game with `seed`.
pub fn play_game(cfg: &PlayConfig, seed: u64) -> Result<GameSummary, EngineError> {
    play_game_with(cfg, seed, |_, _| {})
}

/// Play one game, calling `observe` with each grid and the move about to be
/// applied (`None` for the final grid).
pub fn play_game_with<F>(cfg: &PlayConfig, seed: u64, mut observe: F) -> Result<GameSummary, EngineError>
where
    F: FnMut(&Grid, Option<Move>),
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut policy = cfg.policy.build(seed.rotate_left(32));
    let mut grid = Grid::new(cfg.size, &mut rng)?;
    let mut moves = 0u64;
    log::debug!("game {seed}: start {}x{} with {:?}", cfg.size, cfg.size, cfg.policy);

    while !grid.is_over() {
        if cfg.max_moves.is_some_and(|cap| moves >= cap) {
            break;
        }
        let Some(dir) = policy.next_move(&grid) else {
            break;
        };
        observe(&grid, Some(dir));
        let (next, changed) = grid.get_moved(dir, &mut rng);
        if !changed {
            log::warn!("game {seed}: policy chose no-op move {dir} at move {moves}");
            break;
        }
        grid = next;
        moves += 1;
    }
    observe(&grid, None);

    let summary = GameSummary {
        seed,
        moves,
        score: grid.score(),
        highest_tile: grid.highest_tile(),
        over: grid.is_over(),
        final_grid: grid,
    };
    log::debug!(
        "game {seed}: {} moves, score {}, highest {}, over={}",
        summary.moves,
        summary.score,
        summary.highest_tile,
        summary.over
    );
    Ok(summary)
}

/// Play `games` independent games in parallel, ordered by game index.
pub fn play_batch(cfg: &PlayConfig, games: u64) -> Result<Vec<GameSummary>, EngineError> {
    play_batch_with(cfg, games, || {})
}

/// Like `play_batch`, calling `on_done` (from worker threads) as each game
/// finishes.
pub fn play_batch_with<F>(cfg: &PlayConfig, games: u64, on_done: F) -> Result<Vec<GameSummary>, EngineError>
where
    F: Fn() + Sync,
{
    if cfg.size == 0 {
        return Err(EngineError::ZeroSize);
    }
    let base = cfg.base_seed();
    let results = (0..games)
        .into_par_iter()
        .map(|i| {
            let summary = play_game(cfg, base.wrapping_add(i));
            on_done();
            summary
        })
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(best) = results.iter().map(|s| s.score).max() {
        log::info!("batch of {games} from seed {base}: best score {best}");
    }
    Ok(results)
}

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use grid_2048::engine::{Grid, Move, DEFAULT_SIZE};
use grid_2048::play::{self, GameSummary, PlayConfig};
use grid_2048::policy::PolicyKind;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, Parser)]
#[command(name = "grid-2048", about = "Seeded 2048 self-play runner")]
struct Args {
    /// Grid side length
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Base seed; game i uses seed + i (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of games to play (run in parallel when > 1)
    #[arg(long, default_value_t = 1)]
    games: u64,

    /// Stop each game after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Move-selection policy
    #[arg(long, value_enum, default_value_t = PolicyKind::Greedy)]
    policy: PolicyKind,

    /// Print the grid after every move (single game only)
    #[arg(long)]
    show: bool,

    /// Suppress the progress bar and per-game lines
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn to_config(&self) -> PlayConfig {
        PlayConfig { size: self.size, seed: self.seed, max_moves: self.max_moves, policy: self.policy }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.size == 0 {
        anyhow::bail!("--size must be at least 1");
    }
    if args.games == 0 {
        anyhow::bail!("--games must be at least 1");
    }
    if args.show && args.games > 1 {
        anyhow::bail!("--show only works with a single game");
    }
    let cfg = args.to_config();
    let start = Instant::now();

    let summaries = if args.games == 1 {
        let seed = cfg.base_seed();
        let result = if args.show {
            play::play_game_with(&cfg, seed, print_step)
        } else {
            play::play_game(&cfg, seed)
        };
        vec![result.context("game failed")?]
    } else {
        run_batch(&cfg, args.games, args.quiet)?
    };

    if !args.quiet {
        for s in &summaries {
            println!(
                "seed {} | moves: {} | score: {} | highest: {}{}",
                s.seed,
                s.moves,
                s.score,
                s.highest_tile,
                if s.over { "" } else { " (capped)" }
            );
        }
    }
    print_totals(&summaries, start.elapsed());
    Ok(())
}

fn run_batch(cfg: &PlayConfig, games: u64, quiet: bool) -> anyhow::Result<Vec<GameSummary>> {
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:30}] {pos}/{len} games")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };
    let summaries = play::play_batch_with(cfg, games, || pb.inc(1)).context("batch failed")?;
    pb.finish_and_clear();
    Ok(summaries)
}

fn print_step(grid: &Grid, next: Option<Move>) {
    println!("{grid}score: {}", grid.score());
    match next {
        Some(dir) => println!("> {dir}\n"),
        None if grid.is_over() => println!("game over\n"),
        None => println!("stopped\n"),
    }
}

fn print_totals(summaries: &[GameSummary], elapsed: Duration) {
    let games = summaries.len() as u64;
    let moves: u64 = summaries.iter().map(|s| s.moves).sum();
    let best = summaries.iter().map(|s| s.score).max().unwrap_or(0);
    let mean = summaries.iter().map(|s| s.score).sum::<u64>() as f64 / games.max(1) as f64;
    let secs = elapsed.as_secs_f64().max(1e-6);
    println!(
        "Games: {} | moves/sec: {:.1} | best score: {} | mean score: {:.1}",
        games,
        moves as f64 / secs,
        best,
        mean
    );
}

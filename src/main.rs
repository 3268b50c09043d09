use std::path::PathBuf;

use clap::Parser;
use crossterm::style::{Color, Stylize};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

use taquin::{Puzzle, SearchConfig, SearchOutcome, Solver, Strategy};

/// taquin: solve a random sliding-tile puzzle with BFS, DFS or A*.
#[derive(Parser)]
#[command(name = "taquin", version, about)]
struct Cli {
    /// Board dimension (k for a k x k board).
    #[arg(long, short, default_value_t = 3)]
    size: usize,
    /// Search strategy: astar, bfs or dfs.
    #[arg(long, default_value = "astar")]
    strategy: Strategy,
    /// Path to a search config TOML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the starting board.
    #[arg(long)]
    seed: Option<u64>,
    /// Print every board along the solution path.
    #[arg(long)]
    show_path: bool,
}

fn strategy_color(strategy: Strategy) -> Color {
    match strategy {
        Strategy::AStar => Color::Blue,
        Strategy::Bfs => Color::Green,
        Strategy::Dfs => Color::Yellow,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    config.store_path |= cli.show_path;

    let puzzle = Puzzle::new(cli.size)?;
    let start = match cli.seed {
        Some(seed) => puzzle.random_solvable_state_with(&mut StdRng::seed_from_u64(seed)),
        None => puzzle.random_solvable_state(),
    };

    println!("Initial Puzzle:\n{}", start);
    println!("Goal:\n{}", puzzle.goal_state());

    let solver = Solver::new(config)?;
    let color = strategy_color(cli.strategy);
    println!("{}", format!("Running {}", cli.strategy).with(color));

    let report = solver.solve(cli.strategy, &puzzle, &start, puzzle.goal_state())?;
    let elapsed = report.stats.elapsed.as_secs_f64();

    match &report.outcome {
        SearchOutcome::Found(_) => {
            let message = format!(
                "{} solved in {:.6} s ({} nodes expanded)",
                cli.strategy, elapsed, report.stats.nodes_expanded
            );
            println!("{}", message.with(color));
        }
        SearchOutcome::NotFound => {
            println!("{}", format!("{}: no solution found", cli.strategy).red());
            return Ok(());
        }
        SearchOutcome::ResourceExhausted(reason) => {
            let message = format!("{}: gave up after {:.6} s ({:?})", cli.strategy, elapsed, reason);
            println!("{}", message.red());
            return Ok(());
        }
    }

    if cli.show_path {
        let states = report.solution_states(puzzle.size())?;
        println!("Found solution with: {} moves", states.len().saturating_sub(1));

        let mut previous = &start;
        for state in states.iter().skip(1) {
            if let Some(item) = puzzle.move_between(previous, state) {
                println!("{}\n{}", item, state);
            }
            previous = state;
        }
    }

    Ok(())
}

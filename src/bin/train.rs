//! Training entry point: wires the CLI onto the learn loop.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ataxx_zero::{AtaxxRules, MctsConfig, SelfPlayConfig, TabularEvaluator, Trainer};

#[derive(Parser, Debug)]
#[command(name = "train", about = "Self-play training loop for Ataxx")]
struct Args {
    /// Learning iterations to run.
    #[arg(long, default_value_t = 100)]
    iterations: u32,

    /// Self-play games per iteration.
    #[arg(long, default_value_t = 10)]
    games: u32,

    /// Arena games per evaluation.
    #[arg(long, default_value_t = 40)]
    arena_games: u32,

    /// MCTS rollouts per move.
    #[arg(long, default_value_t = 25)]
    rollouts: u32,

    /// PUCT exploration constant.
    #[arg(long, default_value_t = 1.0)]
    exploration: f32,

    /// Directory for the temp/best snapshots.
    #[arg(long, default_value = "checkpoints")]
    snapshot_dir: PathBuf,

    /// Root random seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = SelfPlayConfig::default()
        .with_learning_iterations(args.iterations)
        .with_games_per_iteration(args.games)
        .with_arena_games(args.arena_games)
        .with_mcts(
            MctsConfig::default()
                .with_iterations(args.rollouts)
                .with_exploration(args.exploration),
        )
        .with_snapshot_dir(args.snapshot_dir)
        .with_seed(args.seed);

    let rules = AtaxxRules::new();
    let evaluator = TabularEvaluator::new(rules.action_count());
    let mut trainer = Trainer::new(&rules, evaluator, config);
    trainer.learn()?;
    Ok(())
}

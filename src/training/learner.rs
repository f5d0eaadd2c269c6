//! The learn loop: generate, accumulate, train, evaluate, promote.

use std::fs;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::info;

use crate::game::AtaxxRules;
use crate::nn::TrainableEvaluator;
use crate::rng::GameRng;

use super::arena::{compare, should_promote};
use super::example::ExampleHistory;
use super::self_play::{play_training_game, SelfPlayConfig};
use super::TrainingError;

/// Snapshot written before each training pass; restored on rollback.
pub const TEMP_SNAPSHOT: &str = "temp-model";

/// Snapshot of the last promoted estimator.
pub const BEST_SNAPSHOT: &str = "best-model";

/// Drives learning iterations over a trainable estimator.
///
/// The estimator is cloned once per iteration to serve as the arena
/// incumbent, so promotion decisions compare against the exact
/// pre-training parameters even though the temp snapshot also sits on
/// disk for crash recovery.
pub struct Trainer<'a, E> {
    rules: &'a AtaxxRules,
    evaluator: E,
    config: SelfPlayConfig,
    history: ExampleHistory,
    rng: GameRng,
}

impl<'a, E> Trainer<'a, E>
where
    E: TrainableEvaluator + Clone + Sync,
{
    pub fn new(rules: &'a AtaxxRules, evaluator: E, config: SelfPlayConfig) -> Self {
        let rng = GameRng::new(config.seed);
        let history = ExampleHistory::new(config.history_batches);
        Self {
            rules,
            evaluator,
            config,
            history,
            rng,
        }
    }

    /// The current estimator (the promoted one after a successful
    /// iteration, the restored snapshot after a rollback).
    #[must_use]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    #[must_use]
    pub fn history(&self) -> &ExampleHistory {
        &self.history
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.config.snapshot_dir.join(name)
    }

    /// Run every configured learning iteration.
    pub fn learn(&mut self) -> Result<(), TrainingError> {
        fs::create_dir_all(&self.config.snapshot_dir).map_err(|source| {
            TrainingError::SnapshotDir {
                path: self.config.snapshot_dir.clone(),
                source,
            }
        })?;

        for iteration in 0..self.config.learning_iterations {
            self.run_iteration(iteration)?;
        }
        Ok(())
    }

    fn run_iteration(&mut self, iteration: u32) -> Result<(), TrainingError> {
        // Generate: independent games, each with its own forked stream
        // and fresh search table.
        let game_rngs: Vec<GameRng> = (0..self.config.games_per_iteration)
            .map(|_| self.rng.fork())
            .collect();
        let batches: Vec<_> = game_rngs
            .into_par_iter()
            .map(|game_rng| play_training_game(self.rules, &self.evaluator, &self.config, game_rng))
            .collect::<Result<_, TrainingError>>()?;
        let batch: Vec<_> = batches.into_iter().flatten().collect();
        info!(iteration, examples = batch.len(), "self-play batch complete");

        // Accumulate, snapshot, train the candidate.
        self.history.push(batch);
        self.evaluator.save(&self.snapshot_path(TEMP_SNAPSHOT))?;
        let incumbent = self.evaluator.clone();

        let mut examples = self.history.flattened();
        self.rng.shuffle(&mut examples);
        self.evaluator.train(&examples)?;

        // Evaluate and gate.
        let outcome = compare(
            self.rules,
            &incumbent,
            &self.evaluator,
            &self.config,
            &mut self.rng,
        )?;

        if should_promote(
            outcome.incumbent_wins,
            outcome.challenger_wins,
            self.config.promotion_threshold,
        ) {
            self.evaluator.save(&self.snapshot_path(BEST_SNAPSHOT))?;
            info!(
                iteration,
                challenger_wins = outcome.challenger_wins,
                incumbent_wins = outcome.incumbent_wins,
                draws = outcome.draws,
                "candidate promoted"
            );
        } else {
            self.evaluator.load(&self.snapshot_path(TEMP_SNAPSHOT))?;
            info!(
                iteration,
                challenger_wins = outcome.challenger_wins,
                incumbent_wins = outcome.incumbent_wins,
                draws = outcome.draws,
                "candidate rejected, snapshot restored"
            );
        }
        Ok(())
    }
}

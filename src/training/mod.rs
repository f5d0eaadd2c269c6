//! Self-play training loop: example generation, arena evaluation,
//! candidate promotion.
//!
//! ## Overview
//!
//! Each learning iteration generates a batch of self-play games with the
//! current estimator, pushes the batch into a bounded rolling history,
//! trains a candidate on the flattened window, and gates the candidate
//! through an arena match against the pre-training snapshot. The
//! candidate is promoted only when its share of decisive arena wins
//! reaches the configured threshold; otherwise the snapshot is restored.

use std::path::PathBuf;

use thiserror::Error;

use crate::game::RulesError;
use crate::mcts::SearchError;
use crate::nn::EvaluatorError;

pub mod arena;
pub mod example;
pub mod learner;
pub mod self_play;

pub use arena::{compare, play_game, should_promote, ArenaOutcome};
pub use example::{Example, ExampleHistory};
pub use learner::{Trainer, BEST_SNAPSHOT, TEMP_SNAPSHOT};
pub use self_play::{choose_action, play_training_game, SelfPlayConfig};

/// Errors surfaced by the training loop.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("search failure: {0}")]
    Search(#[from] SearchError),

    #[error("estimator failure: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("rules violation: {0}")]
    Rules(#[from] RulesError),

    #[error("snapshot directory {path} is unusable: {source}")]
    SnapshotDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Estimator traits and the uniform baseline.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::game::Board;
use crate::training::Example;

/// Errors surfaced by estimator backends.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot codec failure: {0}")]
    Codec(#[from] bincode::Error),
}

impl EvaluatorError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A prior policy over the full action space plus a scalar value
/// estimate, both from the perspective of the canonical mover.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// Unnormalized-by-legality prior over all action indices.
    pub policy: Vec<f32>,

    /// Expected outcome in `[-1, 1]` for the player to move.
    pub value: f32,
}

/// Read-only policy/value estimation on canonical boards.
pub trait Evaluator {
    /// Estimate priors and value for a canonical board.
    fn predict(&self, board: &Board) -> Result<Evaluation, EvaluatorError>;
}

/// An estimator that can learn from self-play examples and persist
/// itself as a named snapshot.
pub trait TrainableEvaluator: Evaluator {
    /// Fold a batch of examples into the estimator's parameters.
    fn train(&mut self, examples: &[Example]) -> Result<(), EvaluatorError>;

    /// Write a snapshot to `path`, replacing any existing file.
    fn save(&self, path: &Path) -> Result<(), EvaluatorError>;

    /// Replace the estimator's parameters from a snapshot at `path`.
    fn load(&mut self, path: &Path) -> Result<(), EvaluatorError>;
}

/// Baseline estimator: uniform priors, neutral value, no learning.
#[derive(Clone, Debug)]
pub struct UniformEvaluator {
    action_count: usize,
}

impl UniformEvaluator {
    #[must_use]
    pub fn new(action_count: usize) -> Self {
        Self { action_count }
    }
}

impl Evaluator for UniformEvaluator {
    fn predict(&self, _board: &Board) -> Result<Evaluation, EvaluatorError> {
        Ok(Evaluation {
            policy: vec![1.0 / self.action_count as f32; self.action_count],
            value: 0.0,
        })
    }
}

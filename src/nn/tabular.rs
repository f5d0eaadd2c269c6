//! Transposition-keyed estimator trained by running averages.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::game::Board;
use crate::training::Example;

use super::evaluator::{Evaluation, Evaluator, EvaluatorError, TrainableEvaluator};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TableEntry {
    policy: Vec<f32>,
    value: f32,
    samples: u32,
}

impl TableEntry {
    fn fresh(action_count: usize) -> Self {
        Self {
            policy: vec![0.0; action_count],
            value: 0.0,
            samples: 0,
        }
    }

    /// Fold one example into the running averages.
    fn absorb(&mut self, policy: &[f32], value: f32) {
        let n = self.samples as f32;
        for (slot, &p) in self.policy.iter_mut().zip(policy) {
            *slot = (n * *slot + p) / (n + 1.0);
        }
        self.value = (n * self.value + value) / (n + 1.0);
        self.samples += 1;
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    action_count: usize,
    table: FxHashMap<Board, TableEntry>,
}

/// Lookup-table estimator over canonical boards.
///
/// Seen boards return the running average of their training targets;
/// unseen boards fall back to uniform priors and a neutral value. This is
/// the simplest backend that still improves with training, which makes
/// the whole promote/rollback loop exercisable without an external
/// inference runtime.
#[derive(Clone, Debug)]
pub struct TabularEvaluator {
    action_count: usize,
    table: FxHashMap<Board, TableEntry>,
}

impl TabularEvaluator {
    #[must_use]
    pub fn new(action_count: usize) -> Self {
        Self {
            action_count,
            table: FxHashMap::default(),
        }
    }

    /// Number of distinct boards with learned targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Evaluator for TabularEvaluator {
    fn predict(&self, board: &Board) -> Result<Evaluation, EvaluatorError> {
        match self.table.get(board) {
            Some(entry) => Ok(Evaluation {
                policy: entry.policy.clone(),
                value: entry.value,
            }),
            None => Ok(Evaluation {
                policy: vec![1.0 / self.action_count as f32; self.action_count],
                value: 0.0,
            }),
        }
    }
}

impl TrainableEvaluator for TabularEvaluator {
    fn train(&mut self, examples: &[Example]) -> Result<(), EvaluatorError> {
        for example in examples {
            self.table
                .entry(example.board)
                .or_insert_with(|| TableEntry::fresh(self.action_count))
                .absorb(&example.policy, example.value);
        }
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<(), EvaluatorError> {
        let snapshot = Snapshot {
            action_count: self.action_count,
            table: self.table.clone(),
        };
        let bytes = bincode::serialize(&snapshot)?;
        fs::write(path, bytes).map_err(|e| EvaluatorError::io(path, e))
    }

    fn load(&mut self, path: &Path) -> Result<(), EvaluatorError> {
        let bytes = fs::read(path).map_err(|e| EvaluatorError::io(path, e))?;
        let snapshot: Snapshot = bincode::deserialize(&bytes)?;
        self.action_count = snapshot.action_count;
        self.table = snapshot.table;
        Ok(())
    }
}

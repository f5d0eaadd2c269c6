//! Training examples and the bounded rolling history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game::Board;

/// One training target: a canonical board, the search-derived policy
/// over the full action space, and the game outcome from the recorded
/// mover's perspective.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Example {
    pub board: Board,
    pub policy: Vec<f32>,
    pub value: f32,
}

/// FIFO window over the last `capacity` iterations' example batches.
///
/// Pushing beyond capacity evicts the oldest batch. Batches stay
/// separate so eviction drops a whole iteration at once; training reads
/// the flattened window.
#[derive(Clone, Debug, Default)]
pub struct ExampleHistory {
    batches: VecDeque<Vec<Example>>,
    capacity: usize,
}

impl ExampleHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            batches: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an iteration's batch, evicting the oldest beyond capacity.
    pub fn push(&mut self, batch: Vec<Example>) {
        self.batches.push_back(batch);
        while self.batches.len() > self.capacity {
            self.batches.pop_front();
        }
    }

    /// Number of retained batches.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Total examples across all retained batches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Flatten the window into one training set, oldest batch first.
    /// Callers shuffle before training.
    #[must_use]
    pub fn flattened(&self) -> Vec<Example> {
        self.batches.iter().flatten().cloned().collect()
    }
}

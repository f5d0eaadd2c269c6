//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

/// MCTS configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MctsConfig {
    /// Rollouts per call to [`policy`](crate::mcts::MctsSearch::policy).
    pub iterations: u32,

    /// PUCT exploration constant.
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 25,
            exploration_constant: 1.0,
        }
    }
}

impl MctsConfig {
    /// Create a config with custom rollout count.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create a config with custom exploration constant.
    pub fn with_exploration(mut self, c: f32) -> Self {
        self.exploration_constant = c;
        self
    }
}

//! Recursive MCTS rollouts and root-policy extraction.

use smallvec::SmallVec;
use thiserror::Error;

use crate::game::{AtaxxRules, Board, Player, RulesError, EPS};
use crate::nn::{Evaluator, EvaluatorError};
use crate::rng::GameRng;

use super::config::MctsConfig;
use super::table::TranspositionTable;

/// Errors surfaced by the search. Estimator and rules failures propagate
/// unchanged; the search never retries internally.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("rules violation during search: {0}")]
    Rules(#[from] RulesError),

    #[error("estimator failure: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("estimator returned {got} priors for an action space of {expected}")]
    PolicyShape { expected: usize, got: usize },

    #[error("no legal actions at the search root; the position is terminal")]
    NoLegalActions,
}

/// One game's search: rules, estimator handle, transposition table, RNG.
///
/// The table is exclusively owned by this instance and lives for the
/// lifetime of one game; a fresh search starts with an empty table.
pub struct MctsSearch<'a, E: Evaluator + ?Sized> {
    rules: &'a AtaxxRules,
    evaluator: &'a E,
    config: MctsConfig,
    table: TranspositionTable,
    rng: GameRng,
}

impl<'a, E: Evaluator + ?Sized> MctsSearch<'a, E> {
    /// Create a search with an empty transposition table.
    pub fn new(rules: &'a AtaxxRules, evaluator: &'a E, config: MctsConfig, rng: GameRng) -> Self {
        Self {
            rules,
            evaluator,
            config,
            table: TranspositionTable::new(),
            rng,
        }
    }

    /// Run `iterations` rollouts from a canonical root.
    pub fn run(&mut self, root: &Board, iterations: u32) -> Result<(), SearchError> {
        for _ in 0..iterations {
            self.rollout(root)?;
        }
        Ok(())
    }

    /// Run the configured number of rollouts, then convert root visit
    /// counts into an action distribution at the given temperature.
    pub fn policy(&mut self, root: &Board, temperature: f32) -> Result<Vec<f32>, SearchError> {
        self.run(root, self.config.iterations)?;
        self.root_policy(root, temperature)
    }

    /// Convert root edge visit counts into a probability distribution.
    ///
    /// Temperature 0 returns a one-hot vector on the most-visited action,
    /// ties broken uniformly at random. Positive temperatures raise counts
    /// to `1/temperature` and normalize. If no rollout reached a root edge
    /// the distribution degenerates; the documented fallback is the legal
    /// mask (uniform over legal actions).
    pub fn root_policy(&mut self, root: &Board, temperature: f32) -> Result<Vec<f32>, SearchError> {
        let n = self.rules.action_count();
        let counts: Vec<f32> = match self.table.get(root) {
            Some(node) => (0..n).map(|a| node.edge_visits(a as u16) as f32).collect(),
            None => vec![0.0; n],
        };

        if counts.iter().sum::<f32>() == 0.0 {
            return self.legal_fallback(root, temperature);
        }

        if temperature == 0.0 {
            let mut best: SmallVec<[usize; 8]> = SmallVec::new();
            let mut max = f32::NEG_INFINITY;
            for (action, &count) in counts.iter().enumerate() {
                if count > max {
                    max = count;
                    best.clear();
                    best.push(action);
                } else if count == max {
                    best.push(action);
                }
            }
            let pick = best[self.rng.gen_range_usize(0..best.len())];
            let mut policy = vec![0.0; n];
            policy[pick] = 1.0;
            return Ok(policy);
        }

        let mut weights: Vec<f32> = counts
            .into_iter()
            .map(|c| c.powf(1.0 / temperature))
            .collect();
        let total: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Ok(weights)
    }

    /// Visit counts of the root's outgoing edges, indexed by action.
    #[must_use]
    pub fn root_visits(&self, root: &Board) -> Vec<u32> {
        let n = self.rules.action_count();
        match self.table.get(root) {
            Some(node) => (0..n).map(|a| node.edge_visits(a as u16)).collect(),
            None => vec![0; n],
        }
    }

    /// The transposition table accumulated so far.
    #[must_use]
    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    /// One rollout from a canonical state; returns the backed-up value
    /// from the perspective of the player to move one ply up.
    fn rollout(&mut self, canonical: &Board) -> Result<f32, SearchError> {
        let rules = self.rules;
        let terminal = self
            .table
            .touch(canonical, || rules.value(canonical, Player::Red));
        if terminal != 0.0 {
            return Ok(-terminal);
        }

        let expanded = self
            .table
            .get(canonical)
            .is_some_and(|node| node.is_expanded());
        if !expanded {
            let estimate = self.expand_leaf(canonical)?;
            return Ok(-estimate);
        }

        let action = self.select_action(canonical);
        let next = self.rules.apply(canonical, Player::Red, action as usize)?;
        let next = self.rules.canonical(&next, Player::Blue);
        let value = self.rollout(&next)?;

        if let Some(node) = self.table.get_mut(canonical) {
            node.record_edge(action, value);
            node.visits += 1;
        }
        Ok(-value)
    }

    /// Expand a leaf: query the estimator, mask priors by legal actions,
    /// renormalize, and cache. Returns the estimated value.
    fn expand_leaf(&mut self, canonical: &Board) -> Result<f32, SearchError> {
        let evaluation = self.evaluator.predict(canonical)?;
        let n = self.rules.action_count();
        if evaluation.policy.len() != n {
            return Err(SearchError::PolicyShape {
                expected: n,
                got: evaluation.policy.len(),
            });
        }

        let legal = self.rules.legal_actions(canonical, Player::Red);
        let mut policy: Vec<f32> = evaluation
            .policy
            .iter()
            .zip(&legal)
            .map(|(&p, &l)| if l { p } else { 0.0 })
            .collect();

        let total: f32 = policy.iter().sum();
        if total > 0.0 {
            for p in &mut policy {
                *p /= total;
            }
        } else {
            // Estimator placed no mass on any legal action; fall back to a
            // uniform distribution over legal actions.
            let legal_count = legal.iter().filter(|&&l| l).count().max(1);
            for (p, &l) in policy.iter_mut().zip(&legal) {
                *p = if l { 1.0 / legal_count as f32 } else { 0.0 };
            }
        }

        if let Some(node) = self.table.get_mut(canonical) {
            node.policy = Some(policy);
            node.legal = legal;
            node.visits = 0;
        }
        Ok(evaluation.value)
    }

    /// Select the legal action maximizing the PUCT score. Ties keep the
    /// first action in move-table order.
    fn select_action(&self, canonical: &Board) -> u16 {
        let Some(node) = self.table.get(canonical) else {
            return 0;
        };
        let Some(policy) = node.policy.as_deref() else {
            return 0;
        };

        let c = self.config.exploration_constant;
        let sqrt_visits = (node.visits as f32).sqrt();
        let unvisited_bonus = (node.visits as f32 + EPS).sqrt();

        let mut best_score = f32::NEG_INFINITY;
        let mut best_action = 0u16;
        for (action, &legal) in node.legal.iter().enumerate() {
            if !legal {
                continue;
            }
            let prior = policy[action];
            let score = match node.edges.get(&(action as u16)) {
                Some(edge) => edge.q + c * prior * sqrt_visits / (1.0 + edge.visits as f32),
                None => c * prior * unvisited_bonus,
            };
            if score > best_score {
                best_score = score;
                best_action = action as u16;
            }
        }
        best_action
    }

    /// Degenerate-root fallback: distribute over the legal mask.
    fn legal_fallback(&mut self, root: &Board, temperature: f32) -> Result<Vec<f32>, SearchError> {
        let legal = self.rules.legal_actions(root, Player::Red);
        let indices: Vec<usize> = legal
            .iter()
            .enumerate()
            .filter(|(_, &l)| l)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            return Err(SearchError::NoLegalActions);
        }

        let mut policy = vec![0.0; legal.len()];
        if temperature == 0.0 {
            let pick = indices[self.rng.gen_range_usize(0..indices.len())];
            policy[pick] = 1.0;
        } else {
            for &index in &indices {
                policy[index] = 1.0 / indices.len() as f32;
            }
        }
        Ok(policy)
    }
}

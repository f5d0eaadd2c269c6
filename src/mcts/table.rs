//! Transposition table: per-state nodes and per-edge statistics.
//!
//! The table maps canonical boards to search statistics and lives for one
//! game. It is exclusively owned by that game's search instance — there is
//! no ambient global cache, and tables are never shared across games or
//! threads.

use rustc_hash::FxHashMap;

use crate::game::Board;

/// Visit count and running-average action value for one (state, action)
/// edge.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeStats {
    /// Times this edge has been traversed.
    pub visits: u32,

    /// Running average of backed-up values, mover's perspective.
    pub q: f32,
}

impl EdgeStats {
    /// Fold one backed-up value into the running average.
    pub fn record(&mut self, value: f32) {
        self.q = (self.visits as f32 * self.q + value) / (self.visits as f32 + 1.0);
        self.visits += 1;
    }
}

/// Per-state search record.
///
/// Created with the cached terminal value on first touch; the prior policy
/// and legal mask are filled in once the node is expanded as a leaf.
#[derive(Clone, Debug)]
pub struct SearchNode {
    /// Rollouts that have passed through this node since expansion.
    pub visits: u32,

    /// Cached terminal value from the mover's perspective; 0 while the
    /// game is ongoing.
    pub terminal_value: f32,

    /// Prior policy masked to legal actions, present once expanded.
    pub policy: Option<Vec<f32>>,

    /// Legal-action mask, filled at expansion.
    pub legal: Vec<bool>,

    /// Outgoing edge statistics, keyed by action index.
    pub edges: FxHashMap<u16, EdgeStats>,
}

impl SearchNode {
    /// Create an unexpanded node with its cached terminal value.
    #[must_use]
    pub fn new(terminal_value: f32) -> Self {
        Self {
            visits: 0,
            terminal_value,
            policy: None,
            legal: Vec::new(),
            edges: FxHashMap::default(),
        }
    }

    /// Whether the leaf has been expanded with a prior policy.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.policy.is_some()
    }

    /// Visit count of one outgoing edge (0 if never traversed).
    #[must_use]
    pub fn edge_visits(&self, action: u16) -> u32 {
        self.edges.get(&action).map_or(0, |e| e.visits)
    }

    /// Fold a backed-up value into an edge, creating it on first visit.
    pub fn record_edge(&mut self, action: u16, value: f32) {
        self.edges.entry(action).or_default().record(value);
    }
}

/// Mapping from canonical board to search node, owned by one game.
#[derive(Clone, Debug, Default)]
pub struct TranspositionTable {
    nodes: FxHashMap<Board, SearchNode>,
}

impl TranspositionTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct states touched so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no states have been touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, board: &Board) -> Option<&SearchNode> {
        self.nodes.get(board)
    }

    /// Look up a node mutably.
    pub fn get_mut(&mut self, board: &Board) -> Option<&mut SearchNode> {
        self.nodes.get_mut(board)
    }

    /// Fetch the node for `board`, creating it with `terminal_value` on
    /// first touch. Returns the cached terminal value either way.
    pub fn touch(&mut self, board: &Board, terminal_value: impl FnOnce() -> f32) -> f32 {
        self.nodes
            .entry(*board)
            .or_insert_with(|| SearchNode::new(terminal_value()))
            .terminal_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::AtaxxRules;

    #[test]
    fn test_edge_running_average() {
        let mut edge = EdgeStats::default();
        edge.record(1.0);
        assert_eq!(edge.visits, 1);
        assert_eq!(edge.q, 1.0);

        edge.record(0.0);
        assert_eq!(edge.visits, 2);
        assert!((edge.q - 0.5).abs() < 1e-6);

        edge.record(-0.5);
        assert_eq!(edge.visits, 3);
        assert!((edge.q - (1.0 + 0.0 - 0.5) / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_node_expansion_state() {
        let mut node = SearchNode::new(0.0);
        assert!(!node.is_expanded());
        assert_eq!(node.edge_visits(3), 0);

        node.policy = Some(vec![0.5, 0.5]);
        assert!(node.is_expanded());

        node.record_edge(3, 1.0);
        assert_eq!(node.edge_visits(3), 1);
    }

    #[test]
    fn test_touch_caches_terminal_value() {
        let rules = AtaxxRules::new();
        let board = rules.initial();
        let mut table = TranspositionTable::new();

        let mut calls = 0;
        let v = table.touch(&board, || {
            calls += 1;
            0.25
        });
        assert_eq!(v, 0.25);
        assert_eq!(table.len(), 1);

        // Second touch reuses the cached value
        let v = table.touch(&board, || {
            calls += 1;
            0.75
        });
        assert_eq!(v, 0.25);
        assert_eq!(calls, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_pass_transposes_to_the_same_node() {
        let rules = AtaxxRules::new();
        let board = rules.initial();
        let mut table = TranspositionTable::new();
        table.touch(&board, || 0.0);

        let after_pass = rules.apply(&board, crate::game::Player::Red, 0).unwrap();
        table.touch(&after_pass, || 0.0);
        assert_eq!(table.len(), 1);
    }
}

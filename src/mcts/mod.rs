//! Monte Carlo Tree Search guided by policy/value priors.
//!
//! ## Overview
//!
//! The search operates on canonical boards (mover always positive) and a
//! transposition table owned by one game:
//!
//! 1. **Terminal check**: the node's terminal value is computed once and
//!    cached; nonzero values back up immediately with a sign flip.
//! 2. **Leaf expansion**: the estimator's priors are masked by the legal
//!    actions and renormalized (uniform-over-legal if no mass survives),
//!    then the estimated value backs up.
//! 3. **Selection**: a PUCT score balances the running action value
//!    against a prior-weighted, visit-decaying exploration bonus; ties
//!    keep the first action in move-table order.
//!
//! Values are always from the perspective of the player to move at each
//! node; negating on every return implements the zero-sum flip between
//! plies. Estimator and rules errors propagate unchanged, while degenerate
//! prior distributions are recovered locally with documented fallbacks.

pub mod config;
pub mod search;
pub mod table;

pub use config::MctsConfig;
pub use search::{MctsSearch, SearchError};
pub use table::{EdgeStats, SearchNode, TranspositionTable};

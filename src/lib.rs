//! # ataxx-zero
//!
//! An AlphaZero-style training loop for the board game Ataxx: Monte Carlo
//! Tree Search guided by a learned policy/value estimator generates
//! self-play games, the estimator is retrained on the accumulated examples,
//! and the retrained candidate is promoted only after beating the previous
//! best model in a head-to-head arena.
//!
//! ## Architecture
//!
//! - **Pure rules engine**: Ataxx state transitions are pure functions over
//!   a `Copy` board value. Boards are canonicalized so the player to move
//!   always appears as the positive side, and the canonical board doubles
//!   as the transposition-table key.
//!
//! - **Transposition-table MCTS**: Each game owns one search table mapping
//!   canonical boards to node/edge statistics. Rollouts recurse through
//!   PUCT selection with the standard zero-sum perspective flip per ply.
//!
//! - **Deterministic randomness**: An explicit seeded RNG is threaded
//!   through every sampling site (tie-breaks, action sampling, shuffling),
//!   with per-game forks so parallel games stay reproducible.
//!
//! ## Modules
//!
//! - `game`: Board representation, move table, and the Ataxx rules engine
//! - `mcts`: Search configuration, transposition table, and rollouts
//! - `nn`: Evaluator contracts plus baseline evaluators for testing
//! - `training`: Examples, bounded history, self-play, arena, learn loop
//! - `rng`: Deterministic forkable RNG

pub mod game;
pub mod mcts;
pub mod nn;
pub mod rng;
pub mod training;

// Re-export commonly used types
pub use crate::game::{AtaxxRules, Board, Move, Player, RulesError, Square, EPS, JUMP_LIMIT, SIDE};

pub use crate::mcts::{MctsConfig, MctsSearch, SearchError, SearchNode, TranspositionTable};

pub use crate::nn::{
    Evaluation, Evaluator, EvaluatorError, TabularEvaluator, TrainableEvaluator, UniformEvaluator,
};

pub use crate::rng::GameRng;

pub use crate::training::{
    choose_action, should_promote, Example, ExampleHistory, SelfPlayConfig, Trainer, TrainingError,
    BEST_SNAPSHOT, TEMP_SNAPSHOT,
};

//! Ataxx game state and rules.
//!
//! ## Overview
//!
//! The rules engine is a set of pure functions over an immutable `Board`
//! value: legal-move enumeration, move application, terminal detection,
//! and canonicalization. Key properties:
//!
//! - **Canonical form**: `canonical(board, player)` flips occupancy signs
//!   so the player to move is always the positive side; search and the
//!   estimator only ever see canonical boards.
//! - **Stable action indices**: the full move table (Pass plus every
//!   in-range ordered square pair) is enumerated once at engine
//!   construction; indices are shared by the rules engine, the search, and
//!   the estimator's policy head.
//! - **Fail fast**: applying a malformed or illegal action returns a
//!   `RulesError` instead of silently corrupting the state.

pub mod board;
pub mod rules;

pub use board::{Board, Player, Square, CELLS, JUMP_LIMIT, SIDE};
pub use rules::{AtaxxRules, Move, RulesError, EPS};

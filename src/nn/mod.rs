//! Policy/value estimation behind a trait seam.
//!
//! The search and the training loop only speak to estimators through
//! [`Evaluator`] and [`TrainableEvaluator`]; the concrete backend is a
//! caller decision. [`TabularEvaluator`] is the built-in backend: a
//! transposition-keyed lookup trained by running averages, enough to
//! close the self-play loop without an external inference runtime.

pub mod evaluator;
pub mod tabular;

pub use evaluator::{Evaluation, Evaluator, EvaluatorError, TrainableEvaluator, UniformEvaluator};
pub use tabular::TabularEvaluator;

//! Evaluate a [`Policy`].
use crate::{record::Record, Env, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluate a [`Policy`].
pub trait Evaluator<E: Env> {
    /// Evaluate a policy.
    ///
    /// The caller of this method needs to handle the internal state of the
    /// policy, like training/evaluation mode of an [`Agent`](crate::Agent).
    fn evaluate<P: Policy>(&mut self, policy: &mut P) -> Result<Record>;
}

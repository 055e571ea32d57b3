//! Policy.
use crate::StackedObs;
use anyhow::Result;

/// A policy on an environment with discrete actions.
///
/// Policy is a mapping from a stack of recent observations to an action index.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy {
    /// Sample an action given the recent observations.
    fn sample(&mut self, state: &StackedObs) -> Result<usize>;
}

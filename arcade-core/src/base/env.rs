//! Environment.
use super::{Frame, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment with a fixed set of discrete actions.
///
/// Actions are indices into the action set, `0..n_actions()`.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Frame>;

    /// Performes an environment step.
    ///
    /// The returned [`Record`] holds information defined by the environment.
    fn step(&mut self, act: usize) -> Result<(Step, Record)>;

    /// The number of discrete actions.
    fn n_actions(&self) -> usize;

    /// Human readable names of the actions.
    fn action_meanings(&self) -> Vec<String> {
        (0..self.n_actions())
            .map(|i| format!("ACTION_{}", i))
            .collect()
    }
}

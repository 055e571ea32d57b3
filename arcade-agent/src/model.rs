//! Interface of Q-function models.
use anyhow::Result;
use arcade_core::StackedObs;
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt::Debug, path::Path};

/// Regression targets of action values.
///
/// The `i`-th target is the value the model should estimate for action
/// `actions[i]` on `states[i]`.
#[derive(Clone, Debug, Default)]
pub struct QTargetBatch {
    /// States.
    pub states: Vec<StackedObs>,

    /// Actions taken on the states.
    pub actions: Vec<usize>,

    /// Target values.
    pub targets: Vec<f32>,
}

impl QTargetBatch {
    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A function approximator of action values.
///
/// Cloning a model copies its parameters, which is how target networks are
/// synchronized.
pub trait QModel: Clone {
    /// Configuration from which the model is built.
    type Config: Clone + Debug + PartialEq + Serialize + DeserializeOwned;

    /// Builds a model.
    fn build(config: &Self::Config) -> Result<Self>;

    /// Number of actions.
    fn n_actions(&self) -> usize;

    /// Estimates the values of all actions on a state.
    fn estimate(&self, state: &StackedObs) -> Result<Vec<f32>>;

    /// Performs a parameter update towards the targets and returns the loss
    /// before the update.
    fn update(&mut self, batch: &QTargetBatch) -> Result<f32>;

    /// Saves the parameters.
    fn save(&self, path: &Path) -> Result<()>;

    /// Loads the parameters.
    fn load(&mut self, path: &Path) -> Result<()>;
}

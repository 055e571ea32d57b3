//! DQN agent for arcade.
//!
//! [`Dqn`] learns action values with a [`QModel`], an interface to the
//! function approximator with three operations: estimating the values of the
//! actions on a stack of observations, updating towards target values, and
//! saving/loading parameters. Two implementations are provided:
//!
//! * [`LinearQ`], an affine map from pixels to action values.
//! * [`DuelingQ`], separate state-value and advantage streams combined with
//!   the average advantage as the baseline.
//!
//! Both are fitted with the optimizer given by [`OptimizerConfig`].
pub mod dqn;
mod dueling;
mod linear;
mod model;
mod opt;
pub use dqn::{Dqn, DqnConfig};
pub use dueling::DuelingQ;
pub use linear::{LinearQ, LinearQConfig};
pub use model::{QModel, QTargetBatch};
pub use opt::{Optimizer, OptimizerConfig};

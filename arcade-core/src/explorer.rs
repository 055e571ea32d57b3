//! Exploration strategies.
//!
//! [`LinearAnnealedPolicy`] selects actions epsilon-greedily from a vector of
//! action values, with epsilon decaying linearly from `value_max` to
//! `value_min` over `nb_steps` training steps. Outside training mode epsilon
//! is fixed at `value_test`.
mod config;
mod eps_greedy;
mod linear_annealed;
pub use config::LinearAnnealedConfig;
pub use eps_greedy::{argmax, EpsGreedy};
pub use linear_annealed::LinearAnnealedPolicy;

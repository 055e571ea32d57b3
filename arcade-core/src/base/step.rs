//! Environment step.
use super::Frame;

/// Represents the outcome `(a_t, o_t+1, r_t, done_t)` of an environment step.
#[derive(Clone, Debug)]
pub struct Step {
    /// Action applied to the environment.
    pub act: usize,

    /// Observation after the action.
    pub obs: Frame,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode has ended.
    pub is_terminal: bool,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(act: usize, obs: Frame, reward: f32, is_terminal: bool) -> Self {
        Self {
            act,
            obs,
            reward,
            is_terminal,
        }
    }

    #[inline]
    /// Returns `true` if the episode ended with this step.
    pub fn is_done(&self) -> bool {
        self.is_terminal
    }
}

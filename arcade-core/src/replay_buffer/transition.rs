use crate::Frame;

/// A transition produced by a single environment step.
///
/// `obs` is the observation the action was chosen on, `reward` and
/// `is_terminal` are the outcome of applying `act`.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Observation before the action.
    pub obs: Frame,

    /// Index of the action taken.
    pub act: usize,

    /// Reward received for the action.
    pub reward: f32,

    /// Flag denoting if the episode ended with this step.
    pub is_terminal: bool,
}

impl Transition {
    /// Constructs a transition.
    pub fn new(obs: Frame, act: usize, reward: f32, is_terminal: bool) -> Self {
        Self {
            obs,
            act,
            reward,
            is_terminal,
        }
    }
}

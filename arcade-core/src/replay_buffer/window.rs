use super::Transition;
use crate::{Frame, StackedObs};

/// A run of consecutive transitions ending at a sampled index.
#[derive(Clone, Debug)]
pub struct WindowSample {
    end: usize,
    transitions: Vec<Transition>,
}

impl WindowSample {
    pub(super) fn new(end: usize, transitions: Vec<Transition>) -> Self {
        Self { end, transitions }
    }

    /// Logical index of the last transition in the memory (0 is the oldest).
    pub fn end(&self) -> usize {
        self.end
    }

    /// The transitions in the window, oldest first.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The most recent transition of the window.
    pub fn last(&self) -> &Transition {
        // A window holds at least one transition.
        &self.transitions[self.transitions.len() - 1]
    }

    /// Stacks the observations of the window into a network input.
    ///
    /// If a transition before the last position is terminal, the frames up to
    /// and including it belong to a previous episode and are replaced with
    /// zero frames.
    pub fn stacked_obs(&self) -> StackedObs {
        let n = self.transitions.len();
        let mut frames: Vec<Frame> = self.transitions.iter().map(|tr| tr.obs.clone()).collect();

        if let Some(k) = self.transitions[..n - 1]
            .iter()
            .rposition(|tr| tr.is_terminal)
        {
            for frame in frames[..=k].iter_mut() {
                *frame = Frame::zeros(frame.raw_dim());
            }
        }

        StackedObs::new(frames)
    }
}

/// A batch of experiences `(s_t, a_t, r_t, done_t, s_t+1)` for Q-learning.
///
/// States are stacked windows of observations.
#[derive(Clone, Debug, Default)]
pub struct ExperienceBatch {
    /// States the actions were chosen on.
    pub state0: Vec<StackedObs>,

    /// Actions.
    pub act: Vec<usize>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Flags denoting if the episode ended after the action.
    pub is_terminal: Vec<bool>,

    /// States after the actions.
    pub state1: Vec<StackedObs>,

    /// Logical indices of the sampled transitions.
    pub ix_sample: Vec<usize>,
}

impl ExperienceBatch {
    /// Creates an empty batch with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state0: Vec::with_capacity(capacity),
            act: Vec::with_capacity(capacity),
            reward: Vec::with_capacity(capacity),
            is_terminal: Vec::with_capacity(capacity),
            state1: Vec::with_capacity(capacity),
            ix_sample: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of experiences in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }
}

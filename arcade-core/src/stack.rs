//! Stacking of recent observations into network inputs.
use crate::Frame;
use std::collections::VecDeque;

/// A stack of consecutive observations, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedObs {
    frames: Vec<Frame>,
}

impl StackedObs {
    /// Creates a stack from frames of the same shape, oldest first.
    pub fn new(frames: Vec<Frame>) -> Self {
        debug_assert!(!frames.is_empty());
        debug_assert!(frames.iter().all(|f| f.shape() == frames[0].shape()));
        Self { frames }
    }

    /// The stacked frames, oldest first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of stacked frames.
    pub fn window_length(&self) -> usize {
        self.frames.len()
    }

    /// Shape of a single frame.
    pub fn frame_shape(&self) -> &[usize] {
        self.frames[0].shape()
    }

    /// Number of elements of the flattened stack.
    pub fn flat_len(&self) -> usize {
        self.frames.iter().map(|f| f.len()).sum()
    }

    /// Flattens the stack into pixel values scaled to `[0, 1]`.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.frames
            .iter()
            .flat_map(|f| f.iter().map(|&v| v as f32 / 255.0))
            .collect()
    }
}

/// Keeps the last `window_length` observations of the current episode.
///
/// At the start of an episode the slots before the first observation are
/// filled with zero frames, the same padding [`WindowSample::stacked_obs`]
/// applies to windows sampled from the replay memory.
///
/// [`WindowSample::stacked_obs`]: crate::WindowSample::stacked_obs
#[derive(Clone, Debug)]
pub struct FrameStacker {
    window_length: usize,
    frames: VecDeque<Frame>,
}

impl FrameStacker {
    /// Creates an empty stacker.
    pub fn new(window_length: usize) -> Self {
        Self {
            window_length,
            frames: VecDeque::with_capacity(window_length),
        }
    }

    /// Starts a new episode with its first observation.
    pub fn reset(&mut self, init_obs: Frame) {
        self.frames.clear();
        for _ in 1..self.window_length {
            self.frames.push_back(Frame::zeros(init_obs.raw_dim()));
        }
        self.frames.push_back(init_obs);
    }

    /// Pushes the next observation of the current episode.
    pub fn push(&mut self, obs: Frame) {
        if self.frames.is_empty() {
            self.reset(obs);
            return;
        }
        if self.frames.len() == self.window_length {
            self.frames.pop_front();
        }
        self.frames.push_back(obs);
    }

    /// Returns the current stack.
    pub fn state(&self) -> StackedObs {
        StackedObs::new(self.frames.iter().cloned().collect())
    }
}

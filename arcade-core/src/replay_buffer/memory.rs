use super::{
    ExperienceBatch, ExperienceBufferBase, ReplayBufferBase, SequentialMemoryConfig, Transition,
    WindowSample,
};
use crate::error::CoreError;
use anyhow::Result;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A fixed-capacity FIFO memory of transitions.
///
/// Transitions are kept in a ring buffer. Logical index `0` is the oldest
/// stored transition and `len() - 1` the most recent one.
pub struct SequentialMemory {
    /// Maximum number of transitions that can be stored.
    capacity: usize,

    /// Window length used for experience batches.
    window_length: usize,

    /// Next write position in `buf`. When the memory is full it also points
    /// at the oldest transition.
    i: usize,

    /// Storage.
    buf: Vec<Transition>,

    /// Observation shape locked by the first append.
    obs_shape: Option<Vec<usize>>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl SequentialMemory {
    #[inline]
    fn physical(&self, ix: usize) -> usize {
        if self.buf.len() < self.capacity {
            ix
        } else {
            (self.i + ix) % self.capacity
        }
    }

    /// Appends a transition at the logical end, evicting the oldest one when
    /// the memory is full.
    ///
    /// A transition whose observation shape differs from the stored ones is
    /// rejected and the memory is left unchanged.
    pub fn append(&mut self, tr: Transition) -> Result<(), CoreError> {
        let shape = tr.obs.shape().to_vec();
        let expected = self.obs_shape.get_or_insert_with(|| shape.clone());
        if *expected != shape {
            return Err(CoreError::ShapeMismatch {
                expected: expected.clone(),
                got: shape,
            });
        }

        if self.buf.len() < self.capacity {
            self.buf.push(tr);
        } else {
            self.buf[self.i] = tr;
        }
        self.i = (self.i + 1) % self.capacity;

        Ok(())
    }

    /// Current number of stored transitions.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no transition is stored.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Maximum number of transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Window length used for experience batches.
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Shape of the stored observations, if any transition was appended.
    pub fn obs_shape(&self) -> Option<&[usize]> {
        self.obs_shape.as_deref()
    }

    /// Returns the transition at logical index `ix`.
    pub fn get(&self, ix: usize) -> Option<&Transition> {
        if ix < self.buf.len() {
            Some(&self.buf[self.physical(ix)])
        } else {
            None
        }
    }

    /// Iterates over the stored transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> + '_ {
        (0..self.buf.len()).map(move |ix| &self.buf[self.physical(ix)])
    }

    fn window(&self, end: usize, window_length: usize) -> WindowSample {
        let transitions = (end + 1 - window_length..=end)
            .map(|ix| self.buf[self.physical(ix)].clone())
            .collect();
        WindowSample::new(end, transitions)
    }

    /// Samples `batch_size` windows of `window_length` consecutive transitions.
    ///
    /// The last index of each window is drawn uniformly from
    /// `[window_length - 1, len() - 1]`. Fails if fewer than `window_length`
    /// transitions are stored.
    pub fn sample_batch(
        &mut self,
        batch_size: usize,
        window_length: usize,
    ) -> Result<Vec<WindowSample>, CoreError> {
        if window_length == 0 {
            return Err(CoreError::InvalidConfig(
                "window_length must be positive".to_string(),
            ));
        }
        let len = self.len();
        if len < window_length {
            return Err(CoreError::InsufficientHistory {
                length: len,
                required: window_length,
            });
        }

        let ends = (0..batch_size)
            .map(|_| self.rng.gen_range(window_length - 1..len))
            .collect::<Vec<_>>();
        Ok(ends
            .into_iter()
            .map(|end| self.window(end, window_length))
            .collect())
    }

    /// Samples a batch of experiences for Q-learning.
    ///
    /// Each experience is built from a transition at index `i`, drawn from
    /// `[window_length - 1, len() - 2]`: the state is the stacked window
    /// ending at `i`, the next state is the window ending at `i + 1`.
    pub fn sample_experiences(&mut self, size: usize) -> Result<ExperienceBatch, CoreError> {
        let wl = self.window_length;
        let len = self.len();
        if len < wl + 1 {
            return Err(CoreError::InsufficientHistory {
                length: len,
                required: wl + 1,
            });
        }

        let mut batch = ExperienceBatch::with_capacity(size);
        for _ in 0..size {
            let ix = self.rng.gen_range(wl - 1..len - 1);
            let tr = &self.buf[self.physical(ix)];
            batch.act.push(tr.act);
            batch.reward.push(tr.reward);
            batch.is_terminal.push(tr.is_terminal);
            batch.state0.push(self.window(ix, wl).stacked_obs());
            batch.state1.push(self.window(ix + 1, wl).stacked_obs());
            batch.ix_sample.push(ix);
        }
        debug!("Sampled {} experiences from {} transitions", size, len);

        Ok(batch)
    }
}

impl ExperienceBufferBase for SequentialMemory {
    type Item = Transition;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        self.append(tr)?;
        Ok(())
    }

    fn len(&self) -> usize {
        self.buf.len()
    }
}

impl ReplayBufferBase for SequentialMemory {
    type Config = SequentialMemoryConfig;
    type Batch = ExperienceBatch;

    fn build(config: &Self::Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            capacity: config.capacity,
            window_length: config.window_length,
            i: 0,
            buf: Vec::with_capacity(config.capacity),
            obs_shape: None,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        Ok(self.sample_experiences(size)?)
    }
}

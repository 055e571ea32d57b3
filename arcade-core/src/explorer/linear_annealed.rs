use super::{EpsGreedy, LinearAnnealedConfig};
use crate::{
    error::CoreError,
    record::{Record, RecordValue},
};

/// Epsilon-greedy action selection with linearly annealed epsilon.
///
/// ```text
/// eps(step) = value_max - (value_max - value_min) * min(step, nb_steps) / nb_steps
/// ```
pub struct LinearAnnealedPolicy {
    value_max: f64,
    value_min: f64,
    value_test: f64,
    nb_steps: usize,
    current_step: usize,
    inner: EpsGreedy,
}

impl LinearAnnealedPolicy {
    /// Builds the policy. Fails on an invalid configuration.
    pub fn build(config: &LinearAnnealedConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            value_max: config.value_max,
            value_min: config.value_min,
            value_test: config.value_test,
            nb_steps: config.nb_steps,
            current_step: 0,
            inner: EpsGreedy::new(config.seed),
        })
    }

    /// Epsilon of the annealing schedule at the given training step.
    pub fn epsilon(&self, step: usize) -> f64 {
        if step >= self.nb_steps {
            self.value_min
        } else {
            let d = self.value_max - self.value_min;
            self.value_max - d * (step as f64 / self.nb_steps as f64)
        }
    }

    /// Epsilon used by [`select_action`](Self::select_action) right now.
    pub fn current_epsilon(&self, training: bool) -> f64 {
        if training {
            self.epsilon(self.current_step)
        } else {
            self.value_test
        }
    }

    /// Selects an action index from per-action values.
    ///
    /// Explores with probability [`current_epsilon`](Self::current_epsilon),
    /// otherwise takes the first action with the maximum value.
    pub fn select_action(&mut self, values: &[f32], training: bool) -> Result<usize, CoreError> {
        let eps = self.current_epsilon(training);
        self.inner.select(values, eps)
    }

    /// Advances the annealing schedule by one training step.
    pub fn advance(&mut self) {
        self.current_step += 1;
    }

    /// Number of training steps taken so far.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Returns the current training epsilon as a record.
    pub fn record(&self) -> Record {
        Record::from_slice(&[
            ("eps", RecordValue::Scalar(self.current_epsilon(true) as f32)),
            ("eps_step", RecordValue::Scalar(self.current_step as f32)),
        ])
    }
}

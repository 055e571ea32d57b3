//! Configuration of [`LinearAnnealedPolicy`](super::LinearAnnealedPolicy).
use crate::error::CoreError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`LinearAnnealedPolicy`](super::LinearAnnealedPolicy).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LinearAnnealedConfig {
    /// Epsilon at the first training step.
    pub value_max: f64,

    /// Epsilon after `nb_steps` training steps.
    pub value_min: f64,

    /// Epsilon outside training mode.
    pub value_test: f64,

    /// Number of training steps over which epsilon is annealed.
    pub nb_steps: usize,

    /// Random seed of action selection.
    pub seed: u64,
}

impl Default for LinearAnnealedConfig {
    fn default() -> Self {
        Self {
            value_max: 1.0,
            value_min: 0.1,
            value_test: 0.2,
            nb_steps: 500_000,
            seed: 42,
        }
    }
}

impl LinearAnnealedConfig {
    /// Sets the epsilon at the first training step.
    pub fn value_max(mut self, v: f64) -> Self {
        self.value_max = v;
        self
    }

    /// Sets the epsilon at the end of annealing.
    pub fn value_min(mut self, v: f64) -> Self {
        self.value_min = v;
        self
    }

    /// Sets the epsilon used outside training mode.
    pub fn value_test(mut self, v: f64) -> Self {
        self.value_test = v;
        self
    }

    /// Sets the number of annealing steps.
    pub fn nb_steps(mut self, v: usize) -> Self {
        self.nb_steps = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Checks `0 <= value_min <= value_max <= 1`, `0 <= value_test <= 1`
    /// and `nb_steps > 0`.
    pub fn validate(&self) -> Result<(), CoreError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);

        if !in_unit(self.value_min) || !in_unit(self.value_max) || !in_unit(self.value_test) {
            return Err(CoreError::InvalidConfig(format!(
                "epsilon values must lie in [0, 1]: value_max={}, value_min={}, value_test={}",
                self.value_max, self.value_min, self.value_test
            )));
        }
        if self.value_min > self.value_max {
            return Err(CoreError::InvalidConfig(format!(
                "value_min ({}) exceeds value_max ({})",
                self.value_min, self.value_max
            )));
        }
        if self.nb_steps == 0 {
            return Err(CoreError::InvalidConfig(
                "nb_steps must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`LinearAnnealedConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`LinearAnnealedConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

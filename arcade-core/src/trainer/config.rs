//! Configuration of [`Trainer`](super::Trainer).
use crate::error::CoreError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
///
/// All intervals are counted in environment steps.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of environment steps of the run.
    pub nb_steps: usize,

    /// Environment steps before the first optimization step, for filling the
    /// replay memory.
    pub warmup_steps: usize,

    /// Interval of optimization steps.
    pub train_interval: usize,

    /// Interval of flushing aggregated records.
    pub log_interval: usize,

    /// Interval of saving model parameters.
    pub checkpoint_interval: usize,

    /// Random seed of the training environment.
    pub seed: i64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            nb_steps: 500_000,
            warmup_steps: 1000,
            train_interval: 1,
            log_interval: 500,
            checkpoint_interval: 50_000,
            seed: 42,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of environment steps.
    pub fn nb_steps(mut self, v: usize) -> Self {
        self.nb_steps = v;
        self
    }

    /// Sets the warmup period.
    pub fn warmup_steps(mut self, v: usize) -> Self {
        self.warmup_steps = v;
        self
    }

    /// Sets the interval of optimization.
    pub fn train_interval(mut self, v: usize) -> Self {
        self.train_interval = v;
        self
    }

    /// Sets the interval of flushing records.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Sets the interval of saving model parameters.
    pub fn checkpoint_interval(mut self, v: usize) -> Self {
        self.checkpoint_interval = v;
        self
    }

    /// Sets the random seed of the environment.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Checks that the number of steps and all intervals are positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, v) in [
            ("nb_steps", self.nb_steps),
            ("train_interval", self.train_interval),
            ("log_interval", self.log_interval),
            ("checkpoint_interval", self.checkpoint_interval),
        ] {
            if v == 0 {
                return Err(CoreError::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

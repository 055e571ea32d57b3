//! Configuration of [`SequentialMemory`](super::SequentialMemory).
use crate::error::CoreError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`SequentialMemory`](super::SequentialMemory).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SequentialMemoryConfig {
    /// Maximum number of transitions kept in the memory.
    pub capacity: usize,

    /// Number of consecutive transitions stacked into one network input.
    pub window_length: usize,

    /// Random seed used for sampling.
    pub seed: u64,
}

impl Default for SequentialMemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            window_length: 3,
            seed: 42,
        }
    }
}

impl SequentialMemoryConfig {
    /// Sets the capacity of the memory.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the window length.
    pub fn window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that the memory can be built from this configuration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.capacity == 0 {
            return Err(CoreError::InvalidConfig(
                "capacity must be positive".to_string(),
            ));
        }
        if self.window_length == 0 {
            return Err(CoreError::InvalidConfig(
                "window_length must be positive".to_string(),
            ));
        }
        if self.window_length > self.capacity {
            return Err(CoreError::InvalidConfig(format!(
                "window_length ({}) exceeds capacity ({})",
                self.window_length, self.capacity
            )));
        }
        Ok(())
    }

    /// Constructs [`SequentialMemoryConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SequentialMemoryConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

//! Configuration of DQN agent.
use crate::QModel;
use anyhow::Result;
use arcade_core::LinearAnnealedConfig;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Dqn`](super::Dqn).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(bound(
    serialize = "M::Config: Serialize",
    deserialize = "M::Config: serde::de::DeserializeOwned"
))]
pub struct DqnConfig<M: QModel> {
    /// Configuration of the Q-function model.
    pub model_config: M::Config,

    /// Exploration schedule.
    pub explorer: LinearAnnealedConfig,

    /// Number of experiences per optimization step.
    pub batch_size: usize,

    /// Discount factor.
    pub discount_factor: f32,

    /// Interval of copying the model to the target model, in optimization
    /// steps.
    pub target_model_update: usize,

    /// If `true`, the action of the bootstrapped value is selected by the
    /// online model and evaluated by the target model.
    #[serde(default)]
    pub double_dqn: bool,
}

impl<M: QModel> DqnConfig<M> {
    /// Creates a configuration with default hyperparameters.
    pub fn new(model_config: M::Config) -> Self {
        Self {
            model_config,
            explorer: LinearAnnealedConfig::default(),
            batch_size: 32,
            discount_factor: 0.99,
            target_model_update: 10_000,
            double_dqn: false,
        }
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, v: M::Config) -> Self {
        self.model_config = v;
        self
    }

    /// Sets the exploration schedule.
    pub fn explorer(mut self, v: LinearAnnealedConfig) -> Self {
        self.explorer = v;
        self
    }

    /// Batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f32) -> Self {
        self.discount_factor = v;
        self
    }

    /// Interval of target model updates.
    pub fn target_model_update(mut self, v: usize) -> Self {
        self.target_model_update = v;
        self
    }

    /// Sets `double_dqn`.
    pub fn double_dqn(mut self, double_dqn: bool) -> Self {
        self.double_dqn = double_dqn;
        self
    }

    /// Loads [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of DQN agent from {:?}", path_);
        Ok(b)
    }

    /// Saves [`DqnConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of DQN agent into {:?}", path_);
        Ok(())
    }
}

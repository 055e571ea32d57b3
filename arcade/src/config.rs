use crate::{args::Args, types::EnvConfig};
use anyhow::{bail, Result};
use arcade_agent::{DqnConfig, DuelingQ, LinearQConfig, OptimizerConfig};
use arcade_core::{LinearAnnealedConfig, RunPaths, SequentialMemoryConfig, TrainerConfig};
use arcade_env::{FrameTransformConfig, MiniBreakoutConfig};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of a run.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ArcadeConfig {
    pub env_name: String,
    pub log_dir: String,
    pub seed: i64,
    pub test_episodes: usize,
    pub env_config: MiniBreakoutConfig,
    pub transform: FrameTransformConfig,
    pub memory_config: SequentialMemoryConfig,
    pub agent_config: DqnConfig<DuelingQ>,
    pub trainer_config: TrainerConfig,
}

impl From<&Args> for ArcadeConfig {
    fn from(args: &Args) -> Self {
        Self {
            env_name: args.name.clone(),
            log_dir: args.log_dir.clone(),
            seed: args.seed,
            test_episodes: args.test_episodes,
            env_config: MiniBreakoutConfig::default(),
            transform: FrameTransformConfig::default(),
            memory_config: create_memory_config(args),
            agent_config: create_agent_config(args),
            trainer_config: create_trainer_config(args),
        }
    }
}

fn create_memory_config(args: &Args) -> SequentialMemoryConfig {
    SequentialMemoryConfig::default()
        .capacity(1000)
        .window_length(3)
        .seed(args.seed as u64)
}

fn create_agent_config(args: &Args) -> DqnConfig<DuelingQ> {
    // Input dimension and number of actions are set from the environment.
    let model_config =
        LinearQConfig::default().opt_config(OptimizerConfig::Adam { lr: 1e-4 });
    let explorer = LinearAnnealedConfig::default()
        .value_max(1.0)
        .value_min(0.1)
        .value_test(0.2)
        .nb_steps(args.steps)
        .seed(args.seed as u64);
    DqnConfig::new(model_config)
        .explorer(explorer)
        .batch_size(32)
        .discount_factor(0.99)
        .target_model_update(10_000)
        .double_dqn(true)
}

fn create_trainer_config(args: &Args) -> TrainerConfig {
    TrainerConfig::default()
        .nb_steps(args.steps)
        .warmup_steps(1000)
        .train_interval(1)
        .log_interval(500)
        .checkpoint_interval(50_000)
        .seed(args.seed)
}

impl ArcadeConfig {
    /// Builds the configuration of a run from the arguments, or loads it
    /// from the file given by `--config`.
    pub fn from_args(args: &Args) -> Result<Self> {
        match &args.config {
            Some(path) => Self::load(path),
            None => Ok(args.into()),
        }
    }

    /// Checks every part of the configuration that can be checked before the
    /// environment is built.
    pub fn validate(&self) -> Result<()> {
        self.env_config.validate()?;
        self.memory_config.validate()?;
        self.agent_config.explorer.validate()?;
        self.trainer_config.validate()?;
        if self.agent_config.batch_size == 0 || self.agent_config.target_model_update == 0 {
            bail!("batch_size and target_model_update must be positive");
        }
        if self.test_episodes == 0 {
            bail!("test_episodes must be positive");
        }
        Ok(())
    }

    pub fn paths(&self) -> RunPaths {
        RunPaths::new(&self.log_dir, &self.env_name, self.trainer_config.nb_steps)
    }

    pub fn env_config(&self) -> EnvConfig {
        EnvConfig::new(self.env_config.clone(), self.transform.clone())
    }

    /// Constructs [`ArcadeConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config from {:?}", path_);
        Ok(b)
    }

    /// Saves [`ArcadeConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempdir::TempDir;

    #[test]
    fn test_from_args() {
        let args = Args::parse_from(["arcade", "--steps", "2000", "--seed", "7"]);
        let config = ArcadeConfig::from(&args);

        assert_eq!(config.env_name, "mini-breakout");
        assert_eq!(config.trainer_config.nb_steps, 2000);
        assert_eq!(config.trainer_config.warmup_steps, 1000);
        assert_eq!(config.agent_config.explorer.nb_steps, 2000);
        assert_eq!(config.agent_config.explorer.value_test, 0.2);
        assert_eq!(config.memory_config.capacity, 1000);
        assert_eq!(config.memory_config.window_length, 3);
        assert_eq!(config.test_episodes, 10);
        assert!(config.agent_config.double_dqn);
        assert_eq!(
            config.agent_config.model_config.opt_config,
            OptimizerConfig::Adam { lr: 1e-4 }
        );
        assert!(config.validate().is_ok());
        assert_eq!(
            config.paths().instance_dir(),
            Path::new("logs/mini-breakout/2000_steps")
        );
    }

    #[test]
    fn test_serde_arcade_config() -> Result<()> {
        let args = Args::parse_from(["arcade", "--mode", "test", "breakout"]);
        let config = ArcadeConfig::from(&args);

        let dir = TempDir::new("arcade_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;

        let args = Args::parse_from([
            "arcade",
            "--config",
            path.to_str().unwrap(),
        ]);
        assert_eq!(ArcadeConfig::from_args(&args)?, config);
        Ok(())
    }

    #[test]
    fn test_validate() -> Result<()> {
        let args = Args::parse_from(["arcade"]);
        let config = ArcadeConfig::from(&args);

        let mut invalid = config.clone();
        invalid.agent_config.explorer =
            invalid.agent_config.explorer.value_min(0.9).value_max(0.5);
        assert!(invalid.validate().is_err());

        let mut invalid = config.clone();
        invalid.memory_config = invalid.memory_config.capacity(0);
        assert!(invalid.validate().is_err());

        let mut invalid = config.clone();
        invalid.trainer_config = invalid.trainer_config.log_interval(0);
        assert!(invalid.validate().is_err());

        let mut invalid = config.clone();
        invalid.agent_config = invalid.agent_config.batch_size(0);
        assert!(invalid.validate().is_err());

        // An invalid file given by --config is rejected as well.
        let dir = TempDir::new("arcade_validate")?;
        let path = dir.path().join("config.yaml");
        let mut invalid = config;
        invalid.agent_config.explorer =
            invalid.agent_config.explorer.value_min(0.9).value_max(0.5);
        invalid.save(&path)?;
        let args = Args::parse_from(["arcade", "--config", path.to_str().unwrap()]);
        assert!(ArcadeConfig::from_args(&args)?.validate().is_err());
        Ok(())
    }
}

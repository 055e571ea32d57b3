//! Environment wrapper applying a frame transform.
use crate::{FrameTransformConfig, ObsTransform};
use anyhow::Result;
use arcade_core::{record::Record, Env, Frame, Step};

/// Configuration of [`ProcessedEnv`].
pub struct ProcessedEnvConfig<E: Env> {
    /// Configuration of the wrapped environment.
    pub env: E::Config,

    /// Preprocessing of the observations.
    pub transform: FrameTransformConfig,
}

impl<E: Env> Clone for ProcessedEnvConfig<E> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            transform: self.transform.clone(),
        }
    }
}

impl<E: Env> ProcessedEnvConfig<E> {
    /// Creates a configuration.
    pub fn new(env: E::Config, transform: FrameTransformConfig) -> Self {
        Self { env, transform }
    }
}

/// Applies a transform to every observation of the wrapped environment.
pub struct ProcessedEnv<E: Env> {
    env: E,
    transform: ObsTransform,
}

impl<E: Env> ProcessedEnv<E> {
    /// Wraps an environment.
    pub fn new(env: E, transform: ObsTransform) -> Self {
        Self { env, transform }
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E: Env> Env for ProcessedEnv<E> {
    type Config = ProcessedEnvConfig<E>;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let env = E::build(&config.env, seed)?;
        Ok(Self::new(env, config.transform.build()))
    }

    fn reset(&mut self) -> Result<Frame> {
        (self.transform)(self.env.reset()?)
    }

    fn step(&mut self, act: usize) -> Result<(Step, Record)> {
        let (step, record) = self.env.step(act)?;
        let obs = (self.transform)(step.obs)?;
        Ok((
            Step::new(step.act, obs, step.reward, step.is_terminal),
            record,
        ))
    }

    fn n_actions(&self) -> usize {
        self.env.n_actions()
    }

    fn action_meanings(&self) -> Vec<String> {
        self.env.action_meanings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MiniBreakout, MiniBreakoutConfig};

    #[test]
    fn test_processed_env() -> Result<()> {
        let env_config = MiniBreakoutConfig::default().pixel_scale(2);
        let config = ProcessedEnvConfig::<MiniBreakout>::new(
            env_config.clone(),
            FrameTransformConfig::default().resize(6, 8),
        );
        let mut env = ProcessedEnv::<MiniBreakout>::build(&config, 0)?;

        assert_eq!(env.reset()?.shape(), &[6, 8, 1]);
        let (step, _) = env.step(1)?;
        assert_eq!(step.obs.shape(), &[6, 8, 1]);
        assert_eq!(step.act, 1);
        assert_eq!(env.n_actions(), 4);
        assert_eq!(env.action_meanings()[1], "FIRE");
        assert_eq!(env.inner().config(), &env_config);
        Ok(())
    }
}

use super::Evaluator;
use crate::{
    error::CoreError,
    record::{Record, RecordValue},
    Env, FrameStacker, Policy,
};
use anyhow::Result;
use log::info;

/// Runs a fixed number of episodes and reports the episode rewards.
///
/// The returned record holds `episode_reward` (the mean over episodes),
/// `episode_reward_min` and `episode_reward_max`.
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    window_length: usize,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy>(&mut self, policy: &mut P) -> Result<Record> {
        let mut rewards = Vec::with_capacity(self.n_episodes);
        let mut stacker = FrameStacker::new(self.window_length);

        for ix in 0..self.n_episodes {
            stacker.reset(self.env.reset()?);
            let mut r_total = 0f32;
            let mut n_steps = 0;

            loop {
                let act = policy.sample(&stacker.state())?;
                let (step, _) = self.env.step(act)?;
                r_total += step.reward;
                n_steps += 1;
                if step.is_done() {
                    break;
                }
                stacker.push(step.obs);
            }

            info!("Episode {}: reward: {}, steps: {}", ix + 1, r_total, n_steps);
            rewards.push(r_total);
        }

        let mean = rewards.iter().sum::<f32>() / self.n_episodes as f32;
        let min = rewards.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = rewards.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        Ok(Record::from_slice(&[
            ("episode_reward", RecordValue::Scalar(mean)),
            ("episode_reward_min", RecordValue::Scalar(min)),
            ("episode_reward_max", RecordValue::Scalar(max)),
        ]))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation
    /// * `window_length` - Number of observations stacked for the policy
    pub fn new(
        config: &E::Config,
        seed: i64,
        n_episodes: usize,
        window_length: usize,
    ) -> Result<Self> {
        if n_episodes == 0 || window_length == 0 {
            return Err(CoreError::InvalidConfig(
                "n_episodes and window_length must be positive".to_string(),
            )
            .into());
        }
        Ok(Self {
            n_episodes,
            window_length,
            env: E::build(config, seed)?,
        })
    }
}

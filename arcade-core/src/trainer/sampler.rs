//! Experience sampling.
use crate::{
    record::{Record, RecordValue},
    Env, ExperienceBufferBase, Frame, FrameStacker, Policy, Transition,
};
use anyhow::Result;
use log::debug;

/// Runs the environment with a policy and pushes the transitions into a
/// replay buffer.
///
/// The sampler keeps the observation the next action will be chosen on and a
/// [`FrameStacker`] of the current episode. An episode that ends is reset on
/// the next call.
pub struct Sampler<E: Env> {
    env: E,
    stacker: FrameStacker,
    prev_obs: Option<Frame>,
    episode_reward: f32,
    episode_steps: usize,
    n_episodes: usize,
}

impl<E: Env> Sampler<E> {
    /// Creates a sampler stacking `window_length` observations for the policy.
    pub fn new(env: E, window_length: usize) -> Self {
        Self {
            env,
            stacker: FrameStacker::new(window_length),
            prev_obs: None,
            episode_reward: 0.0,
            episode_steps: 0,
            n_episodes: 0,
        }
    }

    /// Number of completed episodes.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    /// Performs an environment step and pushes the transition
    /// `(o_t, a_t, r_t, done_t)` into `buffer`.
    ///
    /// The returned record merges the environment's record with
    /// `episode_reward` and `episode_steps` when an episode has ended.
    pub fn sample_and_push<P, B>(&mut self, policy: &mut P, buffer: &mut B) -> Result<Record>
    where
        P: Policy,
        B: ExperienceBufferBase<Item = Transition>,
    {
        let obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => {
                let obs = self.env.reset()?;
                self.stacker.reset(obs.clone());
                obs
            }
        };

        let act = policy.sample(&self.stacker.state())?;
        let (step, mut record) = self.env.step(act)?;
        buffer.push(Transition::new(obs, act, step.reward, step.is_terminal))?;

        self.episode_reward += step.reward;
        self.episode_steps += 1;

        if step.is_done() {
            debug!(
                "Episode {} finished: reward {}, {} steps",
                self.n_episodes, self.episode_reward, self.episode_steps
            );
            record.insert("episode_reward", RecordValue::Scalar(self.episode_reward));
            record.insert(
                "episode_steps",
                RecordValue::Scalar(self.episode_steps as f32),
            );
            self.n_episodes += 1;
            self.episode_reward = 0.0;
            self.episode_steps = 0;
        } else {
            self.stacker.push(step.obs.clone());
            self.prev_obs = Some(step.obs);
        }

        Ok(record)
    }
}

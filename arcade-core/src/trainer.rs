//! Train [`Agent`].
mod config;
mod sampler;
use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    Agent, Env, ReplayBufferBase, RunPaths, SequentialMemory, SequentialMemoryConfig,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{info, warn};
pub use sampler::Sampler;
use std::path::Path;

/// Manages the training loop.
///
/// # Training loop
///
/// 0. Build the environment, the [`SequentialMemory`] and a [`Sampler`], and
///    set the agent to training mode.
/// 1. Do an environment step: the agent selects an action on the stacked
///    recent observations, the environment steps and the transition is
///    appended to the memory. `env_steps += 1`.
/// 2. If `env_steps > warmup_steps` and `env_steps % train_interval == 0`, do
///    an optimization step with batches sampled from the memory. The agent
///    may skip it, e.g. while the memory is shorter than a window.
/// 3. If `env_steps % log_interval == 0`, flush the aggregated records.
/// 4. If `env_steps % checkpoint_interval == 0`, save the agent's parameters
///    to [`RunPaths::checkpoint_path`].
/// 5. Back to 1 until `env_steps == nb_steps`. Records stored since the last
///    flush are flushed, then the parameters are saved to
///    [`RunPaths::finished_weights_path`].
///
/// Without [`RunPaths`] nothing is saved.
pub struct Trainer<E: Env> {
    config: TrainerConfig,
    env_config: E::Config,
    memory_config: SequentialMemoryConfig,
    paths: Option<RunPaths>,
}

impl<E: Env> Trainer<E> {
    /// Constructs a trainer. Fails if a configuration is invalid.
    pub fn build(
        config: TrainerConfig,
        env_config: E::Config,
        memory_config: SequentialMemoryConfig,
    ) -> Result<Self> {
        config.validate()?;
        memory_config.validate()?;
        Ok(Self {
            config,
            env_config,
            memory_config,
            paths: None,
        })
    }

    /// Sets where checkpoints and the final weights are saved.
    pub fn paths(mut self, paths: RunPaths) -> Self {
        self.paths = Some(paths);
        self
    }

    fn save_model<A>(agent: &A, path: &Path)
    where
        A: Agent<SequentialMemory>,
    {
        match agent.save_params(path) {
            Ok(()) => info!("Saved the model in {:?}.", path),
            Err(e) => warn!("Failed to save the model in {:?}: {}", path, e),
        }
    }

    /// Performs a training step.
    ///
    /// The second value of the returned tuple is `true` if an optimization
    /// step was done.
    pub fn train_step<A>(
        &self,
        agent: &mut A,
        buffer: &mut SequentialMemory,
        sampler: &mut Sampler<E>,
        env_steps: &mut usize,
    ) -> Result<(Record, bool)>
    where
        A: Agent<SequentialMemory>,
    {
        let record = sampler.sample_and_push(agent, buffer)?;
        *env_steps += 1;

        if *env_steps <= self.config.warmup_steps
            || *env_steps % self.config.train_interval != 0
        {
            return Ok((record, false));
        }

        match agent.opt(buffer)? {
            Some(record_agent) => Ok((record.merge(record_agent), true)),
            None => Ok((record, false)),
        }
    }

    /// Trains the agent and returns the number of optimization steps done.
    pub fn train<A>(&mut self, agent: &mut A, recorder: &mut dyn Recorder) -> Result<usize>
    where
        A: Agent<SequentialMemory>,
    {
        let env = E::build(&self.env_config, self.config.seed)?;
        let mut buffer = SequentialMemory::build(&self.memory_config)?;
        let mut sampler = Sampler::new(env, self.memory_config.window_length);
        let mut env_steps = 0;
        let mut opt_steps = 0;
        agent.train();

        info!(
            "Training for {} steps, {} warmup steps",
            self.config.nb_steps, self.config.warmup_steps
        );

        while env_steps < self.config.nb_steps {
            let (mut record, is_opt) =
                self.train_step(agent, &mut buffer, &mut sampler, &mut env_steps)?;
            if is_opt {
                opt_steps += 1;
                record.insert("opt_steps", Scalar(opt_steps as f32));
            }

            if !record.is_empty() {
                recorder.store(record);
            }

            if env_steps % self.config.log_interval == 0 {
                recorder.flush(env_steps)?;
                info!(
                    "{} env steps, {} opt steps, {} episodes",
                    env_steps,
                    opt_steps,
                    sampler.n_episodes()
                );
            }

            if env_steps % self.config.checkpoint_interval == 0 {
                if let Some(paths) = &self.paths {
                    Self::save_model(agent, &paths.checkpoint_path(env_steps));
                }
            }
        }

        if env_steps % self.config.log_interval != 0 {
            recorder.flush(env_steps)?;
        }

        if let Some(paths) = &self.paths {
            let path = paths.finished_weights_path();
            agent.save_params(&path)?;
            info!("Saved the final model in {:?}.", path);
        }

        Ok(opt_steps)
    }
}

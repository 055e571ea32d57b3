//! DQN agent.
use super::DqnConfig;
use crate::{QModel, QTargetBatch};
use anyhow::Result;
use arcade_core::{
    error::CoreError,
    explorer::argmax,
    record::{Record, RecordValue},
    Agent, LinearAnnealedPolicy, Policy, ReplayBufferBase, SequentialMemory, StackedObs,
};
use log::debug;
use std::{fs, path::Path};

/// DQN agent.
///
/// Actions are selected by a [`LinearAnnealedPolicy`] on the values estimated
/// by the online model. An optimization step regresses the online model
/// towards `r + gamma * max_a Q_tgt(s', a)` (just `r` on terminal
/// transitions), where `Q_tgt` is a copy of the online model refreshed every
/// `target_model_update` optimization steps.
///
/// With `double_dqn`, the bootstrapped value is `Q_tgt(s', argmax_a Q(s', a))`
/// instead.
pub struct Dqn<M: QModel> {
    qnet: M,
    qnet_tgt: M,
    policy: LinearAnnealedPolicy,
    batch_size: usize,
    discount_factor: f32,
    target_model_update: usize,
    double_dqn: bool,
    n_opts: usize,
    train: bool,
}

impl<M: QModel> Dqn<M> {
    /// Constructs DQN agent. Fails on an invalid configuration.
    pub fn build(config: &DqnConfig<M>) -> Result<Self> {
        if config.batch_size == 0 || config.target_model_update == 0 {
            return Err(CoreError::InvalidConfig(
                "batch_size and target_model_update must be positive".to_string(),
            )
            .into());
        }
        let qnet = M::build(&config.model_config)?;
        let qnet_tgt = qnet.clone();
        Ok(Self {
            qnet,
            qnet_tgt,
            policy: LinearAnnealedPolicy::build(&config.explorer)?,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            target_model_update: config.target_model_update,
            double_dqn: config.double_dqn,
            n_opts: 0,
            train: false,
        })
    }

    /// The exploration policy.
    pub fn policy(&self) -> &LinearAnnealedPolicy {
        &self.policy
    }

    /// The online model.
    pub fn model(&self) -> &M {
        &self.qnet
    }

    /// Number of optimization steps done.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Value of the best action on the next state.
    fn bootstrap_value(&self, state1: &StackedObs) -> Result<f32> {
        let q_tgt = self.qnet_tgt.estimate(state1)?;
        let act = if self.double_dqn {
            argmax(&self.qnet.estimate(state1)?)
        } else {
            argmax(&q_tgt)
        };
        Ok(q_tgt[act])
    }

    fn opt_(&mut self, buffer: &mut SequentialMemory) -> Result<Option<Record>> {
        let batch = match buffer.batch(self.batch_size) {
            Ok(batch) => batch,
            Err(e) => match e.downcast_ref::<CoreError>() {
                Some(CoreError::InsufficientHistory { length, required }) => {
                    debug!(
                        "Skip optimization: {} transitions, {} required",
                        length, required
                    );
                    return Ok(None);
                }
                _ => return Err(e),
            },
        };

        let mut targets = Vec::with_capacity(batch.len());
        for (state1, (&reward, &is_terminal)) in batch
            .state1
            .iter()
            .zip(batch.reward.iter().zip(batch.is_terminal.iter()))
        {
            let target = if is_terminal {
                reward
            } else {
                reward + self.discount_factor * self.bootstrap_value(state1)?
            };
            targets.push(target);
        }

        let mut mean_q = 0f32;
        for state0 in batch.state0.iter() {
            let q = self.qnet.estimate(state0)?;
            mean_q += q[argmax(&q)];
        }
        mean_q /= batch.len() as f32;

        let loss = self.qnet.update(&QTargetBatch {
            states: batch.state0,
            actions: batch.act,
            targets,
        })?;

        self.n_opts += 1;
        if self.n_opts % self.target_model_update == 0 {
            self.qnet_tgt = self.qnet.clone();
            debug!("Updated the target model at opt step {}", self.n_opts);
        }

        let record = Record::from_slice(&[
            ("loss", RecordValue::Scalar(loss)),
            ("mean_q", RecordValue::Scalar(mean_q)),
        ]);
        Ok(Some(record.merge(self.policy.record())))
    }
}

impl<M: QModel> Policy for Dqn<M> {
    fn sample(&mut self, state: &StackedObs) -> Result<usize> {
        let q = self.qnet.estimate(state)?;
        let act = self.policy.select_action(&q, self.train)?;
        if self.train {
            self.policy.advance();
        }
        Ok(act)
    }
}

impl<M: QModel> Agent<SequentialMemory> for Dqn<M> {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut SequentialMemory) -> Result<Option<Record>> {
        self.opt_(buffer)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.qnet.save(&path.join("qnet.json"))?;
        self.qnet_tgt.save(&path.join("qnet_tgt.json"))?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(&path.join("qnet.json"))?;
        self.qnet_tgt.load(&path.join("qnet_tgt.json"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DuelingQ, LinearQ, LinearQConfig, OptimizerConfig};
    use arcade_core::{Frame, LinearAnnealedConfig, SequentialMemoryConfig, Transition};
    use ndarray::IxDyn;
    use tempdir::TempDir;

    fn frame(v: u8) -> Frame {
        Frame::from_elem(IxDyn(&[1, 1, 1]), v)
    }

    fn config() -> DqnConfig<LinearQ> {
        let model_config = LinearQConfig::default()
            .input_dim(2)
            .n_actions(2)
            .opt_config(OptimizerConfig::Sgd { lr: 0.1 });
        DqnConfig::new(model_config)
            .batch_size(8)
            .discount_factor(0.0)
            .target_model_update(1)
            .explorer(LinearAnnealedConfig::default().nb_steps(10))
    }

    /// Reward 1 for action 1, 0 for action 0.
    fn memory(n: usize) -> Result<SequentialMemory> {
        let config = SequentialMemoryConfig::default().capacity(100).window_length(2);
        let mut memory = SequentialMemory::build(&config)?;
        for t in 0..n {
            let act = t % 2;
            let tr = Transition::new(frame((t * 37 % 256) as u8), act, act as f32, t % 7 == 6);
            memory.append(tr)?;
        }
        Ok(memory)
    }

    #[test]
    fn test_sample_advances_only_in_training() -> Result<()> {
        let mut dqn = Dqn::build(&config())?;
        let state = StackedObs::new(vec![frame(0), frame(1)]);

        dqn.eval();
        dqn.sample(&state)?;
        assert_eq!(dqn.policy().current_step(), 0);

        dqn.train();
        for _ in 0..3 {
            let act = dqn.sample(&state)?;
            assert!(act < 2);
        }
        assert_eq!(dqn.policy().current_step(), 3);
        assert!(dqn.is_train());
        Ok(())
    }

    #[test]
    fn test_opt_skips_on_insufficient_history() -> Result<()> {
        let mut dqn = Dqn::build(&config())?;
        let mut memory = memory(2)?;
        assert!(dqn.opt(&mut memory)?.is_none());
        assert_eq!(dqn.n_opts(), 0);
        Ok(())
    }

    #[test]
    fn test_opt_learns_rewards() -> Result<()> {
        let mut dqn = Dqn::build(&config())?;
        let mut memory = memory(50)?;

        let mut losses = vec![];
        for _ in 0..200 {
            let record = dqn.opt(&mut memory)?.unwrap();
            losses.push(record.get_scalar("loss")?);
            assert!(record.get_scalar("eps").is_ok());
            assert!(record.get_scalar("mean_q").is_ok());
        }
        let head = losses[..10].iter().sum::<f32>() / 10.0;
        let tail = losses[190..].iter().sum::<f32>() / 10.0;
        assert!(tail < 0.5 * head, "loss {} -> {}", head, tail);
        assert_eq!(dqn.n_opts(), 200);

        // The target model follows the online model every step.
        assert_eq!(dqn.qnet, dqn.qnet_tgt);
        Ok(())
    }

    #[test]
    fn test_target_model_update_interval() -> Result<()> {
        let mut dqn = Dqn::build(&config().target_model_update(3))?;
        let mut memory = memory(20)?;

        dqn.opt(&mut memory)?;
        dqn.opt(&mut memory)?;
        assert_ne!(dqn.qnet, dqn.qnet_tgt);
        dqn.opt(&mut memory)?;
        assert_eq!(dqn.qnet, dqn.qnet_tgt);
        Ok(())
    }

    #[test]
    fn test_double_dqn_bootstrap_value() -> Result<()> {
        let mut memory = memory(30)?;
        for double_dqn in [false, true] {
            let config = config()
                .discount_factor(0.9)
                .target_model_update(4)
                .double_dqn(double_dqn);
            let mut dqn = Dqn::build(&config)?;
            for _ in 0..6 {
                dqn.opt(&mut memory)?;
            }
            assert_ne!(dqn.qnet, dqn.qnet_tgt);

            for v in [0u8, 60, 130, 250] {
                let state = StackedObs::new(vec![frame(v), frame(255 - v)]);
                let q = dqn.qnet.estimate(&state)?;
                let q_tgt = dqn.qnet_tgt.estimate(&state)?;
                let expected = if double_dqn {
                    q_tgt[argmax(&q)]
                } else {
                    q_tgt[argmax(&q_tgt)]
                };
                assert_eq!(dqn.bootstrap_value(&state)?, expected);
                assert!(dqn.bootstrap_value(&state)? <= q_tgt[argmax(&q_tgt)]);
            }
        }
        Ok(())
    }

    #[test]
    fn test_dueling_double_dqn_learns_rewards() -> Result<()> {
        let model_config = LinearQConfig::default()
            .input_dim(2)
            .n_actions(2)
            .opt_config(OptimizerConfig::Adam { lr: 0.01 });
        let config = DqnConfig::<DuelingQ>::new(model_config)
            .batch_size(8)
            .discount_factor(0.0)
            .target_model_update(10)
            .double_dqn(true)
            .explorer(LinearAnnealedConfig::default().nb_steps(10));
        let mut dqn = Dqn::build(&config)?;
        let mut memory = memory(50)?;

        let mut losses = vec![];
        for _ in 0..300 {
            let record = dqn.opt(&mut memory)?.unwrap();
            losses.push(record.get_scalar("loss")?);
        }
        let head = losses[..10].iter().sum::<f32>() / 10.0;
        let tail = losses[290..].iter().sum::<f32>() / 10.0;
        assert!(tail < 0.5 * head, "loss {} -> {}", head, tail);
        Ok(())
    }

    #[test]
    fn test_save_load_params() -> Result<()> {
        let mut dqn = Dqn::build(&config())?;
        let mut memory = memory(20)?;
        for _ in 0..5 {
            dqn.opt(&mut memory)?;
        }

        let dir = TempDir::new("dqn")?;
        let path = dir.path().join("weights");
        dqn.save_params(&path)?;

        let mut dqn_ = Dqn::build(&config())?;
        dqn_.load_params(&path)?;
        let state = StackedObs::new(vec![frame(10), frame(200)]);
        assert_eq!(dqn.model().estimate(&state)?, dqn_.model().estimate(&state)?);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        assert!(Dqn::build(&config().batch_size(0)).is_err());
        let explorer = LinearAnnealedConfig::default().value_min(0.9).value_max(0.1);
        assert!(Dqn::build(&config().explorer(explorer)).is_err());
    }
}

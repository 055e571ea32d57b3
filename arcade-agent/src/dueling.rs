//! Dueling action-value model.
use crate::{
    linear::{input, Affine},
    opt::Optimizer,
    LinearQConfig, QModel, QTargetBatch,
};
use anyhow::{bail, Result};
use arcade_core::StackedObs;
use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

#[derive(Deserialize, Serialize)]
struct DuelingQParams {
    value: Affine,
    advantage: Affine,
}

/// Action values from separate state-value and advantage streams.
///
/// Both streams are affine in the pixels. They are combined with the
/// average advantage as the baseline:
///
/// `Q(s, a) = V(s) + A(s, a) - mean_b A(s, b)`
///
/// Uses the same configuration as [`LinearQ`](crate::LinearQ).
#[derive(Clone, Debug, PartialEq)]
pub struct DuelingQ {
    value: Affine,
    advantage: Affine,
    opt: Optimizer,
}

impl DuelingQ {
    fn input_dim(&self) -> usize {
        self.value.weights.ncols()
    }

    fn forward(&self, x: &Array1<f32>) -> Array1<f32> {
        let v = self.value.forward(x)[0];
        let a = self.advantage.forward(x);
        let baseline = a.mean().unwrap_or(0.0);
        a.mapv(|a| v + a - baseline)
    }
}

impl QModel for DuelingQ {
    type Config = LinearQConfig;

    fn build(config: &Self::Config) -> Result<Self> {
        config.check()?;
        Ok(Self {
            value: Affine::zeros(1, config.input_dim),
            advantage: Affine::zeros(config.n_actions, config.input_dim),
            opt: config.opt_config.build()?,
        })
    }

    fn n_actions(&self) -> usize {
        self.advantage.bias.len()
    }

    fn estimate(&self, state: &StackedObs) -> Result<Vec<f32>> {
        let x = input(state, self.input_dim())?;
        Ok(self.forward(&x).to_vec())
    }

    fn update(&mut self, batch: &QTargetBatch) -> Result<f32> {
        if batch.is_empty() {
            bail!("Empty batch");
        }
        let n = batch.len() as f32;
        let n_actions = self.n_actions();

        let mut grad_value = self.value.zero_grads();
        let mut grad_advantage = self.advantage.zero_grads();
        let mut loss = 0f32;
        for ((state, &act), &target) in batch
            .states
            .iter()
            .zip(batch.actions.iter())
            .zip(batch.targets.iter())
        {
            if act >= n_actions {
                bail!("Action {} out of range", act);
            }
            let x = input(state, self.input_dim())?;
            let err = self.forward(&x)[act] - target;
            loss += err * err;

            // dQ(a)/dV = 1, dQ(a)/dA(b) = [a == b] - 1 / n_actions
            let g = 2.0 * err / n;
            grad_value.accumulate(0, g, &x);
            for b in 0..n_actions {
                let indicator = if b == act { 1.0 } else { 0.0 };
                grad_advantage.accumulate(b, g * (indicator - 1.0 / n_actions as f32), &x);
            }
        }

        let mut params = self.value.params_mut();
        params.extend(self.advantage.params_mut());
        let mut grads = grad_value.into_grads();
        grads.extend(grad_advantage.into_grads());
        self.opt.step(params, grads)?;

        Ok(loss / n)
    }

    fn save(&self, path: &Path) -> Result<()> {
        let params = DuelingQParams {
            value: self.value.clone(),
            advantage: self.advantage.clone(),
        };
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(file, &params)?;
        info!("Saved dueling model to {:?}", path);
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let rdr = BufReader::new(File::open(path)?);
        let params: DuelingQParams = serde_json::from_reader(rdr)?;
        self.value.check_shape(&params.value, path)?;
        self.advantage.check_shape(&params.advantage, path)?;
        self.value = params.value;
        self.advantage = params.advantage;
        info!("Loaded dueling model from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptimizerConfig;
    use arcade_core::Frame;
    use ndarray::IxDyn;
    use tempdir::TempDir;

    fn state(values: &[u8]) -> StackedObs {
        StackedObs::new(
            values
                .iter()
                .map(|&v| Frame::from_elem(IxDyn(&[1, 1, 1]), v))
                .collect(),
        )
    }

    fn model(opt_config: OptimizerConfig) -> DuelingQ {
        let config = LinearQConfig::default()
            .input_dim(2)
            .n_actions(3)
            .opt_config(opt_config);
        DuelingQ::build(&config).unwrap()
    }

    #[test]
    fn test_estimate_subtracts_mean_advantage() -> Result<()> {
        let mut q = model(OptimizerConfig::default());
        assert_eq!(q.estimate(&state(&[0, 255]))?, vec![0.0; 3]);

        q.value.bias[0] = 1.0;
        q.advantage.bias = Array1::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(q.estimate(&state(&[0, 255]))?, vec![0.0, 1.0, 2.0]);

        // Shifting all advantages does not change the action values.
        q.advantage.bias += 10.0;
        assert_eq!(q.estimate(&state(&[0, 255]))?, vec![0.0, 1.0, 2.0]);
        assert!(q.estimate(&state(&[0])).is_err());
        Ok(())
    }

    #[test]
    fn test_update_reduces_loss() -> Result<()> {
        let mut q = model(OptimizerConfig::Adam { lr: 0.05 });
        let batch = QTargetBatch {
            states: vec![state(&[255, 0]), state(&[255, 0]), state(&[0, 255])],
            actions: vec![0, 1, 2],
            targets: vec![1.0, 0.0, -1.0],
        };

        let first = q.update(&batch)?;
        let mut last = first;
        for _ in 0..300 {
            last = q.update(&batch)?;
        }
        assert!(last < 0.1 * first, "loss {} -> {}", first, last);

        // The state value is the mean of the action values.
        let s = state(&[255, 0]);
        let values = q.estimate(&s)?;
        let v = q.value.forward(&input(&s, 2)?)[0];
        assert!((values.iter().sum::<f32>() / 3.0 - v).abs() < 1e-4);
        Ok(())
    }

    #[test]
    fn test_update_rejects_bad_batch() {
        let mut q = model(OptimizerConfig::default());
        assert!(q.update(&QTargetBatch::default()).is_err());
        let batch = QTargetBatch {
            states: vec![state(&[0, 0])],
            actions: vec![3],
            targets: vec![0.0],
        };
        assert!(q.update(&batch).is_err());
    }

    #[test]
    fn test_save_load() -> Result<()> {
        let mut q = model(OptimizerConfig::default());
        q.value.weights[[0, 1]] = 0.5;
        q.advantage.bias[2] = -1.5;

        let dir = TempDir::new("dueling_q")?;
        let path = dir.path().join("qnet.json");
        q.save(&path)?;

        let mut q_ = model(OptimizerConfig::default());
        q_.load(&path)?;
        assert_eq!(q, q_);

        let mut other = DuelingQ::build(&LinearQConfig::default().input_dim(3))?;
        assert!(other.load(&path).is_err());
        Ok(())
    }
}

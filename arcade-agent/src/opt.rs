//! Optimizers.
use anyhow::{bail, Result};
use ndarray::{ArrayD, ArrayViewMutD, Zip};
use serde::{Deserialize, Serialize};

const BETA1: f32 = 0.9;
const BETA2: f32 = 0.999;
const EPS: f32 = 1e-7;

/// Configures an optimizer for the parameters of a model.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Plain gradient descent.
    Sgd {
        /// Learning rate.
        lr: f32,
    },

    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f32,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 1e-4 }
    }
}

impl OptimizerConfig {
    /// Constructs an optimizer.
    pub fn build(&self) -> Result<Optimizer> {
        match self {
            Self::Sgd { lr } | Self::Adam { lr } if lr.is_nan() || *lr <= 0.0 => {
                bail!("Learning rate must be positive, got {}", lr)
            }
            _ => Ok(Optimizer {
                config: self.clone(),
                t: 0,
                moments: vec![],
            }),
        }
    }
}

/// Applies gradient steps to a fixed list of parameter arrays.
///
/// Adam keeps the first and second moments of each parameter array, so
/// [`Optimizer::step`] must be given the parameters in the same order every
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimizer {
    config: OptimizerConfig,
    t: i32,
    moments: Vec<(ArrayD<f32>, ArrayD<f32>)>,
}

impl Optimizer {
    /// Number of steps applied.
    pub fn n_steps(&self) -> i32 {
        self.t
    }

    /// Updates `params[i]` with the gradient `grads[i]`.
    pub fn step(
        &mut self,
        params: Vec<ArrayViewMutD<'_, f32>>,
        grads: Vec<ArrayD<f32>>,
    ) -> Result<()> {
        if params.len() != grads.len() {
            bail!("{} parameters but {} gradients", params.len(), grads.len());
        }
        if let Some((p, g)) = params
            .iter()
            .zip(grads.iter())
            .find(|(p, g)| p.shape() != g.shape())
        {
            bail!(
                "Gradient of shape {:?} for a parameter of shape {:?}",
                g.shape(),
                p.shape()
            );
        }
        self.t += 1;

        match self.config {
            OptimizerConfig::Sgd { lr } => {
                for (mut p, g) in params.into_iter().zip(grads.iter()) {
                    p.scaled_add(-lr, g);
                }
            }
            OptimizerConfig::Adam { lr } => {
                let fits = self.moments.len() == grads.len()
                    && self
                        .moments
                        .iter()
                        .zip(grads.iter())
                        .all(|((m, _), g)| m.shape() == g.shape());
                if !fits {
                    self.moments = grads
                        .iter()
                        .map(|g| (ArrayD::zeros(g.raw_dim()), ArrayD::zeros(g.raw_dim())))
                        .collect();
                }

                let c1 = 1.0 - BETA1.powi(self.t);
                let c2 = 1.0 - BETA2.powi(self.t);
                for ((p, g), (m, v)) in params
                    .into_iter()
                    .zip(grads.iter())
                    .zip(self.moments.iter_mut())
                {
                    Zip::from(p).and(g).and(m).and(v).for_each(|p, &g, m, v| {
                        *m = BETA1 * *m + (1.0 - BETA1) * g;
                        *v = BETA2 * *v + (1.0 - BETA2) * g * g;
                        *p -= lr * (*m / c1) / ((*v / c2).sqrt() + EPS);
                    });
                }
            }
        }

        Ok(())
    }
}

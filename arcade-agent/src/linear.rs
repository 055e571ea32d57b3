//! Linear action-value model.
use crate::{opt::Optimizer, OptimizerConfig, QModel, QTargetBatch};
use anyhow::{bail, Result};
use arcade_core::StackedObs;
use log::info;
use ndarray::{Array1, Array2, ArrayD, ArrayViewMutD};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Configuration of [`LinearQ`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LinearQConfig {
    /// Length of the flattened stack of observations.
    pub input_dim: usize,

    /// Number of actions.
    pub n_actions: usize,

    /// Optimizer of the parameters.
    pub opt_config: OptimizerConfig,
}

impl Default for LinearQConfig {
    fn default() -> Self {
        Self {
            input_dim: 0,
            n_actions: 4,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl LinearQConfig {
    /// Sets the input dimension.
    pub fn input_dim(mut self, v: usize) -> Self {
        self.input_dim = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the optimizer.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.input_dim == 0 || self.n_actions == 0 {
            bail!("input_dim and n_actions must be positive: {:?}", self);
        }
        Ok(())
    }
}

/// Affine map `y = W x + b`, initialized to zero.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub(crate) struct Affine {
    pub(crate) weights: Array2<f32>,
    pub(crate) bias: Array1<f32>,
}

impl Affine {
    pub(crate) fn zeros(out_dim: usize, in_dim: usize) -> Self {
        Self {
            weights: Array2::zeros((out_dim, in_dim)),
            bias: Array1::zeros(out_dim),
        }
    }

    pub(crate) fn forward(&self, x: &Array1<f32>) -> Array1<f32> {
        self.weights.dot(x) + &self.bias
    }

    /// Gradient buffers of the same shapes as the parameters.
    pub(crate) fn zero_grads(&self) -> Self {
        Self::zeros(self.bias.len(), self.weights.ncols())
    }

    /// Adds `c` times the gradient of output `i` at input `x`.
    pub(crate) fn accumulate(&mut self, i: usize, c: f32, x: &Array1<f32>) {
        self.weights.row_mut(i).scaled_add(c, x);
        self.bias[i] += c;
    }

    pub(crate) fn params_mut(&mut self) -> Vec<ArrayViewMutD<'_, f32>> {
        vec![
            self.weights.view_mut().into_dyn(),
            self.bias.view_mut().into_dyn(),
        ]
    }

    pub(crate) fn into_grads(self) -> Vec<ArrayD<f32>> {
        vec![self.weights.into_dyn(), self.bias.into_dyn()]
    }

    pub(crate) fn check_shape(&self, other: &Self, path: &Path) -> Result<()> {
        if self.weights.dim() != other.weights.dim() || self.bias.len() != other.bias.len() {
            bail!(
                "Parameters of shape {:?} in {:?} do not fit the model of shape {:?}",
                other.weights.dim(),
                path,
                self.weights.dim()
            );
        }
        Ok(())
    }
}

/// Flattens a stack of observations into a vector of pixels in `[0, 1]`.
pub(crate) fn input(state: &StackedObs, input_dim: usize) -> Result<Array1<f32>> {
    let x = state.to_f32_vec();
    if x.len() != input_dim {
        bail!(
            "Input of length {} given to a model with input dimension {}",
            x.len(),
            input_dim
        );
    }
    Ok(Array1::from(x))
}

/// Action values as an affine function of the pixels, `q = W x + b`.
///
/// The input `x` is the flattened stack of observations scaled to `[0, 1]`.
/// Parameters are fitted to the mean squared error with the configured
/// optimizer and saved as JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearQ {
    affine: Affine,
    opt: Optimizer,
}

impl QModel for LinearQ {
    type Config = LinearQConfig;

    fn build(config: &Self::Config) -> Result<Self> {
        config.check()?;
        Ok(Self {
            affine: Affine::zeros(config.n_actions, config.input_dim),
            opt: config.opt_config.build()?,
        })
    }

    fn n_actions(&self) -> usize {
        self.affine.bias.len()
    }

    fn estimate(&self, state: &StackedObs) -> Result<Vec<f32>> {
        let x = input(state, self.affine.weights.ncols())?;
        Ok(self.affine.forward(&x).to_vec())
    }

    fn update(&mut self, batch: &QTargetBatch) -> Result<f32> {
        if batch.is_empty() {
            bail!("Empty batch");
        }
        let n = batch.len() as f32;

        let mut grads = self.affine.zero_grads();
        let mut loss = 0f32;
        for ((state, &act), &target) in batch
            .states
            .iter()
            .zip(batch.actions.iter())
            .zip(batch.targets.iter())
        {
            if act >= self.n_actions() {
                bail!("Action {} out of range", act);
            }
            let x = input(state, self.affine.weights.ncols())?;
            let err = self.affine.weights.row(act).dot(&x) + self.affine.bias[act] - target;
            loss += err * err;
            grads.accumulate(act, 2.0 * err / n, &x);
        }

        self.opt.step(self.affine.params_mut(), grads.into_grads())?;
        Ok(loss / n)
    }

    fn save(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(file, &self.affine)?;
        info!("Saved linear model to {:?}", path);
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let rdr = BufReader::new(File::open(path)?);
        let params: Affine = serde_json::from_reader(rdr)?;
        self.affine.check_shape(&params, path)?;
        self.affine = params;
        info!("Loaded linear model from {:?}", path);
        Ok(())
    }
}

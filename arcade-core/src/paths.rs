//! File layout of a training run.
use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

/// Paths of the files a training run writes.
///
/// All paths live below an instance directory
/// `<root>/<env_name>/<nb_steps>_steps`:
///
/// ```text
/// <instance>/
/// ├── checkpoints/
/// │   └── dqn_<env_name>_weights_<step>/
/// ├── dqn_<env_name>_log.json
/// └── finished_weights/
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RunPaths {
    env_name: String,
    instance_dir: PathBuf,
}

impl RunPaths {
    /// Creates the layout of a run; no directory is created yet.
    pub fn new(root: impl AsRef<Path>, env_name: impl Into<String>, nb_steps: usize) -> Self {
        let env_name = env_name.into();
        let instance_dir = root
            .as_ref()
            .join(&env_name)
            .join(format!("{}_steps", nb_steps));
        Self {
            env_name,
            instance_dir,
        }
    }

    /// Name of the environment.
    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    /// Directory holding every output of the run.
    pub fn instance_dir(&self) -> &Path {
        &self.instance_dir
    }

    /// Directory of interval checkpoints.
    pub fn checkpoints_dir(&self) -> PathBuf {
        self.instance_dir.join("checkpoints")
    }

    /// Where the weights are saved at the given environment step.
    pub fn checkpoint_path(&self, step: usize) -> PathBuf {
        self.checkpoints_dir()
            .join(format!("dqn_{}_weights_{}", self.env_name, step))
    }

    /// The training log, one JSON object per line.
    pub fn log_path(&self) -> PathBuf {
        self.instance_dir
            .join(format!("dqn_{}_log.json", self.env_name))
    }

    /// Where the weights are saved when training has finished.
    pub fn finished_weights_path(&self) -> PathBuf {
        self.instance_dir.join("finished_weights")
    }

    /// Creates the instance and checkpoint directories if they do not exist.
    pub fn create_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.checkpoints_dir())?;
        info!("Outputs of the run go to {:?}", self.instance_dir);
        Ok(())
    }
}

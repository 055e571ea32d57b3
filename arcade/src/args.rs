use clap::Parser;
use serde::{Deserialize, Serialize};

/// Train/test DQN agent in a Breakout-like game
#[derive(Clone, Parser, Debug, Serialize, Deserialize, PartialEq)]
#[command(version, about)]
pub struct Args {
    /// "train", "test" or "show_config".
    /// Training is followed by a test of the trained agent.
    /// In test mode, the trained model is loaded.
    #[arg(long, default_value = "train")]
    pub mode: String,

    /// Number of environment steps of training
    #[arg(long, default_value_t = 500_000)]
    pub steps: usize,

    /// Root directory of the outputs of runs
    #[arg(long, default_value = "logs")]
    pub log_dir: String,

    /// YAML file of the whole configuration, replacing the one built from
    /// the other arguments
    #[arg(long)]
    pub config: Option<String>,

    /// Directory of the weights loaded in test mode.
    /// Defaults to the finished weights of the run.
    #[arg(long)]
    pub weights: Option<String>,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    pub seed: i64,

    /// Number of test episodes
    #[arg(long, default_value_t = 10)]
    pub test_episodes: usize,

    /// Name of the game, used in the paths of the outputs
    #[arg(default_value = "mini-breakout")]
    pub name: String,
}

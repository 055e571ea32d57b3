use arcade_agent::{Dqn, DuelingQ};
use arcade_core::DefaultEvaluator;
use arcade_env::{MiniBreakout, ProcessedEnv, ProcessedEnvConfig};

pub type Env = ProcessedEnv<MiniBreakout>;
pub type EnvConfig = ProcessedEnvConfig<MiniBreakout>;
pub type DqnAgent = Dqn<DuelingQ>;
pub type Evaluator = DefaultEvaluator<Env>;

#![warn(missing_docs)]
//! Core components for training a DQN agent on an arcade game.
//!
//! The crate provides the two pieces of the training pipeline that carry
//! invariants of their own:
//!
//! * [`SequentialMemory`], a bounded FIFO store of [`Transition`]s with random
//!   windowed sampling, and
//! * [`LinearAnnealedPolicy`], an epsilon-greedy action selector whose
//!   exploration rate decays linearly over a fixed number of steps.
//!
//! Around them it defines the seams of the rest of the pipeline: the
//! environment ([`Env`]), the agent ([`Agent`], [`Policy`]), records
//! ([`record`]), run paths ([`RunPaths`]), the training loop ([`Trainer`]) and
//! evaluation ([`DefaultEvaluator`]).
pub mod error;
pub mod record;

mod base;
pub use base::{Agent, Env, Frame, Policy, Step};

pub mod replay_buffer;
pub use replay_buffer::{
    ExperienceBatch, ExperienceBufferBase, ReplayBufferBase, SequentialMemory,
    SequentialMemoryConfig, Transition, WindowSample,
};

pub mod explorer;
pub use explorer::{EpsGreedy, LinearAnnealedConfig, LinearAnnealedPolicy};

mod stack;
pub use stack::{FrameStacker, StackedObs};

mod paths;
pub use paths::RunPaths;

mod trainer;
pub use trainer::{Sampler, Trainer, TrainerConfig};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

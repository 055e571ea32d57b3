//! Environments and observation preprocessing for arcade.
//!
//! [`MiniBreakout`] is a small paddle, ball and bricks game rendering RGB
//! screens, with the Breakout action set `NOOP, FIRE, RIGHT, LEFT`.
//! Observations are preprocessed by composable frame transforms, applied by
//! [`ProcessedEnv`]:
//!
//! ```
//! use arcade_core::Env;
//! use arcade_env::{
//!     FrameTransformConfig, MiniBreakout, MiniBreakoutConfig, ProcessedEnv, ProcessedEnvConfig,
//! };
//!
//! let config = ProcessedEnvConfig::<MiniBreakout>::new(
//!     MiniBreakoutConfig::default(),
//!     FrameTransformConfig::default(),
//! );
//! let mut env = ProcessedEnv::<MiniBreakout>::build(&config, 42).unwrap();
//! let obs = env.reset().unwrap();
//! assert_eq!(obs.shape()[2], 1);
//! ```
mod frame;
mod mini_breakout;
mod processed;
pub use frame::{compose, identity, resize, to_grayscale, FrameTransformConfig, ObsTransform};
pub use mini_breakout::{MiniBreakout, MiniBreakoutAction, MiniBreakoutConfig};
pub use processed::{ProcessedEnv, ProcessedEnvConfig};

//! Bounded replay memory with windowed sampling.
//!
//! [`SequentialMemory`] keeps the most recent transitions of the training run
//! in insertion order. Once `capacity` transitions are stored, every append
//! evicts the oldest one.
//!
//! Training inputs are built from *windows*: runs of `window_length`
//! consecutive transitions whose observations are stacked to give the network
//! short-term temporal context. When a window reaches back across the end of
//! an episode, the frames that belong to the earlier episode are replaced by
//! zero frames (see [`WindowSample::stacked_obs`]).
//!
//! ```
//! use arcade_core::{
//!     ReplayBufferBase, SequentialMemory, SequentialMemoryConfig, Transition,
//! };
//! use ndarray::{ArrayD, IxDyn};
//!
//! let config = SequentialMemoryConfig::default().capacity(8).window_length(3);
//! let mut memory = SequentialMemory::build(&config).unwrap();
//!
//! for t in 0..10 {
//!     let obs = ArrayD::from_elem(IxDyn(&[2, 2, 1]), t as u8);
//!     memory.append(Transition::new(obs, 0, 0.0, false)).unwrap();
//! }
//! assert_eq!(memory.len(), 8);
//!
//! let windows = memory.sample_batch(4, 3).unwrap();
//! assert!(windows.iter().all(|w| w.transitions().len() == 3));
//! ```
mod base;
mod config;
mod memory;
mod transition;
mod window;
pub use base::{ExperienceBufferBase, ReplayBufferBase};
pub use config::SequentialMemoryConfig;
pub use memory::SequentialMemory;
pub use transition::Transition;
pub use window::{ExperienceBatch, WindowSample};

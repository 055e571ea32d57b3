//! Core functionalities.
mod agent;
mod env;
mod policy;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use step::Step;

/// An observation of the environment.
///
/// Frames have a fixed shape for the whole run, e.g. `[height, width, 3]` for
/// raw RGB screens or `[height, width, 1]` after grayscale conversion.
pub type Frame = ndarray::ArrayD<u8>;

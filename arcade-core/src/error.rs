//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    /// The replay buffer does not hold enough transitions to form a window.
    #[error("Insufficient history: {length} transitions stored, {required} required")]
    InsufficientHistory {
        /// Number of stored transitions.
        length: usize,
        /// Number of transitions needed.
        required: usize,
    },

    /// An observation does not have the shape the buffer was locked to.
    #[error("Observation shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Shape of the observations already stored.
        expected: Vec<usize>,
        /// Shape of the rejected observation.
        got: Vec<usize>,
    },

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Action selection was given no action values.
    #[error("Empty action values")]
    EmptyActionValues,

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}

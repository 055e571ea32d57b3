//! Types and traits for recording training metrics.
//!
//! ```rust
//! use arcade_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode_reward", RecordValue::Scalar(3.0));
//! record.insert("env", RecordValue::String("mini-breakout".to_string()));
//! assert_eq!(record.get_scalar("episode_reward").unwrap(), 3.0);
//! ```
mod base;
mod buffered_recorder;
mod file_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use file_recorder::FileRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;

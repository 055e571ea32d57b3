use super::{Record, RecordStorage, RecordValue, Recorder};
use anyhow::Result;
use chrono::Local;
use log::warn;
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

/// Appends records to a file, one JSON object per line.
///
/// Stored records are aggregated on [`flush`](Recorder::flush) and written
/// with the environment step and a timestamp.
pub struct FileRecorder {
    path: PathBuf,
    storage: RecordStorage,
}

impl FileRecorder {
    /// Creates a recorder writing to `path`. The file is created on the first
    /// write and appended to afterwards.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            storage: RecordStorage::new(),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_line(&self, record: &Record) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(&record.to_json())?)?;
        Ok(())
    }
}

impl Recorder for FileRecorder {
    fn write(&mut self, record: Record) {
        if let Err(e) = self.append_line(&record) {
            warn!("Failed to write a record to {:?}: {}", self.path, e);
        }
    }

    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: usize) -> Result<()> {
        if self.storage.is_empty() {
            return Ok(());
        }
        let mut record = self.storage.aggregate();
        record.insert("env_steps", RecordValue::Scalar(step as f32));
        record.insert("datetime", RecordValue::DateTime(Local::now()));
        self.append_line(&record)
    }
}

use super::{Record, RecordStorage, RecordValue, Recorder};
use anyhow::Result;

/// Keeps records in memory.
///
/// Written records and aggregated records produced on [`flush`](Recorder::flush)
/// are both appended to the buffer.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    storage: RecordStorage,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.buf.iter()
    }

    /// Returns the number of buffered records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no record is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
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
        self.buf.push(record);
        Ok(())
    }
}

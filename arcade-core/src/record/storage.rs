//! Aggregation of stored records.
use super::{Record, RecordValue};
use std::collections::BTreeSet;

/// Stores records and aggregates them on demand.
///
/// Scalars are always reduced to `<key>_min`, `<key>_max` and `<key>_mean`,
/// so the set of keys does not depend on how often a value was stored. For
/// other value types the most recent value wins.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().cloned().fold(f32::INFINITY, f32::min))
}

fn max(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().cloned().fold(f32::NEG_INFINITY, f32::max))
}

fn mean(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().sum::<f32>() / vs.len() as f32)
}

impl RecordStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn keys(&self) -> BTreeSet<String> {
        self.data
            .iter()
            .flat_map(|record| record.keys().cloned())
            .collect()
    }

    fn latest(&self, key: &str) -> Option<&RecordValue> {
        self.data.iter().rev().find_map(|record| record.get(key))
    }

    fn scalars(&self, key: &str) -> Vec<f32> {
        self.data
            .iter()
            .filter_map(|record| match record.get(key) {
                Some(RecordValue::Scalar(v)) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Aggregates all stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.keys() {
            match self.latest(&key) {
                Some(RecordValue::Scalar(_)) => {
                    let vs = self.scalars(&key);
                    record.insert(format!("{}_min", key), min(&vs));
                    record.insert(format!("{}_max", key), max(&vs));
                    record.insert(format!("{}_mean", key), mean(&vs));
                }
                Some(value) => {
                    let value = value.clone();
                    record.insert(key, value);
                }
                None => {}
            }
        }

        self.data.clear();
        record
    }
}

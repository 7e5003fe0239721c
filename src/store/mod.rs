//! Per-user test record storage
//!
//! Records are keyed by the composite `(user_id, word)`. Every operation is
//! atomic for a single record; nothing spans records.

mod json;
mod memory;

pub use json::JsonRecordStore;
pub use memory::MemoryRecordStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schedule::TestRecord;

/// Composite key of a stored record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKey {
    pub user_id: String,
    pub word: String,
}

impl RecordKey {
    pub fn new(user_id: &str, word: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            word: word.to_string(),
        }
    }
}

pub trait TestRecordStore: Send + Sync {
    fn find_one(&self, user_id: &str, word: &str) -> Result<Option<TestRecord>>;

    /// Insert a new record. Fails with `Validation` if one already exists.
    fn create(&self, user_id: &str, record: TestRecord) -> Result<TestRecord>;

    /// Replace the mutable fields of an existing record.
    /// Returns `None` when no record exists for `(user_id, word)`.
    fn update(&self, user_id: &str, word: &str, record: &TestRecord) -> Result<Option<TestRecord>>;

    fn find_all_with_last_test_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<TestRecord>>;

    /// All records of a user, in no particular order
    fn list_for_user(&self, user_id: &str) -> Result<Vec<TestRecord>>;

    /// Insert several new records
    fn create_many(&self, user_id: &str, records: Vec<TestRecord>) -> Result<Vec<TestRecord>> {
        records
            .into_iter()
            .map(|record| self.create(user_id, record))
            .collect()
    }
}

/// Copy the mutable fields of `source` onto `target`, keeping its identity
pub(crate) fn merge_mutable(target: &mut TestRecord, source: &TestRecord) {
    target.last_test_date = source.last_test_date;
    target.previous_test_date = source.previous_test_date;
    target.average_days_between_tests = source.average_days_between_tests;
    target.number_of_trials = source.number_of_trials;
    target.user_notes = source.user_notes.clone();
    target.test_completed = source.test_completed;
}

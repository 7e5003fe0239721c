use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use super::{merge_mutable, RecordKey, TestRecordStore};
use crate::error::{RepasoError, Result};
use crate::schedule::TestRecord;

/// Record store held in process memory
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<RecordKey, TestRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<RecordKey, TestRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl TestRecordStore for MemoryRecordStore {
    fn find_one(&self, user_id: &str, word: &str) -> Result<Option<TestRecord>> {
        Ok(self.records().get(&RecordKey::new(user_id, word)).cloned())
    }

    fn create(&self, user_id: &str, record: TestRecord) -> Result<TestRecord> {
        let key = RecordKey::new(user_id, &record.word);
        let mut records = self.records();
        if records.contains_key(&key) {
            return Err(RepasoError::Validation(format!(
                "Record already exists for '{}'",
                record.word
            )));
        }
        records.insert(key, record.clone());
        Ok(record)
    }

    fn update(&self, user_id: &str, word: &str, record: &TestRecord) -> Result<Option<TestRecord>> {
        let mut records = self.records();
        Ok(records.get_mut(&RecordKey::new(user_id, word)).map(|stored| {
            merge_mutable(stored, record);
            stored.clone()
        }))
    }

    fn find_all_with_last_test_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<TestRecord>> {
        Ok(self
            .records()
            .iter()
            .filter(|(key, record)| key.user_id == user_id && record.last_test_date == date)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<TestRecord>> {
        Ok(self
            .records()
            .iter()
            .filter(|(key, _)| key.user_id == user_id)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

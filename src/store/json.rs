//! JSON file storage for test records
//!
//! Layout under the data directory:
//! ```text
//! records/
//! └── test_records.json   # Array of records, each tagged with its userId
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{merge_mutable, RecordKey, TestRecordStore};
use crate::error::{RepasoError, Result};
use crate::schedule::TestRecord;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    user_id: String,
    #[serde(flatten)]
    record: TestRecord,
}

type RecordMap = BTreeMap<RecordKey, TestRecord>;

/// Record store persisted to a single JSON file
pub struct JsonRecordStore {
    records_dir: PathBuf,
    /// Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let records_dir = data_dir.join("records");
        fs::create_dir_all(&records_dir)?;

        Ok(Self {
            records_dir,
            lock: Mutex::new(()),
        })
    }

    fn records_file(&self) -> PathBuf {
        self.records_dir.join("test_records.json")
    }

    fn load(&self) -> Result<RecordMap> {
        let path = self.records_file();
        if !path.exists() {
            return Ok(RecordMap::new());
        }

        let content = fs::read_to_string(path)?;
        let stored: Vec<StoredRecord> = serde_json::from_str(&content)?;
        Ok(stored
            .into_iter()
            .map(|s| (RecordKey::new(&s.user_id, &s.record.word), s.record))
            .collect())
    }

    fn save(&self, records: &RecordMap) -> Result<()> {
        let stored: Vec<StoredRecord> = records
            .iter()
            .map(|(key, record)| StoredRecord {
                user_id: key.user_id.clone(),
                record: record.clone(),
            })
            .collect();

        // Written next to the target, then renamed over it
        let path = self.records_file();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&stored)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn insert_all(&self, user_id: &str, new_records: &[TestRecord]) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut records = self.load()?;

        for record in new_records {
            let key = RecordKey::new(user_id, &record.word);
            if records.contains_key(&key) {
                return Err(RepasoError::Validation(format!(
                    "Record already exists for '{}'",
                    record.word
                )));
            }
            records.insert(key, record.clone());
        }

        self.save(&records)
    }
}

impl TestRecordStore for JsonRecordStore {
    fn find_one(&self, user_id: &str, word: &str) -> Result<Option<TestRecord>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.remove(&RecordKey::new(user_id, word)))
    }

    fn create(&self, user_id: &str, record: TestRecord) -> Result<TestRecord> {
        self.insert_all(user_id, std::slice::from_ref(&record))?;
        Ok(record)
    }

    fn create_many(&self, user_id: &str, records: Vec<TestRecord>) -> Result<Vec<TestRecord>> {
        if records.is_empty() {
            return Ok(records);
        }
        self.insert_all(user_id, &records)?;
        log::debug!("Created {} records for {}", records.len(), user_id);
        Ok(records)
    }

    fn update(&self, user_id: &str, word: &str, record: &TestRecord) -> Result<Option<TestRecord>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut records = self.load()?;

        let updated = match records.get_mut(&RecordKey::new(user_id, word)) {
            Some(stored) => {
                merge_mutable(stored, record);
                stored.clone()
            }
            None => return Ok(None),
        };

        self.save(&records)?;
        Ok(Some(updated))
    }

    fn find_all_with_last_test_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<TestRecord>> {
        Ok(self
            .list_for_user(user_id)?
            .into_iter()
            .filter(|record| record.last_test_date == date)
            .collect())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<TestRecord>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self
            .load()?
            .into_iter()
            .filter(|(key, _)| key.user_id == user_id)
            .map(|(_, record)| record)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WordEntry;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonRecordStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonRecordStore::new(temp_dir.path().to_path_buf()).unwrap();
        (store, temp_dir)
    }

    fn record(word: &str, rank: u32) -> TestRecord {
        TestRecord::new(&WordEntry::new(word, rank))
    }

    #[test]
    fn test_create_and_find() {
        let (store, _temp) = create_test_store();
        store.create("ana", record("que", 1)).unwrap();

        let found = store.find_one("ana", "que").unwrap().unwrap();
        assert_eq!(found.rank, 1);
        assert!(store.find_one("luis", "que").unwrap().is_none());
    }

    #[test]
    fn test_persists_across_instances() {
        let (store, temp) = create_test_store();
        store
            .create_many("ana", vec![record("que", 1), record("de", 2)])
            .unwrap();
        drop(store);

        let reopened = JsonRecordStore::new(temp.path().to_path_buf()).unwrap();
        assert_eq!(reopened.list_for_user("ana").unwrap().len(), 2);
    }

    #[test]
    fn test_file_format() {
        let (store, temp) = create_test_store();
        store.create("ana", record("que", 1)).unwrap();

        let content = fs::read_to_string(temp.path().join("records/test_records.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value[0]["userId"], "ana");
        assert_eq!(value[0]["word"], "que");
        assert_eq!(value[0]["previousTestDate"], "1947-04-01");
    }

    #[test]
    fn test_create_many_rejects_existing() {
        let (store, _temp) = create_test_store();
        store.create("ana", record("que", 1)).unwrap();

        let result = store.create_many("ana", vec![record("de", 2), record("que", 1)]);
        assert!(matches!(result, Err(RepasoError::Validation(_))));
        // Nothing from the failed batch is written
        assert!(store.find_one("ana", "de").unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let (store, _temp) = create_test_store();
        store.create("ana", record("que", 1)).unwrap();

        let mut changed = record("que", 1);
        changed.widen();
        let updated = store.update("ana", "que", &changed).unwrap().unwrap();
        assert_eq!(updated.average_days_between_tests, 2.0);

        assert!(store.update("ana", "de", &changed).unwrap().is_none());
    }

    #[test]
    fn test_find_by_last_test_date() {
        let (store, _temp) = create_test_store();
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut presented = record("que", 1);
        presented.present(today);
        store.create_many("ana", vec![presented, record("de", 2)]).unwrap();

        let found = store.find_all_with_last_test_date("ana", today).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].word, "que");
    }
}

pub mod catalog;
pub mod collation;
pub mod config;
pub mod error;
pub mod profile;
pub mod roster;
pub mod sanitize;
pub mod schedule;
pub mod store;

use catalog::{CachedCatalog, FileWordSource};
use config::Config;
use profile::ProfileStorage;
use schedule::ScheduleEngine;
use store::JsonRecordStore;

pub use error::{RepasoError, Result};

/// Engine backed by the JSON file stores under the configured data directory
pub type FileEngine = ScheduleEngine<CachedCatalog<FileWordSource>, JsonRecordStore, ProfileStorage>;

pub fn open_file_engine(config: &Config) -> Result<FileEngine> {
    let data_dir = config.data_dir()?;
    let catalog_path = config.catalog_path()?;

    let catalog = CachedCatalog::new(FileWordSource::new(catalog_path));
    let store = JsonRecordStore::new(data_dir.clone())?;
    let profiles = ProfileStorage::new(data_dir.clone(), config.default_tests_per_day)?;

    log::debug!("Opened engine at {}", data_dir.display());
    Ok(ScheduleEngine::new(catalog, store, profiles))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::schedule::{FixedJitter, RecordUpdate};
    use crate::store::TestRecordStore;

    fn open(temp: &TempDir) -> FileEngine {
        let config = Config {
            data_dir: Some(temp.path().to_path_buf()),
            ..Config::default()
        };
        open_file_engine(&config).unwrap().with_jitter(FixedJitter(0.0))
    }

    #[test]
    fn test_file_engine_round_trip() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("words.json"),
            r#"[{"word":"que","rank":1},{"word":"de","rank":2},{"word":"no","rank":3}]"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        let engine = open(&temp);
        let due = engine.due_items_with_quota("ana", 2, today).unwrap();
        assert_eq!(due.len(), 2);

        let mut item = engine.record("ana", "de").unwrap();
        item.record.complete(today);
        engine
            .submit_grade("ana", "de", RecordUpdate::from_record(&item.record))
            .unwrap();
        drop(engine);

        // A fresh process sees the same due-set
        let engine = open(&temp);
        let again = engine.due_items("ana", today).unwrap();
        let words: Vec<&str> = again.iter().map(|i| i.entry.word.as_str()).collect();
        assert_eq!(words, vec!["que", "de"]);
        assert!(again[1].record.test_completed);
        assert_eq!(engine.store().list_for_user("ana").unwrap().len(), 3);
    }

    #[test]
    fn test_missing_catalog() {
        let temp = TempDir::new().unwrap();
        let engine = open(&temp);
        let result = engine.all_with_records("ana");
        assert!(matches!(result, Err(RepasoError::NotFound(_))));
    }
}

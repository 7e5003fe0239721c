//! Due-set materialization, lookup and grading
//!
//! The engine decides which words a learner sees on a given day. The first
//! call of the day stamps the selected records with today's date; later
//! calls the same day return exactly the stamped set.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use super::algorithm::{is_due, JitterSource, RandomJitter};
use super::models::{RecordUpdate, TestRecord, WordWithRecord};
use crate::catalog::{WordCatalog, WordEntry};
use crate::collation::compare_spanish;
use crate::error::{RepasoError, Result};
use crate::profile::UserProfileService;
use crate::roster::{GlossMatch, GlossQuery, RosterQuery};
use crate::sanitize::strip_markup;
use crate::store::TestRecordStore;

/// Incomplete first, then by rank
pub fn sort_due(items: &mut [WordWithRecord]) {
    items.sort_by(|a, b| {
        a.record
            .test_completed
            .cmp(&b.record.test_completed)
            .then_with(|| a.entry.rank.cmp(&b.entry.rank))
    });
}

pub struct ScheduleEngine<C, S, P> {
    catalog: C,
    store: S,
    profiles: P,
    jitter: Box<dyn JitterSource>,
    /// One lock per user around due-set materialization
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<C, S, P> ScheduleEngine<C, S, P>
where
    C: WordCatalog,
    S: TestRecordStore,
    P: UserProfileService,
{
    pub fn new(catalog: C, store: S, profiles: P) -> Self {
        Self {
            catalog,
            store,
            profiles,
            jitter: Box::new(RandomJitter),
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn profiles(&self) -> &P {
        &self.profiles
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(user_id.to_string()).or_default())
    }

    /// Records for every catalog word, creating the missing ones.
    /// Returned in catalog (rank) order.
    fn fetch_or_create_all(&self, user_id: &str, catalog: &[WordEntry]) -> Result<Vec<WordWithRecord>> {
        let mut existing: HashMap<String, TestRecord> = self
            .store
            .list_for_user(user_id)?
            .into_iter()
            .map(|record| (record.word.clone(), record))
            .collect();

        let missing: Vec<TestRecord> = catalog
            .iter()
            .filter(|entry| !existing.contains_key(&entry.word))
            .map(TestRecord::new)
            .collect();

        if !missing.is_empty() {
            log::info!("Creating {} test records for {}", missing.len(), user_id);
            for record in self.store.create_many(user_id, missing)? {
                existing.insert(record.word.clone(), record);
            }
        }

        Ok(catalog
            .iter()
            .filter_map(|entry| {
                existing.remove(&entry.word).map(|record| WordWithRecord {
                    entry: entry.clone(),
                    record,
                })
            })
            .collect())
    }

    /// Today's words for a user, with the quota taken from their profile
    pub fn due_items(&self, user_id: &str, today: NaiveDate) -> Result<Vec<WordWithRecord>> {
        let quota = self.profiles.tests_per_day(user_id)?;
        self.due_items_with_quota(user_id, quota, today)
    }

    /// Today's words for a user, at most `quota` of them on first selection
    pub fn due_items_with_quota(
        &self,
        user_id: &str,
        quota: i32,
        today: NaiveDate,
    ) -> Result<Vec<WordWithRecord>> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let presented = self.store.find_all_with_last_test_date(user_id, today)?;
        let mut items = if presented.is_empty() {
            self.materialize(user_id, quota, today)?
        } else {
            log::debug!("Due-set for {} on {} already materialized", user_id, today);
            self.pair_with_catalog(presented)?
        };

        sort_due(&mut items);
        Ok(items)
    }

    fn pair_with_catalog(&self, records: Vec<TestRecord>) -> Result<Vec<WordWithRecord>> {
        let mut entries: HashMap<String, WordEntry> = self
            .catalog
            .list_all()?
            .into_iter()
            .map(|entry| (entry.word.clone(), entry))
            .collect();

        let mut items = Vec::with_capacity(records.len());
        for record in records {
            match entries.remove(&record.word) {
                Some(entry) => items.push(WordWithRecord { entry, record }),
                None => log::warn!("Record '{}' has no catalog entry; skipped", record.word),
            }
        }
        Ok(items)
    }

    fn materialize(&self, user_id: &str, quota: i32, today: NaiveDate) -> Result<Vec<WordWithRecord>> {
        let catalog = self.catalog.list_all()?;
        let all = self.fetch_or_create_all(user_id, &catalog)?;

        // One draw shared by every word in this run
        let jitter = self.jitter.draw();

        let mut candidates: Vec<WordWithRecord> = all
            .into_iter()
            .filter(|item| {
                is_due(
                    item.record.last_test_date,
                    item.record.average_days_between_tests,
                    today,
                    jitter,
                )
            })
            .collect();
        candidates.sort_by_key(|item| item.entry.rank);

        let limit = usize::try_from(quota).unwrap_or(0);
        let mut selected = Vec::with_capacity(limit.min(candidates.len()));

        for mut item in candidates.into_iter().take(limit) {
            item.record.present(today);
            let stored = self
                .store
                .update(user_id, &item.entry.word, &item.record)?
                .ok_or_else(|| RepasoError::NotFound(format!("Test record '{}'", item.entry.word)))?;
            item.record = stored;
            selected.push(item);
        }

        log::info!(
            "Materialized {} due words for {} on {} (jitter {:+.3}, quota {})",
            selected.len(),
            user_id,
            today,
            jitter,
            quota
        );

        self.profiles.record_test_date(user_id, today)?;
        Ok(selected)
    }

    /// Look up one word, creating its record on first reference
    pub fn record(&self, user_id: &str, word: &str) -> Result<WordWithRecord> {
        let entry = self
            .catalog
            .find(word)?
            .ok_or_else(|| RepasoError::NotFound(format!("Word '{}'", word)))?;

        let record = match self.store.find_one(user_id, word)? {
            Some(record) => record,
            None => {
                log::debug!("Creating test record '{}' for {}", word, user_id);
                self.store.create(user_id, TestRecord::new(&entry))?
            }
        };

        Ok(WordWithRecord { entry, record })
    }

    /// Persist a graded record
    pub fn submit_grade(&self, user_id: &str, word: &str, update: RecordUpdate) -> Result<TestRecord> {
        let mut record = self
            .store
            .find_one(user_id, word)?
            .ok_or_else(|| RepasoError::NotFound(format!("Test record '{}'", word)))?;

        if let Some(new_word) = update.word.as_deref() {
            if new_word != record.word {
                return Err(RepasoError::Validation(format!(
                    "Word of test record '{}' cannot change",
                    record.word
                )));
            }
        }
        if let Some(new_rank) = update.rank {
            if new_rank != record.rank {
                return Err(RepasoError::Validation(format!(
                    "Rank of test record '{}' cannot change",
                    record.word
                )));
            }
        }

        let clean_notes = strip_markup(&update.user_notes);
        update.apply_to(&mut record, clean_notes);

        let stored = self
            .store
            .update(user_id, word, &record)?
            .ok_or_else(|| RepasoError::NotFound(format!("Test record '{}'", word)))?;

        log::info!(
            "Graded '{}' for {}: interval {:.2}, trials {}, completed {}",
            word,
            user_id,
            stored.average_days_between_tests,
            stored.number_of_trials,
            stored.test_completed
        );
        Ok(stored)
    }

    /// Every catalog word with the user's record, in Spanish word order
    pub fn all_with_records(&self, user_id: &str) -> Result<Vec<WordWithRecord>> {
        let catalog = self.catalog.list_all()?;
        let mut items = self.fetch_or_create_all(user_id, &catalog)?;
        items.sort_by(|a, b| compare_spanish(&a.entry.word, &b.entry.word));
        Ok(items)
    }

    /// Filtered and sorted roster
    pub fn roster(&self, user_id: &str, query: &RosterQuery, today: NaiveDate) -> Result<Vec<WordWithRecord>> {
        Ok(query.apply(self.all_with_records(user_id)?, today))
    }

    /// Catalog senses whose gloss matches `query`
    pub fn search_glosses(&self, query: &GlossQuery) -> Result<Vec<GlossMatch>> {
        let matches = query.apply(&self.catalog.list_all()?)?;
        log::debug!("Gloss search '{}' matched {} senses", query.contains, matches.len());
        Ok(matches)
    }

    pub fn reset_catalog_cache(&self) {
        self.catalog.invalidate();
    }
}

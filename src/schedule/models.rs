//! Data models for per-user vocabulary test records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::algorithm::{self, clamp_interval, seed_interval};
use crate::catalog::WordEntry;
use crate::error::{RepasoError, Result};

/// Date stamped on records that have never been presented
pub fn never_tested() -> NaiveDate {
    NaiveDate::from_ymd_opt(1947, 4, 1).unwrap_or(NaiveDate::MIN)
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| RepasoError::InvalidDate(format!("'{}', expected YYYY-MM-DD", text)))
}

/// Scheduling state for one word of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub word: String,
    /// Copy of the catalog rank, used for ordering and seeding
    pub rank: u32,
    /// Date the word was last presented
    pub last_test_date: NaiveDate,
    /// Presentation date before `last_test_date`
    pub previous_test_date: NaiveDate,
    /// Current interval estimate in days, always within [1, 1000]
    pub average_days_between_tests: f64,
    #[serde(default)]
    pub number_of_trials: u32,
    /// Whether today's presentation has been graded
    #[serde(default)]
    pub test_completed: bool,
    #[serde(default)]
    pub user_notes: String,
}

impl TestRecord {
    /// Fresh record for a catalog word, never presented
    pub fn new(entry: &WordEntry) -> Self {
        Self {
            word: entry.word.clone(),
            rank: entry.rank,
            last_test_date: never_tested(),
            previous_test_date: never_tested(),
            average_days_between_tests: seed_interval(entry.rank),
            number_of_trials: 0,
            test_completed: false,
            user_notes: String::new(),
        }
    }

    /// Whole days since the last presentation
    pub fn days_since_last_test(&self, today: NaiveDate) -> i64 {
        algorithm::days_since(self.last_test_date, today)
    }

    pub fn is_never_tested(&self) -> bool {
        self.last_test_date == never_tested()
    }

    /// Stamp this record as part of the due-set for `today`
    pub fn present(&mut self, today: NaiveDate) {
        self.previous_test_date = self.last_test_date;
        self.last_test_date = today;
        self.test_completed = false;
    }

    /// Mark today's presentation as graded
    pub fn complete(&mut self, today: NaiveDate) {
        self.test_completed = true;
        self.last_test_date = today;
        self.number_of_trials += 1;
    }

    /// Mark as known well: double the interval
    pub fn widen(&mut self) {
        self.average_days_between_tests = algorithm::widen(self.average_days_between_tests);
    }

    /// Mark as needing practice: halve the interval
    pub fn narrow(&mut self) {
        self.average_days_between_tests = algorithm::narrow(self.average_days_between_tests);
    }
}

/// Grading payload: the caller's last known copy of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    /// Identity fields. Accepted only when they match the stored record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    pub last_test_date: NaiveDate,
    pub previous_test_date: NaiveDate,
    pub average_days_between_tests: f64,
    pub number_of_trials: u32,
    #[serde(default)]
    pub user_notes: String,
    pub test_completed: bool,
}

impl RecordUpdate {
    /// Build a full update from a locally modified record, omitting identity fields
    pub fn from_record(record: &TestRecord) -> Self {
        Self {
            word: None,
            rank: None,
            last_test_date: record.last_test_date,
            previous_test_date: record.previous_test_date,
            average_days_between_tests: record.average_days_between_tests,
            number_of_trials: record.number_of_trials,
            user_notes: record.user_notes.clone(),
            test_completed: record.test_completed,
        }
    }

    /// Copy the mutable fields onto `record`
    pub(crate) fn apply_to(&self, record: &mut TestRecord, clean_notes: String) {
        record.last_test_date = self.last_test_date;
        record.previous_test_date = self.previous_test_date;
        record.average_days_between_tests = clamp_interval(self.average_days_between_tests);
        record.number_of_trials = self.number_of_trials;
        record.user_notes = clean_notes;
        record.test_completed = self.test_completed;
    }
}

/// A catalog word paired with the user's record for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordWithRecord {
    pub entry: WordEntry,
    pub record: TestRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, rank: u32) -> WordEntry {
        WordEntry::new(word, rank)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-03-10").unwrap(), date("2026-03-10"));
        assert_eq!(parse_date(" 1947-04-01 ").unwrap(), never_tested());
        for bad in ["2026-13-01", "10/03/2026", "", "mañana"] {
            assert!(matches!(parse_date(bad), Err(RepasoError::InvalidDate(_))));
        }
    }

    #[test]
    fn test_new_record_seed() {
        let record = TestRecord::new(&entry("que", 1));
        assert_eq!(record.average_days_between_tests, 1.0);
        assert_eq!(record.last_test_date, never_tested());
        assert_eq!(record.previous_test_date, never_tested());
        assert_eq!(record.number_of_trials, 0);
        assert!(!record.test_completed);
        assert!(record.user_notes.is_empty());

        let record = TestRecord::new(&entry("casa", 250));
        assert_eq!(record.average_days_between_tests, 25.0);
    }

    #[test]
    fn test_present_rolls_dates() {
        let mut record = TestRecord::new(&entry("que", 1));
        record.test_completed = true;
        record.present(date("2026-03-10"));

        assert_eq!(record.previous_test_date, never_tested());
        assert_eq!(record.last_test_date, date("2026-03-10"));
        assert!(!record.test_completed);
    }

    #[test]
    fn test_complete_counts_trial() {
        let mut record = TestRecord::new(&entry("que", 1));
        record.complete(date("2026-03-10"));
        record.complete(date("2026-03-12"));

        assert!(record.test_completed);
        assert_eq!(record.number_of_trials, 2);
        assert_eq!(record.last_test_date, date("2026-03-12"));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = TestRecord::new(&entry("que", 1));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["lastTestDate"], "1947-04-01");
        assert_eq!(json["averageDaysBetweenTests"], 1.0);
        assert_eq!(json["testCompleted"], false);
    }

    #[test]
    fn test_update_from_record_omits_identity() {
        let mut record = TestRecord::new(&entry("que", 1));
        record.widen();
        let update = RecordUpdate::from_record(&record);

        assert!(update.word.is_none());
        assert!(update.rank.is_none());
        assert_eq!(update.average_days_between_tests, 2.0);
    }
}

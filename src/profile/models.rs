//! Learner profile models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::never_tested;

pub const DEFAULT_TESTS_PER_DAY: i32 = 20;

/// Bounds accepted when a learner edits their daily quota
pub const MIN_TESTS_PER_DAY: i32 = 5;
pub const MAX_TESTS_PER_DAY: i32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_name: Option<String>,
    /// Maximum number of words presented per day
    #[serde(default = "default_tests_per_day")]
    pub tests_per_day: i32,
    /// Last day a due-set was materialized
    pub last_test_date: NaiveDate,
    pub first_visit_date: NaiveDate,
    pub last_visit_date: NaiveDate,
}

fn default_tests_per_day() -> i32 {
    DEFAULT_TESTS_PER_DAY
}

impl UserProfile {
    pub fn new(user_id: &str, tests_per_day: i32, today: NaiveDate) -> Self {
        Self {
            user_id: user_id.trim().to_string(),
            preferred_name: None,
            tests_per_day,
            last_test_date: never_tested(),
            first_visit_date: today,
            last_visit_date: today,
        }
    }
}

/// Editable profile fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub preferred_name: Option<String>,
    pub tests_per_day: Option<i32>,
}

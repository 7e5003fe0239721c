//! Learner profiles: daily quota and last test date

pub mod models;
mod storage;

pub use models::*;
pub use storage::{MemoryProfileStore, ProfileStorage};

use chrono::NaiveDate;

use crate::error::Result;

/// Profile collaborator of the scheduling engine
pub trait UserProfileService: Send + Sync {
    /// Daily quota of words for a user
    fn tests_per_day(&self, user_id: &str) -> Result<i32>;

    /// Note that a due-set was materialized for `date`
    fn record_test_date(&self, user_id: &str, date: NaiveDate) -> Result<()>;
}

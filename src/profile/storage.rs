//! Profile storage implementations

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;

use super::models::*;
use super::UserProfileService;
use crate::error::{RepasoError, Result};
use crate::sanitize::strip_markup;

fn check_user_id(user_id: &str) -> Result<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(RepasoError::Validation("User id is empty".to_string()));
    }
    Ok(trimmed)
}

fn apply_update(profile: &mut UserProfile, update: ProfileUpdate) -> Result<()> {
    if let Some(tests_per_day) = update.tests_per_day {
        if !(MIN_TESTS_PER_DAY..=MAX_TESTS_PER_DAY).contains(&tests_per_day) {
            return Err(RepasoError::Validation(format!(
                "Tests per day must be between {} and {}",
                MIN_TESTS_PER_DAY, MAX_TESTS_PER_DAY
            )));
        }
        profile.tests_per_day = tests_per_day;
    }
    if let Some(name) = update.preferred_name {
        let name = strip_markup(name.trim());
        profile.preferred_name = if name.is_empty() { None } else { Some(name) };
    }
    Ok(())
}

/// Profiles persisted to `profiles/profiles.json`
pub struct ProfileStorage {
    profiles_dir: PathBuf,
    default_tests_per_day: i32,
    lock: Mutex<()>,
}

impl ProfileStorage {
    pub fn new(data_dir: PathBuf, default_tests_per_day: i32) -> Result<Self> {
        let profiles_dir = data_dir.join("profiles");
        fs::create_dir_all(&profiles_dir)?;

        Ok(Self {
            profiles_dir,
            default_tests_per_day,
            lock: Mutex::new(()),
        })
    }

    fn profiles_file(&self) -> PathBuf {
        self.profiles_dir.join("profiles.json")
    }

    fn list_profiles(&self) -> Result<Vec<UserProfile>> {
        let path = self.profiles_file();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        let profiles: Vec<UserProfile> = serde_json::from_str(&content)?;
        Ok(profiles)
    }

    fn save_profiles(&self, profiles: &[UserProfile]) -> Result<()> {
        let json = serde_json::to_string_pretty(profiles)?;

        // Written next to the target, then renamed over it
        let path = self.profiles_file();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Load, change and save one profile, creating it first if missing
    fn modify<T>(
        &self,
        user_id: &str,
        today: NaiveDate,
        f: impl FnOnce(&mut UserProfile) -> Result<T>,
    ) -> Result<T> {
        let user_id = check_user_id(user_id)?;
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut profiles = self.list_profiles()?;

        let index = match profiles.iter().position(|p| p.user_id == user_id) {
            Some(index) => index,
            None => {
                log::info!("Creating profile for {}", user_id);
                profiles.push(UserProfile::new(user_id, self.default_tests_per_day, today));
                profiles.len() - 1
            }
        };

        let result = f(&mut profiles[index])?;
        self.save_profiles(&profiles)?;
        Ok(result)
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let user_id = check_user_id(user_id)?;
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self
            .list_profiles()?
            .into_iter()
            .find(|p| p.user_id == user_id))
    }

    /// Fetch a profile, creating it on first visit and stamping the visit date
    pub fn visit(&self, user_id: &str, today: NaiveDate) -> Result<UserProfile> {
        self.modify(user_id, today, |profile| {
            profile.last_visit_date = today;
            Ok(profile.clone())
        })
    }

    pub fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        today: NaiveDate,
    ) -> Result<UserProfile> {
        self.modify(user_id, today, |profile| {
            apply_update(profile, update)?;
            Ok(profile.clone())
        })
    }
}

impl UserProfileService for ProfileStorage {
    fn tests_per_day(&self, user_id: &str) -> Result<i32> {
        Ok(self
            .get_profile(user_id)?
            .map(|p| p.tests_per_day)
            .unwrap_or(self.default_tests_per_day))
    }

    fn record_test_date(&self, user_id: &str, date: NaiveDate) -> Result<()> {
        self.modify(user_id, date, |profile| {
            profile.last_test_date = date;
            Ok(())
        })
    }
}

/// Profiles held in process memory
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<String, UserProfile>>,
    default_tests_per_day: i32,
}

impl MemoryProfileStore {
    pub fn new(default_tests_per_day: i32) -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
            default_tests_per_day,
        }
    }

    pub fn get_profile(&self, user_id: &str) -> Option<UserProfile> {
        let profiles = self.profiles.lock().unwrap_or_else(|e| e.into_inner());
        profiles.get(user_id.trim()).cloned()
    }

    pub fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        today: NaiveDate,
    ) -> Result<UserProfile> {
        let user_id = check_user_id(user_id)?;
        let mut profiles = self.profiles.lock().unwrap_or_else(|e| e.into_inner());
        let profile = profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::new(user_id, self.default_tests_per_day, today));
        apply_update(profile, update)?;
        Ok(profile.clone())
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new(DEFAULT_TESTS_PER_DAY)
    }
}

impl UserProfileService for MemoryProfileStore {
    fn tests_per_day(&self, user_id: &str) -> Result<i32> {
        Ok(self
            .get_profile(user_id)
            .map(|p| p.tests_per_day)
            .unwrap_or(self.default_tests_per_day))
    }

    fn record_test_date(&self, user_id: &str, date: NaiveDate) -> Result<()> {
        let user_id = check_user_id(user_id)?;
        let mut profiles = self.profiles.lock().unwrap_or_else(|e| e.into_inner());
        profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::new(user_id, self.default_tests_per_day, date))
            .last_test_date = date;
        Ok(())
    }
}

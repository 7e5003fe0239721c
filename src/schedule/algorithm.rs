//! Interval arithmetic for vocabulary tests
//!
//! Each record carries an "average days between tests" interval. A word is
//! due when the days elapsed since its last presentation reach the interval,
//! scaled by a jitter factor drawn once per due-set materialization.
//!
//! Adjustments:
//! - widen: the word is known well, double the interval
//! - narrow: the word needs practice, halve the interval
//!
//! Both round up to two decimals and stay within [1, 1000] days.

use chrono::NaiveDate;
use rand::Rng;

/// Shortest interval allowed, in days
pub const MIN_INTERVAL: f64 = 1.0;

/// Longest interval allowed, in days
pub const MAX_INTERVAL: f64 = 1000.0;

/// Bounds of the per-run jitter factor
pub const MIN_JITTER: f64 = -0.10;
pub const MAX_JITTER: f64 = 0.10;

/// Interval assigned to a new record: a tenth of the word's rank
pub fn seed_interval(rank: u32) -> f64 {
    clamp_interval(rank as f64 * 0.1)
}

pub fn clamp_interval(days: f64) -> f64 {
    if days.is_nan() {
        return MIN_INTERVAL;
    }
    days.clamp(MIN_INTERVAL, MAX_INTERVAL)
}

/// Round up to two decimal digits
fn ceil_hundredths(value: f64) -> f64 {
    (value * 100.0).ceil() / 100.0
}

/// Double the interval
pub fn widen(days: f64) -> f64 {
    ceil_hundredths(days * 2.0).min(MAX_INTERVAL)
}

/// Halve the interval
pub fn narrow(days: f64) -> f64 {
    ceil_hundredths(days / 2.0).max(MIN_INTERVAL)
}

/// Whole calendar days from `last` to `today`
pub fn days_since(last: NaiveDate, today: NaiveDate) -> i64 {
    today.signed_duration_since(last).num_days()
}

/// Days that must elapse before a record with `interval` is due again
pub fn due_threshold(interval: f64, jitter: f64) -> f64 {
    interval * (1.0 + jitter)
}

/// Check whether a word last presented on `last` is due on `today`
pub fn is_due(last: NaiveDate, interval: f64, today: NaiveDate, jitter: f64) -> bool {
    days_since(last, today) as f64 >= due_threshold(interval, jitter)
}

/// Source of the jitter factor drawn once per materialization
pub trait JitterSource: Send + Sync {
    fn draw(&self) -> f64;
}

/// Uniform jitter in [MIN_JITTER, MAX_JITTER]
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen_range(MIN_JITTER..=MAX_JITTER)
    }
}

/// Always returns the same factor
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn draw(&self) -> f64 {
        self.0.clamp(MIN_JITTER, MAX_JITTER)
    }
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: f64) -> String {
    let days = days.floor() as i64;
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

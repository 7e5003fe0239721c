//! Spaced vocabulary test scheduling
//!
//! This module provides:
//! - Per-user test records with a rolling interval estimate
//! - Due-set selection with a shared jitter per run
//! - Interval widening/narrowing and grading

pub mod algorithm;
mod engine;
pub mod models;

pub use algorithm::{FixedJitter, JitterSource, RandomJitter};
pub use engine::{sort_due, ScheduleEngine};
pub use models::*;

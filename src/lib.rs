#![forbid(unsafe_code)]

//! Core domain model and cycle-analysis logic for the halsa health log.
//!
//! This crate provides:
//! - Domain types (daily logs, period records, user profiles)
//! - Cycle analysis: statistics, regularity, next-period prediction,
//!   calendar projection and delay
//! - Period history extraction from daily logs
//! - Storage ports with an in-memory implementation
//!
//! The analyzer never fails: malformed input is skipped and missing history
//! degrades to sentinel values, so every entry point is total.

pub mod dashboard;
pub mod history;
pub mod logging;
pub mod models;
pub mod prediction;
pub mod store;

// Re-export commonly used items
pub use dashboard::{cycle_overview, cycle_overview_today};
pub use history::period_history;
pub use models::*;
pub use prediction::{
    analyze_cycle, period_delay, period_delay_today, predict_next_period, project_calendar,
    DEFAULT_CALENDAR_MONTHS, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_DURATION,
};
pub use store::{LogStore, MemoryStore, StoreError, UserStore};

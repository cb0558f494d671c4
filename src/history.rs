//! Period history extraction from a user's daily logs.
//!
//! The history is rebuilt from the full log table on every call; nothing
//! derived is persisted or cached.

use crate::models::{LogTable, PeriodRecord};

/// Collect every logged period start from a user's log table.
///
/// Keeps one record per day whose `period.start` is non-empty, carrying the
/// start text as entered (validation happens in the analyzer). The log table
/// is keyed by `YYYY-MM-DD`, so records come out in log-date order and the
/// last record is the most recently dated entry.
pub fn period_history(logs: &LogTable) -> Vec<PeriodRecord> {
    let records: Vec<PeriodRecord> = logs
        .iter()
        .filter(|(_, log)| !log.period.start.is_empty())
        .map(|(date, log)| PeriodRecord {
            date: date.clone(),
            start: log.period.start.clone(),
        })
        .collect();

    tracing::debug!(
        days = logs.len(),
        records = records.len(),
        "collected period history"
    );
    records
}

//! Per-request assembly of the cycle view.
//!
//! Recomputes everything from the user's full log table on every call:
//! history, statistics, next-period prediction, projected calendar and
//! delay. There is no derived state to invalidate.

use chrono::{Local, NaiveDate};

use crate::history::period_history;
use crate::models::{CycleOverview, Gender, LogTable, User};
use crate::prediction::{
    analyze_cycle, period_delay, predict_next_period, project_calendar, DEFAULT_CALENDAR_MONTHS,
};

/// Build the cycle overview for a user's dashboard.
///
/// Returns `None` for profiles that do not track cycles; parents viewing a
/// dependent's dashboard pass the dependent's profile and logs and get the
/// same read-only view.
pub fn cycle_overview(user: &User, logs: &LogTable, today: NaiveDate) -> Option<CycleOverview> {
    if user.gender != Gender::Female {
        return None;
    }

    let history = period_history(logs);
    let analysis = analyze_cycle(&history);
    let next_period = predict_next_period(&history, analysis.cycle_length);
    let calendar = project_calendar(
        &history,
        analysis.cycle_length,
        analysis.period_duration,
        DEFAULT_CALENDAR_MONTHS,
    );
    let delay_days = period_delay(&next_period, today);

    Some(CycleOverview {
        analysis,
        next_period,
        calendar,
        delay_days,
    })
}

/// [`cycle_overview`] against the local calendar date.
pub fn cycle_overview_today(user: &User, logs: &LogTable) -> Option<CycleOverview> {
    cycle_overview(user, logs, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyLog, Estimate, Prediction, Regularity};
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn user_with(gender: Gender) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "a@example.com".into(),
            gender,
            age: 16,
            parent_name: "Mina".into(),
            parent_email: "p@example.com".into(),
            created_at: NaiveDateTime::parse_from_str("2024-01-01 09:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    fn logs_with_starts(starts: &[&str]) -> LogTable {
        starts
            .iter()
            .map(|start| {
                let mut log = DailyLog::new();
                log.period.start = start.to_string();
                (start.to_string(), log)
            })
            .collect()
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn no_overview_for_non_tracking_profiles() {
        let logs = logs_with_starts(&["2024-01-01", "2024-01-29"]);
        assert!(cycle_overview(&user_with(Gender::Male), &logs, ymd(2024, 2, 1)).is_none());
        assert!(cycle_overview(&user_with(Gender::Other), &logs, ymd(2024, 2, 1)).is_none());
    }

    #[test]
    fn overview_assembles_all_parts() {
        let logs = logs_with_starts(&["2024-01-01", "2024-01-29", "2024-02-26"]);
        let overview =
            cycle_overview(&user_with(Gender::Female), &logs, ymd(2024, 3, 30)).unwrap();

        assert_eq!(overview.analysis.cycle_length, 28);
        assert_eq!(overview.analysis.cycle_regularity, Regularity::VeryRegular);
        // Prediction from the last history record: Feb 26 + 28 = Mar 25.
        assert_eq!(overview.next_period, Prediction::Date(ymd(2024, 3, 25)));
        // 6 projected cycles of 5 days each.
        assert_eq!(overview.calendar.len(), 30);
        assert_eq!(overview.calendar[0].date, ymd(2024, 3, 25));
        // Mar 30 is 5 days past the predicted start.
        assert_eq!(overview.delay_days, Some(5));
    }

    #[test]
    fn overview_with_empty_logs_degrades_to_sentinels() {
        let overview =
            cycle_overview(&user_with(Gender::Female), &LogTable::new(), ymd(2024, 1, 1)).unwrap();

        assert_eq!(overview.analysis.cycle_length, 28);
        assert_eq!(
            overview.analysis.cycle_regularity,
            Regularity::InsufficientData
        );
        assert_eq!(overview.analysis.next_ovulation, Estimate::NeedMoreData);
        assert_eq!(overview.analysis.last_period_label(), "No data");
        assert_eq!(overview.next_period, Prediction::NeedMoreData);
        assert!(overview.calendar.is_empty());
        assert_eq!(overview.delay_days, None);
    }
}

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::models::{
    CalendarEntry, CycleAnalysis, Estimate, FertileWindow, PeriodRecord, Prediction, Regularity,
    DATE_FMT,
};

/// Assumed cycle length until two valid starts have been logged.
pub const DEFAULT_CYCLE_LENGTH: i64 = 28;

/// Period duration in days. Fixed: never derived from logged data.
pub const DEFAULT_PERIOD_DURATION: i64 = 5;

/// How many future cycles the calendar projects.
pub const DEFAULT_CALENDAR_MONTHS: u32 = 6;

/// Days from ovulation back to the next period start.
const LUTEAL_PHASE_DAYS: i64 = 14;

/// Parse the raw start strings, dropping anything that is not `YYYY-MM-DD`.
/// Positions of the surviving dates follow the input order.
fn parse_starts(history: &[PeriodRecord]) -> Vec<NaiveDate> {
    history
        .iter()
        .filter_map(|record| match NaiveDate::parse_from_str(&record.start, DATE_FMT) {
            Ok(date) => Some(date),
            Err(err) => {
                tracing::debug!(start = %record.start, %err, "skipping unparseable period start");
                None
            }
        })
        .collect()
}

fn insufficient_data(history: &[PeriodRecord]) -> CycleAnalysis {
    CycleAnalysis {
        cycle_length: DEFAULT_CYCLE_LENGTH,
        period_duration: DEFAULT_PERIOD_DURATION,
        cycle_regularity: Regularity::InsufficientData,
        next_ovulation: Estimate::NeedMoreData,
        fertile_window: Estimate::NeedMoreData,
        // The first raw record, not the most recent, and not validated.
        last_period_start: history.first().map(|record| record.start.clone()),
    }
}

/// Compute cycle statistics and predictions from a user's period history.
///
/// Total over any input: malformed starts are skipped, and fewer than two
/// valid dates yields the insufficient-data result rather than an error.
pub fn analyze_cycle(history: &[PeriodRecord]) -> CycleAnalysis {
    if history.len() < 2 {
        return insufficient_data(history);
    }

    let mut dates = parse_starts(history);
    if dates.len() < 2 {
        return insufficient_data(history);
    }
    dates.sort();

    let gaps: Vec<i64> = dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .collect();

    let cycle_length = gaps.iter().sum::<i64>() / gaps.len() as i64;

    // Spread of gap lengths, not statistical variance.
    let spread = gaps.iter().max().unwrap() - gaps.iter().min().unwrap();
    let cycle_regularity = if spread <= 3 {
        Regularity::VeryRegular
    } else if spread <= 7 {
        Regularity::Regular
    } else if spread <= 10 {
        Regularity::SlightlyIrregular
    } else {
        Regularity::Irregular
    };

    let last_period = *dates.last().unwrap();
    let next_period = last_period + Duration::days(cycle_length);
    let ovulation = next_period - Duration::days(LUTEAL_PHASE_DAYS);
    let fertile_window = FertileWindow {
        start: ovulation - Duration::days(3),
        end: ovulation + Duration::days(1),
    };

    CycleAnalysis {
        cycle_length,
        period_duration: DEFAULT_PERIOD_DURATION,
        cycle_regularity,
        next_ovulation: Estimate::Known(ovulation),
        fertile_window: Estimate::Known(fertile_window),
        last_period_start: Some(last_period.format(DATE_FMT).to_string()),
    }
}

/// Predict the next period start from the last record of `history`.
///
/// Takes the history in caller-supplied order and does not re-sort it;
/// `analyze_cycle` sorts, this deliberately does not.
pub fn predict_next_period(history: &[PeriodRecord], cycle_length: i64) -> Prediction {
    let Some(last) = history.last() else {
        return Prediction::NeedMoreData;
    };

    match NaiveDate::parse_from_str(&last.start, DATE_FMT) {
        Ok(date) => Prediction::Date(date + Duration::days(cycle_length)),
        Err(err) => {
            tracing::debug!(start = %last.start, %err, "last period start unparseable");
            Prediction::NeedMoreData
        }
    }
}

/// Project period days for the next `months` cycles, for calendar display.
///
/// The reference start is the last parseable record in caller-supplied
/// order. Each projected cycle contributes `period_duration` consecutive
/// days, so the result holds `months * period_duration` entries.
pub fn project_calendar(
    history: &[PeriodRecord],
    cycle_length: i64,
    period_duration: i64,
    months: u32,
) -> Vec<CalendarEntry> {
    let dates = parse_starts(history);
    let Some(&reference) = dates.last() else {
        return Vec::new();
    };

    let mut entries = Vec::with_capacity(months as usize * period_duration.max(0) as usize);
    for cycle in 1..=months {
        let period_start = reference + Duration::days(cycle_length * cycle as i64);
        for day in 0..period_duration {
            let date = period_start + Duration::days(day);
            entries.push(CalendarEntry {
                date,
                month: date.month(),
                year: date.year(),
                cycle_number: cycle,
            });
        }
    }
    entries
}

/// Whole days the period is overdue relative to `today`, or `None` when the
/// prediction is unavailable or the predicted date has not passed yet.
pub fn period_delay(prediction: &Prediction, today: NaiveDate) -> Option<i64> {
    let predicted = prediction.date()?;
    if today > predicted {
        Some((today - predicted).num_days())
    } else {
        None
    }
}

/// [`period_delay`] against the local calendar date.
pub fn period_delay_today(prediction: &Prediction) -> Option<i64> {
    period_delay(prediction, Local::now().date_naive())
}

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Date format used for log keys and user-entered period dates.
pub const DATE_FMT: &str = "%Y-%m-%d";

/// Daily water goal in millilitres.
pub const WATER_GOAL_ML: u32 = 4000;

/// A user's daily logs, keyed by `YYYY-MM-DD` date string.
pub type LogTable = BTreeMap<String, DailyLog>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub age: u32,
    pub parent_name: String,
    pub parent_email: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Meals {
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
    pub dinner_snacks: String,
}

/// User-entered period sub-record. `start` is kept as raw text: it may be
/// empty or malformed, and the analyzer skips it rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeriodEntry {
    pub start: String,
    pub end: String,
    pub notes: String,
}

/// `HH:MM` timestamps of the last edit per field; empty means never edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateTimes {
    pub breakfast: String,
    pub lunch: String,
    pub evening: String,
    pub dinner: String,
    pub water: String,
    pub sleep: String,
    pub tasks: String,
    pub period: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyLog {
    pub meals: Meals,
    pub water_ml: u32,
    pub sleep_hours: f32,
    pub tasks: String,
    pub period: PeriodEntry,
    pub last_updated: UpdateTimes,
}

impl DailyLog {
    /// Fresh log for a new day, all fields blank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Water intake as a percentage of the daily goal, capped at 100.
    pub fn water_percentage(&self) -> f32 {
        (self.water_ml as f32 / WATER_GOAL_ML as f32 * 100.0).min(100.0)
    }

    /// Apply a partial update, stamping the matching `last_updated` field
    /// with `now` formatted as `HH:MM`.
    pub fn apply(&mut self, update: &LogUpdate, now: NaiveTime) {
        let stamp = now.format("%H:%M").to_string();

        if let Some(ref v) = update.meal_morning {
            self.meals.morning = v.clone();
            self.last_updated.breakfast = stamp.clone();
        }
        if let Some(ref v) = update.meal_afternoon {
            self.meals.afternoon = v.clone();
            self.last_updated.lunch = stamp.clone();
        }
        if let Some(ref v) = update.meal_evening {
            self.meals.evening = v.clone();
            self.last_updated.evening = stamp.clone();
        }
        if let Some(ref v) = update.meal_dinner_snacks {
            self.meals.dinner_snacks = v.clone();
            self.last_updated.dinner = stamp.clone();
        }
        if let Some(v) = update.water_ml {
            self.water_ml = v;
            self.last_updated.water = stamp.clone();
        }
        if let Some(v) = update.sleep_hours {
            self.sleep_hours = v;
            self.last_updated.sleep = stamp.clone();
        }
        if let Some(ref v) = update.tasks {
            self.tasks = v.clone();
            self.last_updated.tasks = stamp.clone();
        }
        if let Some(ref p) = update.period {
            if let Some(ref v) = p.start {
                self.period.start = v.clone();
            }
            if let Some(ref v) = p.end {
                self.period.end = v.clone();
            }
            if let Some(ref v) = p.notes {
                self.period.notes = v.clone();
            }
            self.last_updated.period = stamp;
        }
    }
}

/// Partial update to a day's log; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogUpdate {
    pub meal_morning: Option<String>,
    pub meal_afternoon: Option<String>,
    pub meal_evening: Option<String>,
    pub meal_dinner_snacks: Option<String>,
    pub water_ml: Option<u32>,
    pub sleep_hours: Option<f32>,
    pub tasks: Option<String>,
    pub period: Option<PeriodUpdate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodUpdate {
    pub start: Option<String>,
    pub end: Option<String>,
    pub notes: Option<String>,
}

/// One observed period start: the log date it was entered under, and the raw
/// user-entered start date string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodRecord {
    pub date: String,
    pub start: String,
}

/// Cycle regularity bucket, derived from the spread of gap lengths.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Regularity {
    #[serde(rename = "Very Regular")]
    VeryRegular,
    #[serde(rename = "Regular")]
    Regular,
    #[serde(rename = "Slightly Irregular")]
    SlightlyIrregular,
    #[serde(rename = "Irregular")]
    Irregular,
    #[serde(rename = "Insufficient data")]
    InsufficientData,
}

impl fmt::Display for Regularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Regularity::VeryRegular => "Very Regular",
            Regularity::Regular => "Regular",
            Regularity::SlightlyIrregular => "Slightly Irregular",
            Regularity::Irregular => "Irregular",
            Regularity::InsufficientData => "Insufficient data",
        };
        f.write_str(label)
    }
}

/// A value the analyzer could only estimate with enough history. Renders as
/// `"Need more data"` when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimate<T> {
    Known(T),
    NeedMoreData,
}

impl<T> Estimate<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Estimate::Known(value) => Some(value),
            Estimate::NeedMoreData => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Estimate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Known(value) => value.fmt(f),
            Estimate::NeedMoreData => f.write_str("Need more data"),
        }
    }
}

impl<T: Serialize> Serialize for Estimate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Estimate::Known(value) => value.serialize(serializer),
            Estimate::NeedMoreData => serializer.serialize_str("Need more data"),
        }
    }
}

/// Estimated fertile range, anchored to the ovulation date. Renders as
/// `"<start> to <end>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FertileWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for FertileWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FMT),
            self.end.format(DATE_FMT)
        )
    }
}

impl Serialize for FertileWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Next-period prediction. Renders as `YYYY-MM-DD`, or the sentinel
/// `"Need more data for prediction"` for an empty history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Date(NaiveDate),
    NeedMoreData,
}

impl Prediction {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Prediction::Date(date) => Some(*date),
            Prediction::NeedMoreData => None,
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Date(date) => write!(f, "{}", date.format(DATE_FMT)),
            Prediction::NeedMoreData => f.write_str("Need more data for prediction"),
        }
    }
}

impl Serialize for Prediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Derived cycle statistics; ephemeral, recomputed from the full history on
/// every call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CycleAnalysis {
    pub cycle_length: i64,
    pub period_duration: i64,
    pub cycle_regularity: Regularity,
    pub next_ovulation: Estimate<NaiveDate>,
    pub fertile_window: Estimate<FertileWindow>,
    /// Most recent period start as entered, or `None` for an empty history.
    /// In the insufficient-data case this carries the first raw record's
    /// start string, unvalidated.
    #[serde(serialize_with = "ser_last_period_start")]
    pub last_period_start: Option<String>,
}

impl CycleAnalysis {
    /// Display text for the last period start; `"No data"` when absent.
    pub fn last_period_label(&self) -> &str {
        self.last_period_start.as_deref().unwrap_or("No data")
    }
}

fn ser_last_period_start<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or("No data"))
}

/// One projected period day in the multi-month calendar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub month: u32,
    pub year: i32,
    /// 1-based index of the future cycle this day belongs to.
    pub cycle_number: u32,
}

/// Everything the daily view needs about a user's cycle, assembled per
/// request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CycleOverview {
    pub analysis: CycleAnalysis,
    pub next_period: Prediction,
    pub calendar: Vec<CalendarEntry>,
    /// Whole days the period is overdue; `None` when not late or unknown.
    pub delay_days: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_percentage_caps_at_goal() {
        let mut log = DailyLog::new();
        log.water_ml = 1000;
        assert_eq!(log.water_percentage(), 25.0);

        log.water_ml = 5000;
        assert_eq!(log.water_percentage(), 100.0);
    }

    #[test]
    fn apply_updates_only_given_fields() {
        let mut log = DailyLog::new();
        log.meals.morning = "toast".into();

        let update = LogUpdate {
            water_ml: Some(750),
            period: Some(PeriodUpdate {
                start: Some("2024-03-01".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let noon = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
        log.apply(&update, noon);

        assert_eq!(log.meals.morning, "toast");
        assert_eq!(log.water_ml, 750);
        assert_eq!(log.period.start, "2024-03-01");
        assert_eq!(log.period.end, "");
        assert_eq!(log.last_updated.water, "12:30");
        assert_eq!(log.last_updated.period, "12:30");
        assert_eq!(log.last_updated.breakfast, "");
    }

    #[test]
    fn sentinels_render_legacy_strings() {
        let estimate: Estimate<NaiveDate> = Estimate::NeedMoreData;
        assert_eq!(estimate.to_string(), "Need more data");
        assert_eq!(
            Prediction::NeedMoreData.to_string(),
            "Need more data for prediction"
        );

        let window = FertileWindow {
            start: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
        };
        assert_eq!(window.to_string(), "2024-03-08 to 2024-03-12");
    }

    #[test]
    fn analysis_serializes_with_sentinel_strings() {
        let analysis = CycleAnalysis {
            cycle_length: 28,
            period_duration: 5,
            cycle_regularity: Regularity::InsufficientData,
            next_ovulation: Estimate::NeedMoreData,
            fertile_window: Estimate::NeedMoreData,
            last_period_start: None,
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["cycle_regularity"], "Insufficient data");
        assert_eq!(json["next_ovulation"], "Need more data");
        assert_eq!(json["fertile_window"], "Need more data");
        assert_eq!(json["last_period_start"], "No data");
    }
}

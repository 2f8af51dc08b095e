use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::WorkRecord;

/// Job counts for one Sunday-started week, split by the month each job fell in
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WeeklyJobData {
    /// `"Semana MM/dd"` of the week's Sunday
    pub week: String,
    #[serde(skip)]
    pub week_start: Option<NaiveDate>,
    /// Job count keyed by `MM/yy`
    #[serde(flatten)]
    pub months: BTreeMap<String, u32>,
}

impl WeeklyJobData {
    pub fn total(&self) -> u32 {
        self.months.values().sum()
    }
}

/// First day (Sunday) of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Bucket work records into Sunday-started weeks.
///
/// A week that straddles two months gets one count per month key. Records
/// whose date cannot be rebuilt from `dia` and `pagto` are left out.
pub fn by_week(records: &[WorkRecord]) -> Vec<WeeklyJobData> {
    let mut weeks: BTreeMap<NaiveDate, BTreeMap<String, u32>> = BTreeMap::new();

    for record in records {
        let Some(date) = record.date() else {
            log::debug!(
                "skipping job with unusable date: dia={:?} pagto={:?}",
                record.day,
                record.payment_period
            );
            continue;
        };
        let month_key = date.format("%m/%y").to_string();
        *weeks
            .entry(week_start(date))
            .or_default()
            .entry(month_key)
            .or_default() += 1;
    }

    weeks
        .into_iter()
        .map(|(start, months)| WeeklyJobData {
            week: format!("Semana {}", start.format("%m/%d")),
            week_start: Some(start),
            months,
        })
        .collect()
}

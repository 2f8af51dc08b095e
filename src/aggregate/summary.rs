use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::model::WorkRecord;

/// Headline numbers for the dashboard summary cards
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryKpis {
    #[serde(rename = "totalFainas")]
    pub total_jobs: u32,
    #[serde(rename = "mediaFainasSemana")]
    pub average_jobs_per_week: f64,
    /// Distinct `(dia, mes, ano)` days with at least one job
    #[serde(rename = "diasTrabalhados")]
    pub worked_days: u32,
    /// Distinct worked days that were Sundays or holidays
    #[serde(rename = "domFerTrabalhados")]
    pub sundays_holidays_worked: u32,
    #[serde(rename = "mediaBrutoFaina")]
    pub average_gross_per_job: f64,
    #[serde(rename = "mediaLiquidoFaina")]
    pub average_net_per_job: f64,
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// The `(month, year)` holding the most jobs; ties go to the earliest month.
pub fn dominant_period(records: &[WorkRecord]) -> Option<(u32, i32)> {
    let mut counts: HashMap<(u32, i32), u32> = HashMap::new();
    for period in records.iter().filter_map(WorkRecord::period) {
        *counts.entry(period).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| (b.1, b.0).cmp(&(a.1, a.0))))
        .map(|(period, _)| period)
}

/// Weeks used for the jobs-per-week average: `ceil(days / 7)` of the dominant month
fn weeks_in_dominant_month(records: &[WorkRecord]) -> u32 {
    dominant_period(records)
        .and_then(|(month, year)| days_in_month(year, month))
        .map(|days| days.div_ceil(7))
        .unwrap_or(1)
        .max(1)
}

pub fn summary_kpis(records: &[WorkRecord]) -> SummaryKpis {
    if records.is_empty() {
        return SummaryKpis::default();
    }

    let total_jobs = records.len() as u32;

    let mut worked_days: HashSet<(u32, u32, i32)> = HashSet::new();
    let mut special_days: HashSet<(u32, u32, i32)> = HashSet::new();
    for record in records {
        let (Some(day), Some((month, year))) = (record.day_of_month(), record.period()) else {
            continue;
        };
        let key = (day, month, year);
        let on_sunday = record.date().is_some_and(|d| d.weekday() == Weekday::Sun);
        if record.sunday || record.holiday || on_sunday {
            special_days.insert(key);
        }
        worked_days.insert(key);
    }

    let weeks = weeks_in_dominant_month(records);
    let gross: f64 = records.iter().map(|r| r.values.gross).sum();
    let net: f64 = records.iter().map(|r| r.values.net).sum();

    SummaryKpis {
        total_jobs,
        average_jobs_per_week: total_jobs as f64 / weeks as f64,
        worked_days: worked_days.len() as u32,
        sundays_holidays_worked: special_days.len() as u32,
        average_gross_per_job: gross / total_jobs as f64,
        average_net_per_job: net / total_jobs as f64,
    }
}

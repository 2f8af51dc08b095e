use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::aggregate::{days_in_month, week_start};
use crate::model::{DashboardFilters, Month};

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// `dd/MM/yy - dd/MM/yy`
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.from.format("%d/%m/%y"),
            self.to.format("%d/%m/%y")
        )
    }

    /// Analytics filters for this range; month and year come from `from`.
    pub fn to_filters(&self) -> DashboardFilters {
        DashboardFilters {
            month: Month::from_number(self.from.month()).map(|m| m.code().to_string()),
            year: Some(self.from.year().to_string()),
            date_start: Some(self.from.format("%Y-%m-%d").to_string()),
            date_end: Some(self.to.format("%Y-%m-%d").to_string()),
            category: None,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    days_in_month(date.year(), date.month())
        .and_then(|days| date.with_day(days))
        .unwrap_or(date)
}

fn months_back(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(n)).unwrap_or(date)
}

fn week_of(date: NaiveDate) -> DateRange {
    let from = week_start(date);
    DateRange {
        from,
        to: from + Duration::days(6),
    }
}

fn month_of(date: NaiveDate) -> DateRange {
    DateRange {
        from: start_of_month(date),
        to: end_of_month(date),
    }
}

/// Named date ranges offered by the period selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    ThisMonth,
    ThisWeek,
    LastWeek,
    LastMonth,
    Last30Days,
    Last3Months,
    Last6Months,
    Last12Months,
}

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::ThisMonth,
        Preset::ThisWeek,
        Preset::LastWeek,
        Preset::LastMonth,
        Preset::Last30Days,
        Preset::Last3Months,
        Preset::Last6Months,
        Preset::Last12Months,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Preset::ThisMonth => "this-month",
            Preset::ThisWeek => "this-week",
            Preset::LastWeek => "last-week",
            Preset::LastMonth => "last-month",
            Preset::Last30Days => "last-30-days",
            Preset::Last3Months => "last-3-months",
            Preset::Last6Months => "last-6-months",
            Preset::Last12Months => "last-12-months",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::ThisMonth => "Este mês",
            Preset::ThisWeek => "Esta semana",
            Preset::LastWeek => "Semana passada",
            Preset::LastMonth => "Mês passado",
            Preset::Last30Days => "Últimos 30 dias",
            Preset::Last3Months => "Últimos 3 meses",
            Preset::Last6Months => "Últimos 6 meses",
            Preset::Last12Months => "Últimos 12 meses",
        }
    }

    /// Range relative to `today`. Weeks start on Sunday.
    pub fn range(self, today: NaiveDate) -> DateRange {
        match self {
            Preset::ThisMonth => month_of(today),
            Preset::ThisWeek => week_of(today),
            Preset::LastWeek => week_of(today - Duration::weeks(1)),
            Preset::LastMonth => month_of(months_back(today, 1)),
            Preset::Last30Days => DateRange {
                from: today - Duration::days(29),
                to: today,
            },
            Preset::Last3Months => DateRange {
                from: start_of_month(months_back(today, 2)),
                to: end_of_month(today),
            },
            Preset::Last6Months => DateRange {
                from: start_of_month(months_back(today, 5)),
                to: end_of_month(today),
            },
            Preset::Last12Months => DateRange {
                from: start_of_month(months_back(today, 11)),
                to: end_of_month(today),
            },
        }
    }

    pub fn range_from_now(self) -> DateRange {
        self.range(chrono::Local::now().date_naive())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.slug() == s.trim())
            .ok_or_else(|| {
                let valid: Vec<_> = Preset::ALL.iter().map(|p| p.slug()).collect();
                format!("unknown preset '{s}' (expected one of: {})", valid.join(", "))
            })
    }
}

use serde::Serialize;

use crate::model::{period_key, StatementSummary};

/// A `(mes, ano)` pair present in a statement list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PeriodOption {
    #[serde(rename = "mes")]
    pub month: String,
    #[serde(rename = "ano")]
    pub year: String,
    pub label: String,
}

/// Distinct statement periods, ordered by year then calendar month.
pub fn distinct_periods(summaries: &[StatementSummary]) -> Vec<PeriodOption> {
    let mut periods: Vec<PeriodOption> = Vec::new();

    for s in summaries {
        if !periods
            .iter()
            .any(|p| p.month == s.month && p.year == s.year)
        {
            periods.push(PeriodOption {
                month: s.month.clone(),
                year: s.year.clone(),
                label: format!("{}/{}", s.month, s.year),
            });
        }
    }

    periods.sort_by_key(|p| period_key(&p.month, &p.year));
    periods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(month: &str, year: &str) -> StatementSummary {
        StatementSummary {
            id: format!("{month}/{year}"),
            registration: "1".into(),
            name: "W".into(),
            month: month.into(),
            year: year.into(),
            category: "VIGIA".into(),
            job_count: 1,
            total_value: 1.0,
        }
    }

    #[test]
    fn dedups_and_orders_by_calendar() {
        let input = vec![
            summary("ABR", "2024"),
            summary("JAN", "2024"),
            summary("MAR", "2024"),
            summary("FEV", "2024"),
            summary("JAN", "2024"),
            summary("DEZ", "2023"),
        ];
        let labels: Vec<_> = distinct_periods(&input)
            .into_iter()
            .map(|p| p.label)
            .collect();
        assert_eq!(
            labels,
            vec!["DEZ/2023", "JAN/2024", "FEV/2024", "MAR/2024", "ABR/2024"]
        );
    }

    #[test]
    fn empty_input() {
        assert!(distinct_periods(&[]).is_empty());
    }
}

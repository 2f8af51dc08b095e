use serde::Serialize;

use crate::model::{period_key, StatementSummary};

/// Jobs and value for one statement month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyJobs {
    /// `"{mes}/{ano}"`
    pub name: String,
    #[serde(skip)]
    pub month: String,
    #[serde(skip)]
    pub year: String,
    #[serde(rename = "value")]
    pub jobs: u32,
    #[serde(rename = "valorTotal")]
    pub total_value: f64,
    #[serde(rename = "mediaValor")]
    pub average_value: f64,
}

/// Sum job counts and values per `(mes, ano)`, in chronological order.
pub fn by_month(summaries: &[StatementSummary]) -> Vec<MonthlyJobs> {
    let mut months: Vec<MonthlyJobs> = Vec::new();

    for summary in summaries {
        match months
            .iter_mut()
            .find(|m| m.month == summary.month && m.year == summary.year)
        {
            Some(m) => {
                m.jobs = m.jobs.saturating_add(summary.job_count);
                m.total_value += summary.total_value;
            }
            None => months.push(MonthlyJobs {
                name: format!("{}/{}", summary.month, summary.year),
                month: summary.month.clone(),
                year: summary.year.clone(),
                jobs: summary.job_count,
                total_value: summary.total_value,
                average_value: 0.0,
            }),
        }
    }

    for m in &mut months {
        m.average_value = if m.jobs > 0 {
            m.total_value / m.jobs as f64
        } else {
            0.0
        };
    }

    months.sort_by_key(|m| period_key(&m.month, &m.year));
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(month: &str, year: &str, jobs: u32, value: f64) -> StatementSummary {
        StatementSummary {
            id: format!("{month}{year}{jobs}"),
            registration: "1".into(),
            name: "W".into(),
            month: month.into(),
            year: year.into(),
            category: "ESTIVADOR".into(),
            job_count: jobs,
            total_value: value,
        }
    }

    #[test]
    fn orders_chronologically_not_lexically() {
        let input = vec![
            summary("ABR", "2024", 1, 10.0),
            summary("JAN", "2025", 1, 10.0),
            summary("FEV", "2024", 2, 20.0),
            summary("MAR", "2024", 3, 30.0),
            summary("JAN", "2024", 4, 40.0),
        ];
        let names: Vec<_> = by_month(&input).into_iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec!["JAN/2024", "FEV/2024", "MAR/2024", "ABR/2024", "JAN/2025"]
        );
    }

    #[test]
    fn sums_and_averages_per_month() {
        let input = vec![
            summary("JAN", "2024", 4, 400.0),
            summary("JAN", "2024", 6, 100.0),
        ];
        let months = by_month(&input);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].jobs, 10);
        assert_eq!(months[0].total_value, 500.0);
        assert_eq!(months[0].average_value, 50.0);
    }

    #[test]
    fn clamped_job_counts_saturate() {
        let input = vec![
            summary("JAN", "2024", u32::MAX, 1.0),
            summary("JAN", "2024", u32::MAX, 1.0),
        ];
        assert_eq!(by_month(&input)[0].jobs, u32::MAX);
    }

    #[test]
    fn zero_jobs_average_is_zero() {
        let months = by_month(&[summary("JAN", "2024", 0, 100.0)]);
        assert_eq!(months[0].average_value, 0.0);
    }

    #[test]
    fn empty_input() {
        assert!(by_month(&[]).is_empty());
    }
}

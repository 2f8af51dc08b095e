use proptest::prelude::*;

use extratos::aggregate::{
    by_category, by_month, by_operator, by_week, function_distribution, returns_breakdown,
    salary_breakdown, shift_distribution, summary_kpis, top_jobs,
};
use extratos::model::{period_key, Month, MonetaryValues};
use extratos::period::distinct_periods;
use extratos::{StatementSummary, WorkRecord};

fn summary(category: &str, month: &str, year: &str, jobs: u32, value: f64) -> StatementSummary {
    StatementSummary {
        id: format!("{category}-{month}-{year}"),
        registration: "123".into(),
        name: "Trabalhador".into(),
        month: month.into(),
        year: year.into(),
        category: category.into(),
        job_count: jobs,
        total_value: value,
    }
}

fn record(operator: &str, gross: f64) -> WorkRecord {
    WorkRecord {
        day: "05".into(),
        operator: operator.into(),
        shift: "A".into(),
        payment_period: "03/24".into(),
        values: MonetaryValues {
            gross,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn summary_strategy() -> impl Strategy<Value = StatementSummary> {
    (
        prop::sample::select(vec!["ESTIVADOR", "VIGIA", "CONFERENTE", "BLOCO"]),
        prop::sample::select(Month::ALL.to_vec()),
        2020..2027i32,
        0..40u32,
        0.0..50_000.0f64,
    )
        .prop_map(|(category, month, year, jobs, value)| {
            summary(category, month.code(), &year.to_string(), jobs, value)
        })
}

fn record_strategy() -> impl Strategy<Value = WorkRecord> {
    (
        prop::sample::select(vec!["T1", "T2", "T3", "T4"]),
        0.0..2_000.0f64,
    )
        .prop_map(|(operator, gross)| record(operator, gross))
}

proptest! {
    #[test]
    fn category_totals_account_for_every_statement(
        summaries in prop::collection::vec(summary_strategy(), 1..60)
    ) {
        let totals = by_category(&summaries);

        let count: u32 = totals.iter().map(|t| t.count).sum();
        prop_assert_eq!(count as usize, summaries.len());

        let grouped: f64 = totals.iter().map(|t| t.total_value).sum();
        let input: f64 = summaries.iter().map(|s| s.total_value).sum();
        prop_assert!((grouped - input).abs() < 1e-6 * input.max(1.0));
    }

    #[test]
    fn operator_shares_sum_to_one_hundred(
        records in prop::collection::vec(record_strategy(), 1..80)
    ) {
        let operators = by_operator(&records);
        let total: f64 = records.iter().map(|r| r.values.gross).sum();
        prop_assume!(total > 0.0);

        let shares: f64 = operators.iter().map(|o| o.share).sum();
        prop_assert!((shares - 100.0).abs() < 1e-6);

        let jobs: u32 = operators.iter().map(|o| o.jobs).sum();
        prop_assert_eq!(jobs as usize, records.len());
        for pair in operators.windows(2) {
            prop_assert!(pair[0].total_value >= pair[1].total_value);
        }
    }

    #[test]
    fn distinct_periods_are_unique_and_chronological(
        summaries in prop::collection::vec(summary_strategy(), 0..60)
    ) {
        let periods = distinct_periods(&summaries);

        for pair in periods.windows(2) {
            let a = period_key(&pair[0].month, &pair[0].year);
            let b = period_key(&pair[1].month, &pair[1].year);
            prop_assert!(a < b, "{:?} should come before {:?}", pair[0], pair[1]);
        }
        for s in &summaries {
            prop_assert!(periods.iter().any(|p| p.month == s.month && p.year == s.year));
        }
    }

    #[test]
    fn monthly_rows_follow_calendar_order(
        summaries in prop::collection::vec(summary_strategy(), 0..60)
    ) {
        let months = by_month(&summaries);
        for pair in months.windows(2) {
            prop_assert!(
                period_key(&pair[0].month, &pair[0].year) < period_key(&pair[1].month, &pair[1].year)
            );
        }
        let jobs: u32 = months.iter().map(|m| m.jobs).sum();
        prop_assert_eq!(jobs, summaries.iter().map(|s| s.job_count).sum::<u32>());
    }
}

#[test]
fn category_scenario() {
    let summaries = vec![
        summary("ESTIVADOR", "JAN", "2024", 1, 100.0),
        summary("ESTIVADOR", "JAN", "2024", 1, 50.0),
        summary("VIGIA", "JAN", "2024", 1, 30.0),
    ];

    let totals = by_category(&summaries);

    assert_eq!(totals.len(), 2);
    assert_eq!(
        (totals[0].category.as_str(), totals[0].count, totals[0].total_value),
        ("ESTIVADOR", 2, 150.0)
    );
    assert_eq!(
        (totals[1].category.as_str(), totals[1].count, totals[1].total_value),
        ("VIGIA", 1, 30.0)
    );
}

#[test]
fn operator_scenario() {
    let records = vec![record("A", 100.0), record("B", 100.0), record("A", 200.0)];

    let operators = by_operator(&records);

    assert_eq!(operators.len(), 2);
    assert_eq!(operators[0].operator, "A");
    assert_eq!(operators[0].jobs, 2);
    assert_eq!(operators[0].total_value, 300.0);
    assert_eq!(operators[0].percentage, "75.00");
    assert_eq!(operators[1].operator, "B");
    assert_eq!(operators[1].jobs, 1);
    assert_eq!(operators[1].total_value, 100.0);
    assert_eq!(operators[1].percentage, "25.00");
}

#[test]
fn periods_use_calendar_not_alphabetical_order() {
    let summaries = vec![
        summary("VIGIA", "ABR", "2024", 1, 1.0),
        summary("VIGIA", "FEV", "2024", 1, 1.0),
        summary("VIGIA", "MAR", "2024", 1, 1.0),
        summary("VIGIA", "JAN", "2024", 1, 1.0),
        summary("VIGIA", "DEZ", "2023", 1, 1.0),
        summary("VIGIA", "FEV", "2024", 1, 1.0),
    ];

    let labels: Vec<String> = distinct_periods(&summaries)
        .into_iter()
        .map(|p| p.label)
        .collect();

    assert_eq!(
        labels,
        vec!["DEZ/2023", "JAN/2024", "FEV/2024", "MAR/2024", "ABR/2024"]
    );
}

#[test]
fn empty_input_yields_empty_output() {
    let summaries: Vec<StatementSummary> = Vec::new();
    let records: Vec<WorkRecord> = Vec::new();

    assert!(by_category(&summaries).is_empty());
    assert!(by_month(&summaries).is_empty());
    assert!(distinct_periods(&summaries).is_empty());
    assert!(by_operator(&records).is_empty());
    assert!(by_week(&records).is_empty());
    assert!(shift_distribution(&records).is_empty());
    assert!(salary_breakdown(&records).is_empty());
    assert!(returns_breakdown(&records).is_empty());
    assert!(top_jobs(&records, 10).is_empty());
    assert!(function_distribution(&records).is_empty());

    let kpis = summary_kpis(&records);
    assert_eq!(kpis.total_jobs, 0);
    assert_eq!(kpis.worked_days, 0);
    assert_eq!(kpis.average_gross_per_job, 0.0);
    assert_eq!(kpis.average_jobs_per_week, 0.0);
}

#[test]
fn zero_gross_gives_zero_percentages() {
    let operators = by_operator(&[record("A", 0.0), record("B", 0.0)]);
    assert!(operators.iter().all(|o| o.percentage == "0.00"));
}

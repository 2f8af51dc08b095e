use serde::{Deserialize, Serialize};

use crate::model::WorkRecord;

/// One slice of a money pie chart
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BreakdownSlice {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub total: f64,
}

/// A single job ranked by gross value
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TopJob {
    pub name: String,
    pub value: f64,
}

/// Jobs grouped by function code
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionDistributionItem {
    pub name: String,
    pub code: String,
    /// Number of jobs
    pub value: u32,
    #[serde(rename = "totalValue")]
    pub total_value: f64,
    #[serde(rename = "totalLiquido", default)]
    pub total_net: f64,
    #[serde(rename = "mediaBruto", default)]
    pub average_gross: f64,
    #[serde(rename = "mediaLiquido", default)]
    pub average_net: f64,
}

fn with_total(slices: Vec<(&str, f64)>) -> Vec<BreakdownSlice> {
    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    slices
        .into_iter()
        .map(|(name, value)| BreakdownSlice {
            name: name.to_string(),
            value,
            total,
        })
        .collect()
}

/// Where the gross went: net pay and each deduction. Zero slices are dropped.
pub fn salary_breakdown(records: &[WorkRecord]) -> Vec<BreakdownSlice> {
    if records.is_empty() {
        return Vec::new();
    }

    let sum = |f: fn(&WorkRecord) -> f64| records.iter().map(f).sum::<f64>();
    let slices = vec![
        ("Líquido", sum(|r| r.values.net)),
        ("IRPF", sum(|r| r.values.income_tax)),
        ("INSS", sum(|r| r.values.inss)),
        ("DAS", sum(|r| r.values.das)),
        ("Sindical", sum(|r| r.values.union_dues)),
        ("Judicial", sum(|r| r.values.judicial)),
        ("Outros", sum(|r| r.values.equipment + r.values.monthly_fee)),
    ];

    with_total(slices.into_iter().filter(|(_, v)| *v > 0.0).collect())
}

/// Accrued returns: vacation, 13th salary and FGTS.
pub fn returns_breakdown(records: &[WorkRecord]) -> Vec<BreakdownSlice> {
    if records.is_empty() {
        return Vec::new();
    }

    let sum = |f: fn(&WorkRecord) -> f64| records.iter().map(f).sum::<f64>();
    with_total(vec![
        ("Férias", sum(|r| r.values.vacation)),
        ("13º", sum(|r| r.values.thirteenth)),
        ("FGTS", sum(|r| r.values.fgts)),
    ])
}

fn month_part(record: &WorkRecord) -> &str {
    record
        .payment_period
        .split('/')
        .next()
        .unwrap_or_default()
}

/// The `limit` best paid jobs, labelled `"{pasta} {dia}/{MM}-{tur}"`.
pub fn top_jobs(records: &[WorkRecord], limit: usize) -> Vec<TopJob> {
    let mut jobs: Vec<TopJob> = records
        .iter()
        .map(|r| TopJob {
            name: format!("{} {}/{}-{}", r.vessel, r.day, month_part(r), r.shift),
            value: r.values.gross,
        })
        .collect();
    jobs.sort_by(|a, b| b.value.total_cmp(&a.value));
    jobs.truncate(limit);
    jobs
}

/// Job count and money per function code, most frequent first.
pub fn function_distribution(records: &[WorkRecord]) -> Vec<FunctionDistributionItem> {
    let mut functions: Vec<FunctionDistributionItem> = Vec::new();

    for record in records {
        let code = record.function.trim();
        match functions.iter_mut().find(|f| f.code == code) {
            Some(f) => {
                f.value = f.value.saturating_add(1);
                f.total_value += record.values.gross;
                f.total_net += record.values.net;
            }
            None => functions.push(FunctionDistributionItem {
                name: format!("Função {code}"),
                code: code.to_string(),
                value: 1,
                total_value: record.values.gross,
                total_net: record.values.net,
                average_gross: 0.0,
                average_net: 0.0,
            }),
        }
    }

    for f in &mut functions {
        f.average_gross = f.total_value / f.value as f64;
        f.average_net = f.total_net / f.value as f64;
    }

    functions.sort_by(|a, b| b.value.cmp(&a.value));
    functions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MonetaryValues;

    fn job(values: MonetaryValues) -> WorkRecord {
        WorkRecord {
            vessel: "NAVIO".into(),
            day: "05".into(),
            payment_period: "03/24".into(),
            shift: "A".into(),
            function: "101".into(),
            values,
            ..Default::default()
        }
    }

    #[test]
    fn salary_breakdown_drops_empty_slices() {
        let records = vec![
            job(MonetaryValues {
                net: 80.0,
                inss: 10.0,
                equipment: 2.0,
                monthly_fee: 3.0,
                ..Default::default()
            }),
            job(MonetaryValues {
                net: 20.0,
                ..Default::default()
            }),
        ];
        let slices = salary_breakdown(&records);
        let names: Vec<_> = slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Líquido", "INSS", "Outros"]);
        assert_eq!(slices[0].value, 100.0);
        assert_eq!(slices[2].value, 5.0);
        assert!(slices.iter().all(|s| s.total == 115.0));
    }

    #[test]
    fn returns_always_has_three_slices() {
        let slices = returns_breakdown(&[job(MonetaryValues {
            vacation: 10.0,
            fgts: 8.0,
            ..Default::default()
        })]);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[1].value, 0.0);
        assert_eq!(slices[0].total, 18.0);
    }

    #[test]
    fn top_jobs_are_ranked_and_limited() {
        let records: Vec<_> = [50.0, 300.0, 120.0]
            .into_iter()
            .map(|gross| {
                job(MonetaryValues {
                    gross,
                    ..Default::default()
                })
            })
            .collect();
        let top = top_jobs(&records, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].value, 300.0);
        assert_eq!(top[0].name, "NAVIO 05/03-A");
        assert_eq!(top[1].value, 120.0);
    }

    #[test]
    fn function_distribution_averages() {
        let mut other = job(MonetaryValues {
            gross: 10.0,
            ..Default::default()
        });
        other.function = "202".into();
        let records = vec![
            job(MonetaryValues {
                gross: 100.0,
                net: 90.0,
                ..Default::default()
            }),
            other,
            job(MonetaryValues {
                gross: 200.0,
                net: 150.0,
                ..Default::default()
            }),
        ];
        let functions = function_distribution(&records);
        assert_eq!(functions[0].code, "101");
        assert_eq!(functions[0].value, 2);
        assert_eq!(functions[0].average_gross, 150.0);
        assert_eq!(functions[0].average_net, 120.0);
        assert_eq!(functions[1].name, "Função 202");
    }

    #[test]
    fn empty_input() {
        assert!(salary_breakdown(&[]).is_empty());
        assert!(returns_breakdown(&[]).is_empty());
        assert!(top_jobs(&[], 10).is_empty());
        assert!(function_distribution(&[]).is_empty());
    }
}

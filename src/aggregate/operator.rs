use serde::{Deserialize, Serialize};

use crate::model::WorkRecord;

/// Per-operator (tomador) totals for the operator cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorAggregate {
    #[serde(rename = "tomador")]
    pub operator: String,
    #[serde(rename = "tomadorNome")]
    pub operator_name: String,
    #[serde(rename = "fainas")]
    pub jobs: u32,
    #[serde(rename = "totalValor")]
    pub total_value: f64,
    #[serde(rename = "maiorBruto")]
    pub max_gross: f64,
    /// Share of the grand total, in percent
    #[serde(skip)]
    pub share: f64,
    /// `share` formatted with two decimals; "0.00" when the grand total is zero
    #[serde(rename = "porcentagemTotal")]
    pub percentage: String,
    #[serde(rename = "mediaValor")]
    pub average_value: f64,
}

/// Jobs and value per operator, as served by `/analise/tomadores`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OperatorAnalysis {
    #[serde(rename = "tomador")]
    pub operator: String,
    #[serde(rename = "tomadorNome", default)]
    pub operator_name: Option<String>,
    #[serde(rename = "totalTrabalhos", default)]
    pub jobs: u32,
    #[serde(rename = "valorTotal", default)]
    pub total_value: f64,
}

/// Group work records by operator and rank them by total gross value.
pub fn by_operator(records: &[WorkRecord]) -> Vec<OperatorAggregate> {
    let mut operators: Vec<OperatorAggregate> = Vec::new();

    for record in records {
        let gross = record.values.gross;
        match operators.iter_mut().find(|o| o.operator == record.operator) {
            Some(op) => {
                op.jobs += 1;
                op.total_value += gross;
                op.max_gross = op.max_gross.max(gross);
            }
            None => operators.push(OperatorAggregate {
                operator: record.operator.clone(),
                operator_name: record.operator_label().to_string(),
                jobs: 1,
                total_value: gross,
                max_gross: gross,
                share: 0.0,
                percentage: String::new(),
                average_value: 0.0,
            }),
        }
    }

    let grand_total: f64 = operators.iter().map(|o| o.total_value).sum();

    for op in &mut operators {
        op.share = if grand_total != 0.0 {
            op.total_value / grand_total * 100.0
        } else {
            0.0
        };
        op.percentage = format!("{:.2}", op.share);
        op.average_value = if op.jobs > 0 {
            op.total_value / op.jobs as f64
        } else {
            0.0
        };
    }

    // stable: ties keep first-encounter order
    operators.sort_by(|a, b| b.total_value.total_cmp(&a.total_value));
    operators
}

/// Jobs and gross value per operator, ranked by value.
pub fn operator_analysis(records: &[WorkRecord]) -> Vec<OperatorAnalysis> {
    by_operator(records)
        .into_iter()
        .map(|op| OperatorAnalysis {
            operator: op.operator,
            operator_name: Some(op.operator_name),
            jobs: op.jobs,
            total_value: op.total_value,
        })
        .collect()
}

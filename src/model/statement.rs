use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient::{bool_or_false, f64_or_zero, string_lossy, u32_or_zero};

/// One row per worker statement period, as returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatementSummary {
    #[serde(deserialize_with = "string_lossy")]
    pub id: String,
    #[serde(rename = "matricula", default, deserialize_with = "string_lossy")]
    pub registration: String,
    #[serde(rename = "nome", default, deserialize_with = "string_lossy")]
    pub name: String,
    #[serde(rename = "mes", default, deserialize_with = "string_lossy")]
    pub month: String,
    #[serde(rename = "ano", default, deserialize_with = "string_lossy")]
    pub year: String,
    #[serde(rename = "categoria", default, deserialize_with = "string_lossy")]
    pub category: String,
    #[serde(rename = "totalTrabalhos", default, deserialize_with = "u32_or_zero")]
    pub job_count: u32,
    #[serde(rename = "valorTotal", default, deserialize_with = "f64_or_zero")]
    pub total_value: f64,
}

/// Gross value plus the deduction and benefit columns of a payroll line
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryValues {
    #[serde(rename = "baseDeCalculo", default, deserialize_with = "f64_or_zero")]
    pub gross: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub inss: f64,
    #[serde(rename = "impostoDeRenda", default, deserialize_with = "f64_or_zero")]
    pub income_tax: f64,
    #[serde(rename = "descontoJudicial", default, deserialize_with = "f64_or_zero")]
    pub judicial: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub das: f64,
    #[serde(rename = "mensal", default, deserialize_with = "f64_or_zero")]
    pub monthly_fee: f64,
    #[serde(rename = "impostoSindical", default, deserialize_with = "f64_or_zero")]
    pub union_dues: f64,
    #[serde(rename = "descontosEpiCracha", default, deserialize_with = "f64_or_zero")]
    pub equipment: f64,
    #[serde(rename = "liquido", default, deserialize_with = "f64_or_zero")]
    pub net: f64,
    #[serde(rename = "ferias", default, deserialize_with = "f64_or_zero")]
    pub vacation: f64,
    #[serde(rename = "decimoTerceiro", default, deserialize_with = "f64_or_zero")]
    pub thirteenth: f64,
    #[serde(rename = "encargosDecimo", default, deserialize_with = "f64_or_zero")]
    pub thirteenth_charges: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub fgts: f64,
}

/// A single job (faina) inside a statement
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WorkRecord {
    #[serde(rename = "dia", default, deserialize_with = "string_lossy")]
    pub day: String,
    #[serde(rename = "folha", default, deserialize_with = "string_lossy")]
    pub sheet: String,
    #[serde(rename = "tomador", default, deserialize_with = "string_lossy")]
    pub operator: String,
    #[serde(rename = "tomadorNome", default, skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    #[serde(rename = "pasta", default, deserialize_with = "string_lossy")]
    pub vessel: String,
    #[serde(rename = "fun", default, deserialize_with = "string_lossy")]
    pub function: String,
    #[serde(rename = "tur", default, deserialize_with = "string_lossy")]
    pub shift: String,
    #[serde(rename = "ter", default, deserialize_with = "string_lossy")]
    pub terminal: String,
    /// Payment period, `MM/YY`
    #[serde(rename = "pagto", default, deserialize_with = "string_lossy")]
    pub payment_period: String,
    #[serde(flatten)]
    pub values: MonetaryValues,
    #[serde(
        rename = "isDomingo",
        alias = "domingo",
        default,
        deserialize_with = "bool_or_false"
    )]
    pub sunday: bool,
    #[serde(
        rename = "isFeriado",
        alias = "feriado",
        default,
        deserialize_with = "bool_or_false"
    )]
    pub holiday: bool,
}

impl WorkRecord {
    /// Month and full year parsed from the `MM/YY` payment period.
    pub fn period(&self) -> Option<(u32, i32)> {
        let (month, year) = self.payment_period.trim().split_once('/')?;
        let month: u32 = month.trim().parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        let year_raw = year.trim();
        let year: i32 = year_raw.parse().ok()?;
        let year = if year_raw.len() <= 2 { 2000 + year } else { year };
        Some((month, year))
    }

    pub fn day_of_month(&self) -> Option<u32> {
        self.day.trim().parse().ok()
    }

    /// Calendar date of the job, rebuilt from the day and payment period.
    pub fn date(&self) -> Option<NaiveDate> {
        let (month, year) = self.period()?;
        NaiveDate::from_ymd_opt(year, month, self.day_of_month()?)
    }

    /// Operator display name, falling back to the operator id
    pub fn operator_label(&self) -> &str {
        self.operator_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.operator)
    }
}

/// Full statement with its work records
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Statement {
    #[serde(default, deserialize_with = "string_lossy")]
    pub id: String,
    #[serde(rename = "matricula", default, deserialize_with = "string_lossy")]
    pub registration: String,
    #[serde(rename = "nome", default, deserialize_with = "string_lossy")]
    pub name: String,
    #[serde(rename = "mes", default, deserialize_with = "string_lossy")]
    pub month: String,
    #[serde(rename = "ano", default, deserialize_with = "string_lossy")]
    pub year: String,
    #[serde(rename = "categoria", default, deserialize_with = "string_lossy")]
    pub category: String,
    #[serde(rename = "trabalhos", default)]
    pub records: Vec<WorkRecord>,
    #[serde(rename = "folhasComplementos", default)]
    pub sheets_complements: MonetaryValues,
    #[serde(rename = "revisadas", default)]
    pub revised: MonetaryValues,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonthlySummaryPeriod {
    #[serde(rename = "mes", default, deserialize_with = "string_lossy")]
    pub month: String,
    #[serde(rename = "ano", default, deserialize_with = "string_lossy")]
    pub year: String,
}

/// Server-side roll-up for one month (`/resumo/{mes}/{ano}`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonthlySummary {
    #[serde(rename = "_id")]
    pub period: MonthlySummaryPeriod,
    #[serde(rename = "totalBaseCalculo", default, deserialize_with = "f64_or_zero")]
    pub total_gross: f64,
    #[serde(rename = "totalLiquido", default, deserialize_with = "f64_or_zero")]
    pub total_net: f64,
    #[serde(rename = "totalFGTS", default, deserialize_with = "f64_or_zero")]
    pub total_fgts: f64,
    #[serde(rename = "totalTrabalhos", default, deserialize_with = "u32_or_zero")]
    pub total_jobs: u32,
    #[serde(rename = "totalTrabalhadores", default, deserialize_with = "u32_or_zero")]
    pub total_workers: u32,
}

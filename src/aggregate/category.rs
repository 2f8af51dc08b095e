use serde::{Deserialize, Serialize};

use crate::model::StatementSummary;

/// Count and summed value of statements in one professional category
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryTotals {
    #[serde(rename = "categoria")]
    pub category: String,
    pub count: u32,
    #[serde(rename = "valorTotal")]
    pub total_value: f64,
}

/// Group statements by category, in first-encounter order.
pub fn by_category(summaries: &[StatementSummary]) -> Vec<CategoryTotals> {
    let mut totals: Vec<CategoryTotals> = Vec::new();

    for summary in summaries {
        match totals.iter_mut().find(|t| t.category == summary.category) {
            Some(existing) => {
                existing.count = existing.count.saturating_add(1);
                existing.total_value += summary.total_value;
            }
            None => totals.push(CategoryTotals {
                category: summary.category.clone(),
                count: 1,
                total_value: summary.total_value,
            }),
        }
    }

    totals
}

/// Distinct categories, sorted, for filter pickers
pub fn distinct_categories(summaries: &[StatementSummary]) -> Vec<String> {
    let mut categories: Vec<String> = summaries.iter().map(|s| s.category.clone()).collect();
    categories.sort();
    categories.dedup();
    categories
}

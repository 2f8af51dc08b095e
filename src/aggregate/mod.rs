//! Pure transformations from fetched statements to dashboard view-models.
//!
//! Every function here takes a borrowed slice and returns a fresh value; an
//! empty input yields an empty `Vec` or a zeroed struct.

mod breakdown;
mod category;
mod monthly;
mod operator;
mod shift;
mod summary;
mod weekly;

pub use breakdown::{
    function_distribution, returns_breakdown, salary_breakdown, top_jobs, BreakdownSlice,
    FunctionDistributionItem, TopJob,
};
pub use category::{by_category, distinct_categories, CategoryTotals};
pub use monthly::{by_month, MonthlyJobs};
pub use operator::{by_operator, operator_analysis, OperatorAggregate, OperatorAnalysis};
pub use shift::{shift_distribution, ShiftCount};
pub use summary::{days_in_month, dominant_period, summary_kpis, SummaryKpis};
pub use weekly::{by_week, week_start, WeeklyJobData};

mod filters;
mod lenient;
mod month;
mod statement;

pub use filters::{DashboardFilters, StatementFilters};
pub use month::{period_key, Month};
pub use statement::{
    MonetaryValues, MonthlySummary, MonthlySummaryPeriod, Statement, StatementSummary, WorkRecord,
};

mod cache;
mod loader;

pub use cache::{AnalyticsKind, QueryCache, QueryKey, QueryScope};
pub use loader::{
    Dashboard, DashboardData, DashboardOptions, Source, Sourced, StatementListing, TOP_JOBS_LIMIT,
};

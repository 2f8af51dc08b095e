pub mod aggregate;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod period;

pub use api::{ApiClient, Transport, UreqTransport};
pub use config::{ApiSettings, Config};
pub use dashboard::{Dashboard, DashboardData, QueryCache};
pub use error::{ExtratoError, Result};
pub use model::{DashboardFilters, Statement, StatementFilters, StatementSummary, WorkRecord};

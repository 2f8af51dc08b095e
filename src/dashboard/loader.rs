use std::sync::Arc;

use crate::aggregate::{
    self, BreakdownSlice, CategoryTotals, FunctionDistributionItem, MonthlyJobs, OperatorAggregate,
    ShiftCount, SummaryKpis, TopJob, WeeklyJobData,
};
use crate::api::{ApiClient, BatchUploadReport, PdfUpload};
use crate::error::Result;
use crate::model::{DashboardFilters, Statement, StatementFilters, StatementSummary, WorkRecord};
use crate::period::{distinct_periods, PeriodOption};

use super::cache::{AnalyticsKind, QueryCache, QueryKey, QueryScope};

pub const TOP_JOBS_LIMIT: usize = 10;

/// Where an analytics view came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Server,
    Local,
}

#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub data: T,
    pub source: Source,
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Ask `/analise/*` first and fall back to local aggregation on failure
    pub server_analytics: bool,
    pub top_jobs_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            server_analytics: true,
            top_jobs_limit: TOP_JOBS_LIMIT,
        }
    }
}

/// Statement list plus the filter choices derived from it
#[derive(Debug, Clone)]
pub struct StatementListing {
    pub statements: Arc<Vec<StatementSummary>>,
    pub periods: Vec<PeriodOption>,
    pub categories: Vec<String>,
    pub category_totals: Vec<CategoryTotals>,
}

/// Every view-model the dashboard renders, computed for one filter set
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub filters: DashboardFilters,
    pub statements: Arc<Vec<StatementSummary>>,
    pub details: Arc<Vec<Statement>>,
    pub records: Vec<WorkRecord>,
    pub periods: Vec<PeriodOption>,
    pub category_totals: Vec<CategoryTotals>,
    pub operators: Vec<OperatorAggregate>,
    pub summary: SummaryKpis,
    pub monthly: Vec<MonthlyJobs>,
    pub salary: Sourced<Vec<BreakdownSlice>>,
    pub shifts: Sourced<Vec<ShiftCount>>,
    pub weekly: Sourced<Vec<WeeklyJobData>>,
    pub top_jobs: Sourced<Vec<TopJob>>,
    pub returns: Sourced<Vec<BreakdownSlice>>,
    pub functions: Sourced<Vec<FunctionDistributionItem>>,
    /// Non-fatal problems hit while loading
    pub warnings: Vec<String>,
}

impl DashboardData {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Binds the API client, the query cache and the aggregation layer.
pub struct Dashboard {
    client: ApiClient,
    cache: Arc<QueryCache>,
    options: DashboardOptions,
}

impl Dashboard {
    pub fn new(client: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self::with_options(client, cache, DashboardOptions::default())
    }

    pub fn with_options(client: ApiClient, cache: Arc<QueryCache>, options: DashboardOptions) -> Self {
        Self {
            client,
            cache,
            options,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn statements(&self, filters: &StatementFilters) -> Result<Arc<Vec<StatementSummary>>> {
        self.cache
            .get_or_fetch(QueryKey::Statements(filters.cache_key()), || {
                self.client.list_statements(filters)
            })
    }

    pub fn listing(&self, filters: &StatementFilters) -> Result<StatementListing> {
        let statements = self.statements(filters)?;
        Ok(StatementListing {
            periods: distinct_periods(&statements),
            categories: aggregate::distinct_categories(&statements),
            category_totals: aggregate::by_category(&statements),
            statements,
        })
    }

    pub fn statement(&self, id: &str) -> Result<Arc<Statement>> {
        self.cache
            .get_or_fetch(QueryKey::Statement(id.to_string()), || {
                self.client.get_statement(id)
            })
    }

    /// Upload statement PDFs; any success invalidates the list so the next load refetches.
    pub fn upload(&self, files: &[PdfUpload]) -> BatchUploadReport {
        let report = self.client.upload_batch(files);
        if report.succeeded() > 0 {
            self.cache.invalidate(QueryScope::Statements);
            self.cache.invalidate(QueryScope::Analytics);
        }
        report
    }

    /// Drop everything cached and load again.
    pub fn refetch(&self, filters: &DashboardFilters) -> Result<DashboardData> {
        log::debug!("refetching dashboard data");
        self.cache.invalidate_all();
        self.load(filters)
    }

    /// Load the statement list, its details and all analytics for `filters`.
    ///
    /// Only a failure of the statement list is returned as an error. Detail
    /// and analytics failures become warnings and local fallbacks.
    pub fn load(&self, filters: &DashboardFilters) -> Result<DashboardData> {
        let statements = self.statements(&StatementFilters::from(filters))?;
        let mut warnings = Vec::new();

        let ids: Vec<String> = statements.iter().map(|s| s.id.clone()).collect();
        let details = if ids.is_empty() {
            Arc::new(Vec::new())
        } else {
            self.cache
                .get_or_fetch(QueryKey::StatementDetails(ids.clone()), || {
                    self.client.get_statements(&ids)
                })
                .unwrap_or_else(|e| {
                    log::warn!("statement details unavailable: {e}");
                    warnings.push(format!("statement details unavailable: {e}"));
                    Arc::new(Vec::new())
                })
        };

        let records: Vec<WorkRecord> = details
            .iter()
            .flat_map(|statement| statement.records.iter().cloned())
            .collect();

        // Server analytics only make sense once there is something to analyse.
        let remote = self.options.server_analytics && !statements.is_empty();
        let limit = self.options.top_jobs_limit;
        let records_ref = &records;

        let ((salary, shifts), ((weekly, top_jobs), (returns, functions))) = rayon::join(
            || {
                rayon::join(
                    || {
                        self.analytic(
                            AnalyticsKind::SalaryBreakdown,
                            filters,
                            remote,
                            |c| c.salary_breakdown(filters),
                            || aggregate::salary_breakdown(records_ref),
                        )
                    },
                    || {
                        self.analytic(
                            AnalyticsKind::ShiftDistribution,
                            filters,
                            remote,
                            |c| c.shift_distribution(filters),
                            || aggregate::shift_distribution(records_ref),
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || {
                                self.analytic(
                                    AnalyticsKind::WeeklyDistribution,
                                    filters,
                                    remote,
                                    |c| c.weekly_distribution(filters),
                                    || aggregate::by_week(records_ref),
                                )
                            },
                            || {
                                self.analytic(
                                    AnalyticsKind::TopJobs,
                                    filters,
                                    remote,
                                    |c| c.top_jobs(filters, limit),
                                    || aggregate::top_jobs(records_ref, limit),
                                )
                            },
                        )
                    },
                    || {
                        rayon::join(
                            || {
                                self.analytic(
                                    AnalyticsKind::ReturnsBreakdown,
                                    filters,
                                    remote,
                                    |c| c.returns_breakdown(filters),
                                    || aggregate::returns_breakdown(records_ref),
                                )
                            },
                            || {
                                self.analytic(
                                    AnalyticsKind::FunctionDistribution,
                                    filters,
                                    remote,
                                    |c| c.function_distribution(filters),
                                    || aggregate::function_distribution(records_ref),
                                )
                            },
                        )
                    },
                )
            },
        );

        for view in [
            (AnalyticsKind::SalaryBreakdown, salary.source),
            (AnalyticsKind::ShiftDistribution, shifts.source),
            (AnalyticsKind::WeeklyDistribution, weekly.source),
            (AnalyticsKind::TopJobs, top_jobs.source),
            (AnalyticsKind::ReturnsBreakdown, returns.source),
            (AnalyticsKind::FunctionDistribution, functions.source),
        ] {
            if remote && view.1 == Source::Local {
                warnings.push(format!("{} computed locally", view.0));
            }
        }

        Ok(DashboardData {
            filters: filters.clone(),
            periods: distinct_periods(&statements),
            category_totals: aggregate::by_category(&statements),
            operators: aggregate::by_operator(&records),
            summary: aggregate::summary_kpis(&records),
            monthly: aggregate::by_month(&statements),
            statements,
            details,
            records,
            salary,
            shifts,
            weekly,
            top_jobs,
            returns,
            functions,
            warnings,
        })
    }

    fn analytic<T, R, L>(
        &self,
        kind: AnalyticsKind,
        filters: &DashboardFilters,
        remote: bool,
        fetch: R,
        local: L,
    ) -> Sourced<Vec<T>>
    where
        T: Clone + Send + Sync + 'static,
        R: FnOnce(&ApiClient) -> Result<Vec<T>>,
        L: FnOnce() -> Vec<T>,
    {
        if remote {
            let key = QueryKey::Analytics(kind, filters.cache_key());
            match self.cache.get_or_fetch(key, || fetch(&self.client)) {
                Ok(data) => {
                    return Sourced {
                        data: data.as_ref().clone(),
                        source: Source::Server,
                    }
                }
                Err(e) => log::warn!("{kind} endpoint failed ({e}); aggregating locally"),
            }
        }
        Sourced {
            data: local(),
            source: Source::Local,
        }
    }
}

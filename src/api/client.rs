use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;
use serde::de::DeserializeOwned;

use super::envelope::decode;
use super::transport::{MultipartFile, Transport, UreqTransport};
use super::upload::{
    BatchUploadReport, FileOutcome, PdfUpload, UploadResponse, UploadStatus, UPLOAD_FIELD,
};
use crate::aggregate::{
    BreakdownSlice, FunctionDistributionItem, OperatorAnalysis, ShiftCount, TopJob, WeeklyJobData,
};
use crate::config::ApiSettings;
use crate::error::{ExtratoError, Result};
use crate::model::{
    DashboardFilters, MonthlySummary, Statement, StatementFilters, StatementSummary, WorkRecord,
};

/// Detail requests in flight at once when fetching many statements
pub const DETAIL_BATCH_SIZE: usize = 5;

/// Typed operations against the statements service
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client over HTTP using the configured timeout and attempt count.
    pub fn http(base_url: &str, settings: &ApiSettings) -> Self {
        Self::new(Arc::new(UreqTransport::new(
            base_url,
            Duration::from_secs(settings.timeout_secs),
            settings.retry_attempts,
        )))
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let body = self.transport.get(path, query)?;
        decode(path, &body)
    }

    pub fn list_statements(&self, filters: &StatementFilters) -> Result<Vec<StatementSummary>> {
        self.get("/analitico", &filters.query_pairs())
    }

    pub fn get_statement(&self, id: &str) -> Result<Statement> {
        if id.trim().is_empty() {
            return Err(ExtratoError::StatementNotFound(id.to_string()));
        }
        let path = format!("/analitico/{}", urlencoding::encode(id));
        self.get(&path, &[]).map_err(|e| match e {
            ExtratoError::Status { status: 404, .. } => {
                ExtratoError::StatementNotFound(id.to_string())
            }
            other => other,
        })
    }

    /// Fetch many statements, `DETAIL_BATCH_SIZE` at a time.
    ///
    /// Each batch runs in parallel and batches run one after another. The
    /// first failure aborts the remaining batches.
    pub fn get_statements(&self, ids: &[String]) -> Result<Vec<Statement>> {
        let mut statements = Vec::with_capacity(ids.len());
        for batch in ids.chunks(DETAIL_BATCH_SIZE) {
            let details: Vec<Statement> = batch
                .par_iter()
                .map(|id| self.get_statement(id))
                .collect::<Result<_>>()?;
            statements.extend(details);
        }
        Ok(statements)
    }

    pub fn upload_statement(&self, file: &PdfUpload) -> Result<UploadResponse> {
        file.validate()?;
        let part = MultipartFile {
            field: UPLOAD_FIELD,
            file_name: &file.file_name,
            content_type: &file.content_type,
            bytes: &file.bytes,
        };
        let body = self.transport.post_multipart("/analitico", &part)?;
        let response: UploadResponse = decode("/analitico", &body)?;
        if response.status == UploadStatus::Error {
            return Err(ExtratoError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| format!("processing of '{}' failed", file.file_name)),
            });
        }
        Ok(response)
    }

    /// Upload files one by one; a failure is recorded and the rest still go out.
    pub fn upload_batch(&self, files: &[PdfUpload]) -> BatchUploadReport {
        let outcomes = files
            .iter()
            .map(|file| {
                let result = self.upload_statement(file);
                if let Err(e) = &result {
                    log::warn!("upload of {} failed: {e}", file.file_name);
                }
                FileOutcome {
                    file_name: file.file_name.clone(),
                    result,
                }
            })
            .collect();
        BatchUploadReport { outcomes }
    }

    pub fn monthly_summary(&self, month: &str, year: &str) -> Result<MonthlySummary> {
        let path = format!(
            "/resumo/{}/{}",
            urlencoding::encode(month),
            urlencoding::encode(year)
        );
        self.get(&path, &[])
    }

    pub fn jobs_by_operator(&self, operator: &str) -> Result<Vec<WorkRecord>> {
        let path = format!("/trabalhos/tomador/{}", urlencoding::encode(operator));
        self.get(&path, &[])
    }

    pub fn salary_breakdown(&self, filters: &DashboardFilters) -> Result<Vec<BreakdownSlice>> {
        self.get("/analise/salario-breakdown", &filters.query_pairs())
    }

    pub fn shift_distribution(&self, filters: &DashboardFilters) -> Result<Vec<ShiftCount>> {
        self.get("/analise/turnos", &filters.query_pairs())
    }

    pub fn weekly_distribution(&self, filters: &DashboardFilters) -> Result<Vec<WeeklyJobData>> {
        self.get("/analise/trabalhos-semanais", &filters.query_pairs())
    }

    pub fn top_jobs(&self, filters: &DashboardFilters, limit: usize) -> Result<Vec<TopJob>> {
        let mut query = filters.query_pairs();
        query.push(("limit", limit.to_string()));
        self.get("/analise/top-trabalhos", &query)
    }

    pub fn returns_breakdown(&self, filters: &DashboardFilters) -> Result<Vec<BreakdownSlice>> {
        self.get("/analise/retornos", &filters.query_pairs())
    }

    pub fn function_distribution(
        &self,
        filters: &DashboardFilters,
    ) -> Result<Vec<FunctionDistributionItem>> {
        self.get("/analise/funcoes", &filters.query_pairs())
    }

    pub fn operator_analysis(&self, statement_ids: &[String]) -> Result<Vec<OperatorAnalysis>> {
        self.get(
            "/analise/tomadores",
            &[("extratoIds", statement_ids.join(","))],
        )
    }
}

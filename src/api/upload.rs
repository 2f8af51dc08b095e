use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExtratoError, Result};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
/// Multipart field name the server reads the file from
pub const UPLOAD_FIELD: &str = "arquivo";

/// A statement file ready to be sent
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => PDF_CONTENT_TYPE,
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

impl PdfUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, checking type and size before loading it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = content_type_for(path);

        check(&file_name, content_type, fs::metadata(path)?.len())?;

        Ok(Self::new(file_name, content_type, fs::read(path)?))
    }

    pub fn validate(&self) -> Result<()> {
        check(&self.file_name, &self.content_type, self.bytes.len() as u64)
    }
}

fn check(file_name: &str, content_type: &str, size: u64) -> Result<()> {
    if content_type != PDF_CONTENT_TYPE {
        return Err(ExtratoError::NotPdf {
            file: file_name.to_string(),
            content_type: content_type.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ExtratoError::FileTooLarge {
            file: file_name.to_string(),
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Error,
    Processing,
}

/// What the server reports after accepting a statement PDF
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadResponse {
    pub id: String,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "matricula", default)]
    pub registration: String,
    #[serde(rename = "mes", default)]
    pub month: String,
    #[serde(rename = "ano", default)]
    pub year: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    pub status: UploadStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result for one file of a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub file_name: String,
    pub result: Result<UploadResponse>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    AllSucceeded,
    Partial,
    AllFailed,
}

/// Per-file outcomes of a multi-file upload
#[derive(Debug, Default)]
pub struct BatchUploadReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchUploadReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn status(&self) -> BatchStatus {
        match (self.succeeded(), self.failed()) {
            (_, 0) => BatchStatus::AllSucceeded,
            (0, _) => BatchStatus::AllFailed,
            _ => BatchStatus::Partial,
        }
    }
}

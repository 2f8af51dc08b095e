mod client;
mod envelope;
mod transport;
mod upload;

pub use client::{ApiClient, DETAIL_BATCH_SIZE};
pub use envelope::{decode, ApiResponse};
pub use transport::{encode_multipart, MultipartFile, Transport, UreqTransport};
pub use upload::{
    BatchStatus, BatchUploadReport, FileOutcome, PdfUpload, UploadResponse, UploadStatus,
    MAX_UPLOAD_BYTES, PDF_CONTENT_TYPE, UPLOAD_FIELD,
};

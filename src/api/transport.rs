use std::time::Duration;

use ureq::Agent;

use crate::error::{ExtratoError, Result};

/// A file part for a `multipart/form-data` request
#[derive(Debug, Clone, Copy)]
pub struct MultipartFile<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Wire access used by [`ApiClient`](super::ApiClient).
///
/// Implementations return the raw response body of a 2xx response and map
/// everything else to an error.
pub trait Transport: Send + Sync {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String>;

    fn post_multipart(&self, path: &str, file: &MultipartFile<'_>) -> Result<String>;
}

/// Blocking HTTP transport on a `ureq` agent
pub struct UreqTransport {
    agent: Agent,
    base_url: String,
    attempts: u32,
}

impl UreqTransport {
    pub fn new(base_url: &str, timeout: Duration, attempts: u32) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            attempts: attempts.max(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run `send` up to `attempts` times while the failure is retryable.
    fn with_retries(&self, path: &str, send: impl Fn() -> Result<String>) -> Result<String> {
        let mut attempt = 1;
        loop {
            match send() {
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    log::warn!(
                        "{path}: attempt {attempt}/{} failed ({e}), retrying",
                        self.attempts
                    );
                    std::thread::sleep(Duration::from_millis(200 * attempt as u64));
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

fn read_response(path: &str, response: ureq::http::Response<ureq::Body>) -> Result<String> {
    let mut response = response;
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        return Err(ExtratoError::Status {
            status,
            path: path.to_string(),
        });
    }
    response
        .body_mut()
        .read_to_string()
        .map_err(|e| transport_error(path, e))
}

fn transport_error(path: &str, e: ureq::Error) -> ExtratoError {
    ExtratoError::Transport {
        path: path.to_string(),
        message: e.to_string(),
    }
}

impl Transport for UreqTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = self.url(path);
        self.with_retries(path, || {
            log::debug!("GET {url} {query:?}");
            let mut request = self.agent.get(&url);
            for (key, value) in query {
                request = request.query(*key, value);
            }
            let response = request.call().map_err(|e| transport_error(path, e))?;
            read_response(path, response)
        })
    }

    fn post_multipart(&self, path: &str, file: &MultipartFile<'_>) -> Result<String> {
        let url = self.url(path);
        let boundary = multipart_boundary();
        let body = encode_multipart(file, &boundary);
        let content_type = format!("multipart/form-data; boundary={boundary}");

        // Uploads are not idempotent: one attempt only.
        log::debug!("POST {url} ({} bytes, {})", file.bytes.len(), file.file_name);
        let response = self
            .agent
            .post(&url)
            .header("Content-Type", &content_type)
            .send(&body[..])
            .map_err(|e| transport_error(path, e))?;
        read_response(path, response)
    }
}

fn multipart_boundary() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    format!("----extratos-{nanos:x}")
}

/// Encode a single file part as a `multipart/form-data` body.
pub fn encode_multipart(file: &MultipartFile<'_>, boundary: &str) -> Vec<u8> {
    let file_name = file.file_name.replace('"', "%22");
    let mut body = Vec::with_capacity(file.bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            file.field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
    body.extend_from_slice(file.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

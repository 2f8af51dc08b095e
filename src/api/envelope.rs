use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ExtratoError, Result};

/// Standard `{ success, data, message?, errors? }` wrapper around every response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(ExtratoError::Rejected {
                message: self.rejection_message(),
            });
        }
        self.data.ok_or_else(|| ExtratoError::Rejected {
            message: self
                .message
                .unwrap_or_else(|| "response carried no data".to_string()),
        })
    }

    fn rejection_message(&self) -> String {
        let mut parts: Vec<String> = self.message.iter().cloned().collect();
        if let Some(errors) = &self.errors {
            for (field, messages) in errors {
                parts.push(format!("{field}: {}", messages.join(", ")));
            }
        }
        if parts.is_empty() {
            "request was not successful".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Decode an enveloped body and unwrap its `data`.
pub fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    let envelope: ApiResponse<T> =
        serde_json::from_str(body).map_err(|source| ExtratoError::Decode {
            path: path.to_string(),
            source,
        })?;
    envelope.into_data()
}

//! The `{success, data, error}` wrapper every dashboard endpoint responds with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Envelope shape used to salvage the server's message from error replies,
/// whatever `data` would have been.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, checking the success/data contract explicitly.
    pub fn into_result(self) -> Result<T, ApiError> {
        self.into_result_or(UNKNOWN_ERROR)
    }

    /// Like [`into_result`](Self::into_result), with `fallback` reported when
    /// a failed envelope carries no message.
    pub fn into_result_or(self, fallback: &str) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ApiError::MissingData),
            (false, _) => Err(ApiError::Envelope(
                self.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            )),
        }
    }
}

/// Every way a dashboard request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Envelope(String),

    #[error("response reported success but carried no data")]
    MissingData,

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The message a view should show for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } | ApiError::Envelope(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        value: u32,
    }

    fn decode(body: serde_json::Value) -> ApiEnvelope<Payload> {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_success_exposes_data() {
        let env = decode(json!({"success": true, "data": {"value": 7}}));
        assert_eq!(env.into_result().unwrap(), Payload { value: 7 });
    }

    #[test]
    fn test_failure_carries_server_message() {
        let env = decode(json!({"success": false, "error": "x"}));
        let err = env.into_result().unwrap_err();
        assert!(matches!(&err, ApiError::Envelope(m) if m == "x"));
        assert_eq!(err.to_string(), "x");
    }

    #[test]
    fn test_failure_without_message_uses_fallback() {
        let env = decode(json!({"success": false}));
        assert_eq!(env.into_result().unwrap_err().to_string(), UNKNOWN_ERROR);

        let env = decode(json!({"success": false, "error": ""}));
        assert_eq!(env.into_result().unwrap_err().to_string(), UNKNOWN_ERROR);
    }

    #[test]
    fn test_failure_without_message_uses_given_fallback() {
        let env = decode(json!({"success": false}));
        let err = env.into_result_or("Failed to fetch money flow data").unwrap_err();
        assert!(matches!(&err, ApiError::Envelope(m) if m == "Failed to fetch money flow data"));

        let env = decode(json!({"success": false, "error": "x"}));
        assert_eq!(env.into_result_or("fallback").unwrap_err().to_string(), "x");
    }

    #[test]
    fn test_success_without_data_is_distinct() {
        let env = decode(json!({"success": true}));
        assert!(matches!(env.into_result(), Err(ApiError::MissingData)));

        let env = decode(json!({"success": true, "data": null}));
        assert!(matches!(env.into_result(), Err(ApiError::MissingData)));
    }

    #[test]
    fn test_mistyped_data_is_a_decode_error() {
        let result: Result<ApiEnvelope<Payload>, _> =
            serde_json::from_value(json!({"success": true, "data": {"value": "seven"}}));
        let err: ApiError = result.unwrap_err().into();
        assert!(err.to_string().starts_with("failed to decode response"));
    }

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: 404,
            message: "Company not found".to_string(),
        };
        assert_eq!(err.to_string(), "Company not found (HTTP 404)");
        assert_eq!(err.user_message(), "Company not found");
    }
}

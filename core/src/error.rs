//! Error types for the Directus client.
//!
//! # Design
//! `NotFound`, `Unauthorized`, `Forbidden` and `RateLimited` get dedicated
//! variants because callers branch on them. Every other non-success response
//! lands in `Api` with the status code, the first message, and the full
//! list of error details Directus returned.
//!
//! Directus reports failures as `{"errors": [{"message": .., "extensions":
//! {"code": .., "field": ..}}]}`. When a body is not in that shape (proxies,
//! plain-text 502s) the raw body becomes the message.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::http::HttpResponse;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `build_*` and `parse_*` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL is empty or not an absolute URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// An item operation was built without a collection name.
    #[error("collection name is required")]
    MissingCollection,

    /// The server returned 401.
    #[error("authentication failed: {message}")]
    Unauthorized {
        message: String,
        errors: Vec<ErrorDetail>,
    },

    /// The server returned 403.
    #[error("permission denied: {message}")]
    Forbidden {
        message: String,
        errors: Vec<ErrorDetail>,
    },

    /// The server returned 404.
    #[error("resource not found: {message}")]
    NotFound {
        message: String,
        errors: Vec<ErrorDetail>,
    },

    /// The server returned 429. `retry_after` is in seconds when present.
    #[error("rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    /// The server returned any other non-success status.
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<ErrorDetail>,
    },

    /// A success envelope carried no `data`.
    #[error("no data returned")]
    MissingData,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `errors` entries of the response body, empty for errors that did
    /// not come from the API or whose body was not a Directus envelope.
    pub fn details(&self) -> &[ErrorDetail] {
        match self {
            ApiError::Unauthorized { errors, .. }
            | ApiError::Forbidden { errors, .. }
            | ApiError::NotFound { errors, .. }
            | ApiError::Api { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Map a non-success response to the matching variant.
    pub(crate) fn from_response(response: &HttpResponse) -> Self {
        let errors = ErrorEnvelope::parse(&response.body);
        let message = match errors.first() {
            Some(detail) => detail.message.clone(),
            None if response.body.trim().is_empty() => format!("HTTP {}", response.status),
            None => response.body.clone(),
        };

        match response.status {
            401 => ApiError::Unauthorized { message, errors },
            403 => ApiError::Forbidden { message, errors },
            404 => ApiError::NotFound { message, errors },
            429 => ApiError::RateLimited {
                retry_after: response
                    .header("retry-after")
                    .and_then(|v| v.trim().parse().ok()),
            },
            status => ApiError::Api {
                status,
                message,
                errors,
            },
        }
    }
}

/// One entry of the Directus `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(default)]
    pub extensions: ErrorExtensions,
}

impl ErrorDetail {
    pub fn code(&self) -> Option<&str> {
        self.extensions.code.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.extensions.field.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorExtensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Set on validation failures (`FAILED_VALIDATION`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    errors: Vec<ErrorDetail>,
}

impl ErrorEnvelope {
    fn parse(body: &str) -> Vec<ErrorDetail> {
        serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.errors)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn validation_errors_keep_field_details() {
        let body = r#"{"errors":[{"message":"Value is required","extensions":{"code":"FAILED_VALIDATION","field":"title","type":"required"}}]}"#;
        let err = ApiError::from_response(&response(400, body));
        match &err {
            ApiError::Api { status, message, errors } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "Value is required");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].code(), Some("FAILED_VALIDATION"));
                assert_eq!(errors[0].field(), Some("title"));
                assert_eq!(errors[0].extensions.extra["type"], "required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "API error 400: Value is required");
    }

    #[test]
    fn status_specific_variants() {
        let forbidden = r#"{"errors":[{"message":"You don't have permission to access this.","extensions":{"code":"FORBIDDEN"}}]}"#;
        assert!(matches!(
            ApiError::from_response(&response(403, forbidden)),
            ApiError::Forbidden { .. }
        ));
        assert!(matches!(
            ApiError::from_response(&response(401, "")),
            ApiError::Unauthorized { .. }
        ));
        assert!(matches!(
            ApiError::from_response(&response(404, "")),
            ApiError::NotFound { .. }
        ));
    }

    #[test]
    fn status_specific_variants_keep_details() {
        let body = r#"{"errors":[{"message":"Invalid user credentials.","extensions":{"code":"INVALID_CREDENTIALS"}}]}"#;
        let err = ApiError::from_response(&response(401, body));
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.details().len(), 1);
        assert_eq!(err.details()[0].code(), Some("INVALID_CREDENTIALS"));

        let body = r#"{"errors":[{"message":"Item not found","extensions":{"code":"NOT_FOUND"}}]}"#;
        let err = ApiError::from_response(&response(404, body));
        assert_eq!(err.details()[0].code(), Some("NOT_FOUND"));
        assert_eq!(err.to_string(), "resource not found: Item not found");
    }

    #[test]
    fn plain_text_body_becomes_message() {
        let err = ApiError::from_response(&response(502, "bad gateway"));
        assert!(matches!(err, ApiError::Api { status: 502, ref message, .. } if message == "bad gateway"));
        assert!(err.details().is_empty());
    }

    #[test]
    fn empty_body_message_names_status() {
        let err = ApiError::from_response(&response(500, ""));
        assert_eq!(err.to_string(), "API error 500: HTTP 500");
    }

    #[test]
    fn rate_limit_reads_retry_after() {
        let mut resp = response(429, "");
        resp.headers.push(("Retry-After".to_string(), "30".to_string()));
        let err = ApiError::from_response(&resp);
        assert!(matches!(err, ApiError::RateLimited { retry_after: Some(30) }));
        assert_eq!(err.status(), Some(429));
    }
}

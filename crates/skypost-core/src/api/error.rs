use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("XRPC error (status {status}): {error}: {message}")]
    Xrpc {
        status: u16,
        error: String,
        message: String,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Error body returned by XRPC endpoints.
#[derive(Debug, Deserialize)]
struct XrpcErrorBody {
    error: String,
    #[serde(default)]
    message: Option<String>,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Map a non-success response to an error.
    ///
    /// Bodies in the XRPC error shape (`{"error": "...", "message": "..."}`)
    /// keep their error name, except for 429 which is always `RateLimited`.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status.as_u16() != 429 {
            if let Ok(xrpc) = serde_json::from_str::<XrpcErrorBody>(body) {
                return ApiError::Xrpc {
                    status: status.as_u16(),
                    error: xrpc.error,
                    message: Self::truncate_body(&xrpc.message.unwrap_or_default()),
                };
            }
        }

        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// The XRPC error name, if the server sent one (e.g. `ExpiredToken`).
    pub fn xrpc_error(&self) -> Option<&str> {
        match self {
            ApiError::Xrpc { error, .. } => Some(error),
            _ => None,
        }
    }
}

//! Error types for the preview service.
//!
//! Upstream failures are collected into [`FetchError`] by the strategies and
//! the compositor. The HTTP layer only ever sees [`PreviewError`], which hides
//! the cause behind a generic message and logs it instead.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failure reaching or decoding an external source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The status code received.
        status: reqwest::StatusCode,
    },

    /// The upstream payload could not be interpreted.
    #[error("unexpected response from {url}: {reason}")]
    Decode {
        /// The requested URL.
        url: String,
        /// What was wrong with the payload.
        reason: String,
    },
}

/// Link preview resolution error.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The `url` parameter was absent or empty.
    #[error("URL is required")]
    MissingInput,

    /// The query string could not be decoded (e.g. a repeated `url`).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The chosen strategy failed to fetch or parse its source.
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[from] FetchError),
}

/// OG image composition error.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// The slug cannot be used as a file name.
    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),

    /// The logo could not be fetched.
    #[error("logo fetch failed: {0}")]
    UpstreamFetch(#[from] FetchError),

    /// Decoding the logo or overlay, or encoding the PNG, failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Creating the image directory or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingInput => (StatusCode::BAD_REQUEST, "URL is required"),
            Self::InvalidQuery(reason) => {
                tracing::debug!(reason = %reason, "rejected link preview query");
                (StatusCode::BAD_REQUEST, "Invalid query string")
            }
            Self::UpstreamFetch(err) => {
                tracing::error!(error = %err, "link preview fetch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch link preview",
                )
            }
        };

        let body = ErrorResponse {
            error: message.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> FetchError {
        FetchError::Decode {
            url: "https://example.com".to_string(),
            reason: "not json".to_string(),
        }
    }

    #[test]
    fn error_display_missing_input() {
        assert_eq!(PreviewError::MissingInput.to_string(), "URL is required");
    }

    #[test]
    fn error_display_status() {
        let err = FetchError::Status {
            url: "https://example.com/a".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/a"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn error_display_upstream_wraps_cause() {
        let err = PreviewError::from(decode_error());
        assert!(err.to_string().contains("not json"));
    }

    #[test]
    fn error_display_invalid_slug() {
        let err = ComposeError::InvalidSlug("../etc".to_string());
        assert_eq!(err.to_string(), "invalid slug: \"../etc\"");
    }

    #[test]
    fn error_into_response_missing_input() {
        let response = PreviewError::MissingInput.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_into_response_invalid_query() {
        let response =
            PreviewError::InvalidQuery("duplicate field `url`".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_into_response_upstream() {
        let response = PreviewError::UpstreamFetch(decode_error()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn error_body_hides_cause() {
        let response = PreviewError::UpstreamFetch(decode_error()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Failed to fetch link preview");
        assert!(!bytes.windows(8).any(|w| w == b"not json"));
    }
}

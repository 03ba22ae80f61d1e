//! Error types for the web crate.

use crate::pages;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use stockroom_store::{SessionError, StoreError};
use thiserror::Error;

/// Errors a handler or middleware can end a request with.
///
/// The response never carries the underlying error text.
#[derive(Debug, Error)]
pub enum WebError {
    /// Failed to start the server.
    #[error("failed to start server: {0}")]
    StartupFailed(String),

    /// The caller's role is not allowed here.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// The relational store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session backend failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Html(pages::access_denied_page(message))).into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_store_errors_do_not_leak() {
        let err = WebError::Store(StoreError::PasswordHash("salt table at /srv/secret".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_forbidden_renders_message() {
        let response = WebError::Forbidden("Access Denied: nope").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Access Denied: nope"));
    }
}

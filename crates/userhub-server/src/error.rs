//! Transport error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;
use userhub_core::error::UserHubError;

/// JSON error body.
///
/// `messages` is only present for validation failures, which can carry
/// more than one field message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body could not be decoded.
    #[error("Bad Request")]
    BadRequest,

    /// No usable bearer token in the request.
    #[error("{0}")]
    MissingToken(&'static str),

    /// Failure of the login flow; bad credentials are a client error.
    #[error(transparent)]
    Login(UserHubError),

    #[error(transparent)]
    Service(#[from] UserHubError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::MissingToken(_) => StatusCode::FORBIDDEN,
            ApiError::Login(
                UserHubError::AuthenticationFailed { .. } | UserHubError::NotFound { .. },
            ) => StatusCode::BAD_REQUEST,
            ApiError::Login(err) | ApiError::Service(err) => match err {
                UserHubError::Validation { .. } => StatusCode::BAD_REQUEST,
                UserHubError::Conflict { .. } => StatusCode::CONFLICT,
                UserHubError::AuthenticationFailed { .. } => StatusCode::FORBIDDEN,
                UserHubError::NotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::BadRequest | ApiError::MissingToken(_) => ErrorBody {
                message: self.to_string(),
                messages: None,
            },
            ApiError::Login(err) | ApiError::Service(err) => {
                let messages = err.messages();
                ErrorBody {
                    message: messages.join("; "),
                    messages: matches!(err, UserHubError::Validation { .. }).then_some(messages),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Login(err) | ApiError::Service(err) = &self {
            if err.is_internal() {
                error!(error = %err, "Request failed");
            }
        }
        (self.status_code(), Json(self.body())).into_response()
    }
}

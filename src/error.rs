use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::oauth::OAuthError;

/// Every failure a handler can return. Display is the client-facing message;
/// sources carry the details that only go to the log.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing code")]
    MissingCode,

    #[error("Failed to get access token")]
    TokenExchange(#[source] OAuthError),

    #[error("Failed to fetch user info")]
    ProfileFetch(#[source] OAuthError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Failed to get session")]
    SessionLoad(#[source] anyhow::Error),

    #[error("Failed to save session")]
    SessionPersist(#[source] anyhow::Error),

    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn store(context: &'static str, source: anyhow::Error) -> Self {
        Self::Store { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCode => StatusCode::BAD_REQUEST,
            AppError::TokenExchange(_) | AppError::ProfileFetch(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::SessionLoad(_) | AppError::SessionPersist(_) | AppError::Store { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match std::error::Error::source(&self) {
            Some(src) => format!("{self}: {src:#}"),
            None => self.to_string(),
        };
        if status.is_server_error() {
            error!(%status, error = %detail, "request failed");
        } else {
            warn!(%status, error = %detail, "request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

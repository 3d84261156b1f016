use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use tal_registry::RegistryError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Request body missing, not JSON, or not a valid profile submission.
    #[error("invalid request body: {message}")]
    InvalidBody { status: u16, message: String },

    #[error("invalid caller id: {0}")]
    InvalidCallerId(#[from] tal_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] tal_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Numeric code reported to clients; registry errors keep their own codes.
    pub fn code(&self) -> u32 {
        match self {
            Self::Registry(e) => e.code(),
            Self::AuthFailed(_) => 401,
            Self::InvalidBody { status, .. } => u32::from(*status),
            Self::InvalidCallerId(_) => 400,
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => 500,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = u16::try_from(self.code())
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(json!({ "code": self.code(), "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use tal_registry::CallerContext;
use tal_types::{CallerId, IdentityMaterial};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Read `Authorization: Bearer <token>` from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Self::Bearer(token.to_string()))
            .unwrap_or(Self::Anonymous)
    }
}

/// Turns request credentials into the caller a write is performed for.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<CallerContext>;
}

/// Derives the caller id from the bearer token itself.
///
/// The token is the caller's secret; whoever presents it acts as the
/// identity `CallerId::derive(Token(token))`.
pub struct BearerTokenAuth;

#[async_trait]
impl AuthProvider for BearerTokenAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<CallerContext> {
        match credentials {
            Credentials::Bearer(token) => Ok(CallerContext::authenticated(CallerId::derive(
                &IdentityMaterial::Token(token.clone()),
            ))),
            Credentials::Anonymous => Err(ServerError::AuthFailed(
                "bearer token required".into(),
            )),
        }
    }
}

use std::sync::Arc;

use tokio::net::TcpListener;

use tal_registry::TalentRegistry;

use crate::auth::{AuthProvider, BearerTokenAuth};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Talent Ledger HTTP server.
pub struct TalServer {
    config: ServerConfig,
    state: AppState,
}

impl TalServer {
    /// Open the configured store and authenticate callers by bearer token.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let store = config.store.open()?;
        let registry = Arc::new(TalentRegistry::new(store));
        Ok(Self::new(config, registry, Arc::new(BearerTokenAuth)))
    }

    pub fn new(
        config: ServerConfig,
        registry: Arc<TalentRegistry>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            state: AppState::new(registry, auth),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(store = ?self.config.store, "talent ledger listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use tal_registry::TalentRegistry;

use crate::auth::AuthProvider;
use crate::handler;

/// Shared state of every request handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<TalentRegistry>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(registry: Arc<TalentRegistry>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { registry, auth }
    }
}

/// Build the axum router with all Talent Ledger endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/whoami", get(handler::whoami_handler))
        .route(
            "/v1/profile",
            axum::routing::post(handler::create_handler).put(handler::modify_handler),
        )
        .route("/v1/talents/:id", get(handler::record_handler))
        .route("/v1/talents/:id/identifier", get(handler::identifier_handler))
        .route("/v1/talents/:id/region", get(handler::region_handler))
        .route("/v1/talents/:id/expertise", get(handler::expertise_handler))
        .route("/v1/talents/:id/capacity", get(handler::capacity_handler))
        .route(
            "/v1/talents/:id/expertise/count",
            get(handler::count_expertise_handler),
        )
        .route(
            "/v1/talents/:id/expertise/nonempty",
            get(handler::expertise_nonempty_handler),
        )
        .route("/v1/talents/:id/exists", get(handler::exists_handler))
        .route("/v1/talents/:id/status", get(handler::status_handler))
        .route("/v1/talents/:id/summary", get(handler::summary_handler))
        .route(
            "/v1/talents/:id/region-expertise",
            get(handler::region_expertise_handler),
        )
        .route("/v1/talents/:id/profile", get(handler::full_profile_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

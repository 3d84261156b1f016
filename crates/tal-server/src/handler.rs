use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Serialize;
use serde_json::{json, Value};

use tal_registry::{CallerContext, Confirmation, RegistryResult, TalentRegistry};
use tal_types::{
    CallerId, ExpertiseAreas, FullProfile, ProfileSubmission, ProfileSummary, Record,
    RegionExpertise,
};

use crate::auth::Credentials;
use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

/// Body returned by successful writes.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub message: &'static str,
    pub caller: CallerId,
}

impl WriteResponse {
    fn new(confirmation: Confirmation, ctx: &CallerContext) -> Self {
        Self {
            message: confirmation.message(),
            caller: ctx.caller().clone(),
        }
    }
}

async fn caller(state: &AppState, headers: &HeaderMap) -> ServerResult<CallerContext> {
    state
        .auth
        .authenticate(&Credentials::from_headers(headers))
        .await
}

fn parse_id(id: &str) -> ServerResult<CallerId> {
    Ok(CallerId::from_hex(id)?)
}

/// Run a registry operation on the blocking pool; file-backed stores lock,
/// fsync and rename on every call.
async fn run<T, F>(state: &AppState, op: F) -> ServerResult<T>
where
    F: FnOnce(&TalentRegistry) -> RegistryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let registry = Arc::clone(&state.registry);
    tokio::task::spawn_blocking(move || op(&registry))
        .await
        .map_err(|e| ServerError::Internal(format!("registry task failed: {e}")))?
        .map_err(ServerError::from)
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": "tal-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn whoami_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServerResult<Json<Value>> {
    let ctx = caller(&state, &headers).await?;
    Ok(Json(json!({ "caller": ctx.caller() })))
}

// ---- Writes ----

pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ProfileSubmission>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<WriteResponse>)> {
    let ctx = caller(&state, &headers).await?;
    let Json(submission) = body?;
    let write_ctx = ctx.clone();
    let confirmation = run(&state, move |r| r.create(&write_ctx, submission)).await?;
    Ok((StatusCode::CREATED, Json(WriteResponse::new(confirmation, &ctx))))
}

pub async fn modify_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ProfileSubmission>, JsonRejection>,
) -> ServerResult<Json<WriteResponse>> {
    let ctx = caller(&state, &headers).await?;
    let Json(submission) = body?;
    let write_ctx = ctx.clone();
    let confirmation = run(&state, move |r| r.modify(&write_ctx, submission)).await?;
    Ok(Json(WriteResponse::new(confirmation, &ctx)))
}

// ---- Reads ----

pub async fn record_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Record>> {
    let id = parse_id(&id)?;
    Ok(Json(run(&state, move |r| r.fetch_record(&id)).await?))
}

pub async fn identifier_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    let identifier = run(&state, move |r| r.fetch_identifier(&id)).await?;
    Ok(Json(json!({ "identifier": identifier })))
}

pub async fn region_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    let region = run(&state, move |r| r.fetch_region(&id)).await?;
    Ok(Json(json!({ "region": region })))
}

pub async fn expertise_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<ExpertiseAreas>> {
    let id = parse_id(&id)?;
    Ok(Json(run(&state, move |r| r.fetch_expertise(&id)).await?))
}

pub async fn capacity_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    let capacity = run(&state, move |r| r.fetch_capacity(&id)).await?;
    Ok(Json(json!({ "capacity": capacity })))
}

pub async fn count_expertise_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    let count = run(&state, move |r| r.count_expertise(&id)).await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn expertise_nonempty_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    let nonempty = run(&state, move |r| r.validate_expertise_nonempty(&id)).await?;
    Ok(Json(json!({ "nonempty": nonempty })))
}

pub async fn exists_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    let exists = run(&state, move |r| r.exists(&id)).await?;
    Ok(Json(json!({ "exists": exists })))
}

pub async fn status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    let status = run(&state, move |r| r.registration_status(&id)).await?;
    Ok(Json(json!({ "status": status.as_str() })))
}

pub async fn summary_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<ProfileSummary>> {
    let id = parse_id(&id)?;
    Ok(Json(run(&state, move |r| r.summary(&id)).await?))
}

pub async fn region_expertise_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<RegionExpertise>> {
    let id = parse_id(&id)?;
    Ok(Json(run(&state, move |r| r.region_and_expertise(&id)).await?))
}

pub async fn full_profile_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<FullProfile>> {
    let id = parse_id(&id)?;
    Ok(Json(run(&state, move |r| r.full_profile(&id)).await?))
}

//! HTTP server for the Talent Ledger.
//!
//! Acts as the execution environment of the registry: it authenticates the
//! caller of every write from a bearer token, hands the resulting
//! [`CallerContext`](tal_registry::CallerContext) to the registry, and serves
//! the read views publicly by caller id.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use auth::{AuthProvider, BearerTokenAuth, Credentials};
pub use config::{ServerConfig, StoreConfig};
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::TalServer;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use tal_registry::TalentRegistry;
    use tal_store::InMemoryTalentStore;
    use tal_types::{CallerId, IdentityMaterial};

    use super::*;

    fn app() -> Router {
        let registry = Arc::new(TalentRegistry::new(Arc::new(InMemoryTalentStore::new())));
        build_router(AppState::new(registry, Arc::new(BearerTokenAuth)))
    }

    fn id_for(token: &str) -> String {
        CallerId::derive(&IdentityMaterial::Token(token.into())).to_hex()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn write(method: Method, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri("/v1/profile")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn profile(id: &str, region: &str, areas: &[&str], cap: u64) -> Value {
        json!({
            "personal_identifier": id,
            "base_region": region,
            "expertise_areas": areas,
            "weekly_capacity": cap,
        })
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send(&app(), get("/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn whoami_reports_token_identity() {
        let app = app();
        let request = Request::builder()
            .uri("/v1/whoami")
            .header(header::AUTHORIZATION, "Bearer tok-a")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["caller"], id_for("tok-a"));
    }

    #[tokio::test]
    async fn create_requires_bearer_token() {
        let app = app();
        let (status, body) =
            send(&app, write(Method::POST, None, profile("A", "R", &["x"], 1))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 401);
    }

    #[tokio::test]
    async fn create_then_read_every_view() {
        let app = app();
        let (status, body) = send(
            &app,
            write(Method::POST, Some("tok-a"), profile("Ada", "London", &["math", "logic"], 12)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Talent profile registered");
        assert_eq!(body["caller"], id_for("tok-a"));

        let id = id_for("tok-a");
        let base = format!("/v1/talents/{id}");

        let (status, body) = send(&app, get(&base)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, profile("Ada", "London", &["math", "logic"], 12));

        let (_, body) = send(&app, get(&format!("{base}/identifier"))).await;
        assert_eq!(body["identifier"], "Ada");
        let (_, body) = send(&app, get(&format!("{base}/region"))).await;
        assert_eq!(body["region"], "London");
        let (_, body) = send(&app, get(&format!("{base}/expertise"))).await;
        assert_eq!(body, json!(["math", "logic"]));
        let (_, body) = send(&app, get(&format!("{base}/capacity"))).await;
        assert_eq!(body["capacity"], 12);
        let (_, body) = send(&app, get(&format!("{base}/expertise/count"))).await;
        assert_eq!(body["count"], 2);
        let (_, body) = send(&app, get(&format!("{base}/expertise/nonempty"))).await;
        assert_eq!(body["nonempty"], true);
        let (_, body) = send(&app, get(&format!("{base}/exists"))).await;
        assert_eq!(body["exists"], true);
        let (_, body) = send(&app, get(&format!("{base}/status"))).await;
        assert_eq!(body["status"], "Registered");
        let (_, body) = send(&app, get(&format!("{base}/summary"))).await;
        assert_eq!(
            body,
            json!({ "identifier": "Ada", "region": "London", "expertise_count": 2 })
        );
        let (_, body) = send(&app, get(&format!("{base}/region-expertise"))).await;
        assert_eq!(body, json!({ "region": "London", "expertise": ["math", "logic"] }));
        let (_, body) = send(&app, get(&format!("{base}/profile"))).await;
        assert_eq!(
            body,
            json!({
                "identifier": "Ada",
                "region": "London",
                "expertise": ["math", "logic"],
                "capacity": 12,
            })
        );
    }

    #[tokio::test]
    async fn write_errors_carry_registry_codes() {
        let app = app();

        let (status, body) =
            send(&app, write(Method::PUT, Some("tok-b"), profile("B", "R", &["x"], 1))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);

        let (status, body) =
            send(&app, write(Method::POST, Some("tok-b"), profile("B", "R", &["x"], 0))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);

        let (status, _) =
            send(&app, write(Method::POST, Some("tok-b"), profile("B", "R", &["x"], 1))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) =
            send(&app, write(Method::POST, Some("tok-b"), profile("B", "R", &["x"], 1))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 409);

        let (status, body) =
            send(&app, write(Method::PUT, Some("tok-b"), profile("B2", "R2", &["y"], 2))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Talent profile updated");
    }

    #[tokio::test]
    async fn modify_only_touches_the_token_holders_record() {
        let app = app();
        send(&app, write(Method::POST, Some("tok-a"), profile("A", "R", &["x"], 1))).await;
        send(&app, write(Method::POST, Some("tok-b"), profile("B", "S", &["y"], 2))).await;
        send(&app, write(Method::PUT, Some("tok-b"), profile("B2", "S2", &["z"], 3))).await;

        let (_, body) = send(&app, get(&format!("/v1/talents/{}/identifier", id_for("tok-a")))).await;
        assert_eq!(body["identifier"], "A");
    }

    #[tokio::test]
    async fn oversized_fields_are_rejected_before_the_registry() {
        let app = app();
        let long = "x".repeat(101);
        let (status, body) = send(
            &app,
            write(Method::POST, Some("tok-c"), profile(&long, "R", &["x"], 1)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], 422);
        assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));

        let too_many: Vec<String> = (0..11).map(|i| format!("s{i}")).collect();
        let too_many: Vec<&str> = too_many.iter().map(String::as_str).collect();
        let (status, body) = send(
            &app,
            write(Method::POST, Some("tok-c"), profile("C", "R", &too_many, 1)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], 422);

        let (_, body) = send(&app, get(&format!("/v1/talents/{}/exists", id_for("tok-c")))).await;
        assert_eq!(body["exists"], false);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn file_backed_registry_serves_writes_and_reads() {
        let dir = tempfile::tempdir().unwrap();
        let store = StoreConfig::File {
            path: dir.path().join("registry.json"),
        }
        .open()
        .unwrap();
        let app = build_router(AppState::new(
            Arc::new(TalentRegistry::new(store)),
            Arc::new(BearerTokenAuth),
        ));

        let (status, _) = send(
            &app,
            write(Method::POST, Some("tok-f"), profile("F", "Lima", &["qa"], 6)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            write(Method::POST, Some("tok-f"), profile("F2", "Lima", &["qa"], 6)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 409);

        let (_, body) = send(&app, get(&format!("/v1/talents/{}/capacity", id_for("tok-f")))).await;
        assert_eq!(body["capacity"], 6);
        assert!(dir.path().join("registry.json").exists());
    }

    #[tokio::test]
    async fn malformed_json_keeps_the_error_shape() {
        let app = app();
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/v1/profile")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, "Bearer tok-d")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn unregistered_reads() {
        let app = app();
        let id = id_for("nobody");

        let (status, body) = send(&app, get(&format!("/v1/talents/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);

        let (status, body) = send(&app, get(&format!("/v1/talents/{id}/status"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Not Registered");

        let (_, body) = send(&app, get(&format!("/v1/talents/{id}/exists"))).await;
        assert_eq!(body["exists"], false);
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let (status, body) = send(&app(), get("/v1/talents/not-hex/summary")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }
}

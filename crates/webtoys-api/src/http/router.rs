//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let tool_routes = Router::new()
        .route(
            "/build_webtoys_app",
            post(handlers::tools::build_webtoys_app),
        )
        .route("/get_info", get(handlers::tools::get_info));

    Router::new()
        .nest("/tools", tool_routes)
        .route("/mcp", post(handlers::mcp::handle))
        .route("/health", get(handlers::health::health))
        .fallback(handlers::health::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::body::Body;
    use axum::extract::Query;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use secrecy::SecretString;
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    use webtoys_types::config::RelayConfig;

    use crate::config::LoadedConfig;

    // --- Downstream mock ---

    /// Spawn a fake downstream: the store answers with a published row for
    /// whatever sender it is asked about, dated after any poll window. The
    /// webhook route only exists when `webhook_up` is set, so axum answers 404
    /// otherwise.
    async fn spawn_downstream(webhook_up: bool) -> String {
        let mut app = Router::new().route(
            "/rest/v1/wtaf_content",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let sender = q["sender_phone"].trim_start_matches("eq.").to_string();
                axum::Json(json!([{
                    "app_slug": "neon-snake",
                    "user_slug": "bart",
                    "created_at": "2100-01-01T00:00:00Z",
                    "type": "game",
                    "sender_phone": sender,
                    "status": "published",
                }]))
            }),
        );
        if webhook_up {
            app = app.route("/dev/webhook", post(|| async { StatusCode::OK }));
        }

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn test_state(downstream: &str) -> AppState {
        let mut relay = RelayConfig::default();
        relay.downstream.webhook_base_url = downstream.to_string();
        relay.downstream.store_base_url = downstream.to_string();
        relay.poll.initial_delay_ms = 10;
        relay.poll.interval_ms = 10;
        relay.poll.max_wait_ms = 500;

        AppState::init(LoadedConfig {
            relay,
            store_key: Some(SecretString::from("test-key")),
            source: None,
        })
        .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    // --- Direct tools ---

    #[tokio::test]
    async fn test_health() {
        let router = build_router(test_state("http://127.0.0.1:9"));
        let (status, body) = send(router, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_get_info_is_byte_identical() {
        let router = build_router(test_state("http://127.0.0.1:9"));
        let (s1, first) = send(router.clone(), get_req("/tools/get_info")).await;
        let (s2, second) = send(router, get_req("/tools/get_info")).await;

        assert_eq!(s1, StatusCode::OK);
        assert_eq!(s2, StatusCode::OK);
        assert_eq!(first, second);
        let json: Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(json["server_name"], "Webtoys Builder MCP");
        assert_eq!(json["website"], "https://webtoys.ai");
    }

    #[tokio::test]
    async fn test_build_returns_artifact_url() {
        let downstream = spawn_downstream(true).await;
        let router = build_router(test_state(&downstream));

        let (status, body) = send(
            router,
            post_json(
                "/tools/build_webtoys_app",
                json!({ "description": "build a snake game", "user_id": "alice" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["appUrl"], "https://webtoys.ai/bart/neon-snake");
        assert_eq!(json["appType"], "game");
    }

    #[tokio::test]
    async fn test_build_without_trigger_keyword_is_processed() {
        let downstream = spawn_downstream(true).await;
        let router = build_router(test_state(&downstream));

        let (status, body) = send(
            router,
            post_json("/tools/build_webtoys_app", json!({ "description": "hello" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["appUrl"].is_null());
        assert_eq!(json["message"], "command processed");
    }

    #[tokio::test]
    async fn test_build_reports_missing_bot() {
        let downstream = spawn_downstream(false).await;
        let router = build_router(test_state(&downstream));

        let (status, body) = send(
            router,
            post_json("/tools/build_webtoys_app", json!({ "description": "an app" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["appUrl"].is_null());
        assert_eq!(json["error"], "SMS bot not found");
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let router = build_router(test_state("http://127.0.0.1:9"));

        let (status, body) = send(
            router,
            post_json("/tools/build_webtoys_app", json!({ "user_id": "alice" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let router = build_router(test_state("http://127.0.0.1:9"));
        let (status, body) = send(router, get_req("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"][0]["code"], "NOT_FOUND");
    }

    // --- MCP ---

    async fn rpc(router: Router, body: Value) -> Value {
        let (status, bytes) = send(router, post_json("/mcp", body)).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_mcp_initialize_and_list() {
        let router = build_router(test_state("http://127.0.0.1:9"));

        let init = rpc(
            router.clone(),
            json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
        )
        .await;
        assert_eq!(init["id"], 1);
        assert!(init["result"]["capabilities"]["tools"].is_object());

        let list = rpc(
            router,
            json!({ "jsonrpc": "2.0", "id": "two", "method": "tools/list" }),
        )
        .await;
        assert_eq!(list["id"], "two");
        assert_eq!(list["result"]["tools"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mcp_notification_is_accepted() {
        let router = build_router(test_state("http://127.0.0.1:9"));
        let (status, body) = send(
            router,
            post_json(
                "/mcp",
                json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_mcp_call_get_info() {
        let router = build_router(test_state("http://127.0.0.1:9"));
        let resp = rpc(
            router,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "tools/call",
                "params": { "name": "get_info", "arguments": {} }
            }),
        )
        .await;

        let structured = &resp["result"]["structuredContent"];
        assert_eq!(structured["server_name"], "Webtoys Builder MCP");
        assert_eq!(resp["result"]["isError"], false);
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        assert_eq!(serde_json::from_str::<Value>(text).unwrap(), *structured);
    }

    #[tokio::test]
    async fn test_mcp_call_build() {
        let downstream = spawn_downstream(true).await;
        let router = build_router(test_state(&downstream));
        let resp = rpc(
            router,
            json!({
                "jsonrpc": "2.0",
                "id": 8,
                "method": "tools/call",
                "params": {
                    "name": "build_webtoys_app",
                    "arguments": { "description": "make a meme", "user_id": "bob" }
                }
            }),
        )
        .await;

        let structured = &resp["result"]["structuredContent"];
        assert_eq!(structured["success"], true);
        assert_eq!(structured["appUrl"], "https://webtoys.ai/bart/neon-snake");
    }

    #[tokio::test]
    async fn test_mcp_errors() {
        let router = build_router(test_state("http://127.0.0.1:9"));

        let unknown = rpc(
            router.clone(),
            json!({ "jsonrpc": "2.0", "id": 1, "method": "resources/list" }),
        )
        .await;
        assert_eq!(unknown["error"]["code"], -32601);

        let bad_tool = rpc(
            router.clone(),
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": { "name": "delete_everything" }
            }),
        )
        .await;
        assert_eq!(bad_tool["error"]["code"], -32602);

        let missing_arg = rpc(
            router.clone(),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": { "name": "build_webtoys_app", "arguments": {} }
            }),
        )
        .await;
        assert_eq!(missing_arg["error"]["code"], -32602);

        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, bytes) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        let parse: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parse["error"]["code"], -32700);
        assert!(parse["id"].is_null());
    }
}

// Stub DeuceLeague backend for transport tests.

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

use crate::client::ApiClient;
use crate::interceptor::Interceptor;

fn router() -> Router {
    Router::new()
        // Named paginated collection
        .route(
            "/api/leagues",
            get(|| async {
                (
                    [("x-total-count", "2")],
                    Json(json!({
                        "leagues": [{ "id": "l1", "name": "Deuce KL" }, { "id": "l2", "name": "Deuce PJ" }],
                        "pagination": { "page": 1, "limit": 20, "total": 2, "totalPages": 1 }
                    })),
                )
            })
            .post(|Json(body): Json<Value>| async move {
                (
                    StatusCode::CREATED,
                    Json(json!({ "success": true, "status": 201, "data": body, "message": "League created" })),
                )
            }),
        )
        // Inline pagination
        .route(
            "/api/players",
            get(|| async {
                Json(json!({ "players": [{ "id": "p1" }, { "id": "p2" }], "total": 2 }))
            }),
        )
        // Triple-nested pagination
        .route(
            "/api/matches",
            get(|| async {
                Json(json!({
                    "success": true,
                    "data": {
                        "data": [{ "id": "m1" }],
                        "pagination": { "page": "1", "limit": "10", "total": "1", "totalPages": "1" }
                    },
                    "message": "Matches fetched"
                }))
            }),
        )
        // Raw records
        .route(
            "/api/seasons/{id}",
            get(|Path(id): Path<String>| async move {
                Json(json!({ "id": id, "name": "Spring 2026" }))
            })
            .put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                let mut record = json!({ "id": id });
                if let (Some(record), Value::Object(fields)) = (record.as_object_mut(), body) {
                    record.extend(fields);
                }
                Json(json!({ "success": true, "data": record }))
            }),
        )
        .route(
            "/api/sponsors/{id}",
            axum::routing::delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/api/disputes/{id}",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))) }),
        )
        .route(
            "/api/payments",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "success": false, "message": "Amount required", "data": { "field": "amount" } })),
                )
            }),
        )
        .route(
            "/api/broken",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream   unavailable\n<html></html>") }),
        )
        .route(
            "/api/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "success": true, "data": null }))
            }),
        )
        .route("/api/text", get(|| async { "pong" }))
}

/// Serves the stub backend on an ephemeral port.
pub async fn spawn_backend() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router()).await.expect("serve test backend");
    });
    addr
}

pub fn client_for(addr: SocketAddr) -> ApiClient {
    let base_url = Url::parse(&format!("http://{}", addr)).expect("test base url");
    ApiClient::with_http(reqwest::Client::new(), base_url, "/api", Interceptor::new(true))
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    addr
}

//! In-process stand-in for the reqres.in API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

const TIMESTAMP: &str = "2026-01-01T00:00:00.000Z";

/// Starts the stub on an ephemeral port and returns its address.
pub async fn spawn() -> SocketAddr {
    let app = Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/unknown", get(list_resources))
        .route("/api/status/{code}", get(status))
        .route("/api/login", axum::routing::post(login))
        .route("/api/slow", get(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    addr
}

async fn list_users(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u64 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    Json(json!({
        "page": page,
        "per_page": 6,
        "total": 12,
        "data": [{ "id": page * 6 + 1, "email": "michael.lawson@reqres.in" }]
    }))
}

async fn get_user(Path(id): Path<u64>) -> Json<Value> {
    Json(json!({
        "data": { "id": id, "email": "janet.weaver@reqres.in", "first_name": "Janet" },
        "support": { "url": "https://reqres.in/#support-heading" }
    }))
}

async fn create_user(Json(mut body): Json<Value>) -> (StatusCode, Json<Value>) {
    if let Some(object) = body.as_object_mut() {
        object.insert("id".to_string(), json!("734"));
        object.insert("createdAt".to_string(), json!(TIMESTAMP));
    }
    (StatusCode::CREATED, Json(body))
}

async fn update_user(Path(_id): Path<u64>, Json(mut body): Json<Value>) -> Json<Value> {
    if let Some(object) = body.as_object_mut() {
        object.insert("updatedAt".to_string(), json!(TIMESTAMP));
    }
    Json(body)
}

async fn delete_user(Path(_id): Path<u64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn list_resources() -> Json<Value> {
    Json(json!({ "page": 1, "data": [{ "id": 1, "name": "cerulean" }] }))
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("password").is_some() {
        (StatusCode::OK, Json(json!({ "token": "QpwL5tke4Pnpja7X4" })))
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": "Missing password" })))
    }
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({}))
}

//! Router-level tests for the dev server
//!
//! Tests cover:
//! - Create/list/update/delete round trip
//! - Server-side validation and duplicate rejection
//! - Atomic batch creation
//! - CSRF enforcement

use anyhow::Result;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use opcsim_dev_server::{create_router, AppState, NodeStore};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Test helper: send one request and decode the JSON answer
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("X-CSRFToken", token);
    }
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body)?).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

fn app(csrf_token: Option<&str>) -> Router {
    create_router(AppState::new(
        NodeStore::default(),
        csrf_token.map(str::to_string),
    ))
}

const NODES: &str = "/api/nodes/";
const BATCH: &str = "/api/nodes/batch/";

fn temp(value: &str) -> Value {
    json!({
        "name": "Temp",
        "node_id": "ns=2;s=T",
        "node_type": "variable",
        "data_type": "int32",
        "value": value,
        "variation_type": "random",
        "variation_min": 0,
        "variation_max": 10,
        "variation_values": ""
    })
}

// =========================================================================
// CRUD
// =========================================================================

#[tokio::test]
async fn test_health() -> Result<()> {
    let (status, body) = send(&app(None), Method::GET, "/api/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["nodes"], 0);
    Ok(())
}

#[tokio::test]
async fn test_create_list_update_delete() -> Result<()> {
    let app = app(None);

    let (status, body) = send(&app, Method::POST, NODES, None, Some(temp("4"))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = send(&app, Method::GET, NODES, None, None).await?;
    assert_eq!(body["nodes"][0]["id"], 1);
    assert_eq!(body["nodes"][0]["variation_type"], "random");

    let (status, _) = send(&app, Method::PUT, "/api/nodes/1/", None, Some(temp("8"))).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, NODES, None, None).await?;
    assert_eq!(body["nodes"][0]["value"], "8");

    let (status, _) = send(&app, Method::DELETE, "/api/nodes/1/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, NODES, None, None).await?;
    assert_eq!(body["nodes"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_delete_unknown_node() -> Result<()> {
    let (status, body) = send(&app(None), Method::DELETE, "/api/nodes/42/", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Node not found: 42");
    Ok(())
}

// =========================================================================
// Validation
// =========================================================================

#[tokio::test]
async fn test_out_of_range_value_rejected_with_field_details() -> Result<()> {
    let (status, body) =
        send(&app(None), Method::POST, NODES, None, Some(temp("2147483648"))).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let message = body["details"]["value"].as_str().unwrap_or_default();
    assert!(message.contains("out of range"));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_node_id_rejected() -> Result<()> {
    let app = app(None);
    send(&app, Method::POST, NODES, None, Some(temp("1"))).await?;

    let (status, body) = send(&app, Method::POST, NODES, None, Some(temp("2"))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_NODE_ID");
    Ok(())
}

// =========================================================================
// Batch
// =========================================================================

#[tokio::test]
async fn test_batch_creates_nodes_atomically() -> Result<()> {
    let app = app(None);
    let batch = json!({
        "nameTemplate": "Sensor_{i}",
        "nodeIdTemplate": "ns=2;s=Sensor{i}",
        "startIndex": 1,
        "endIndex": 3,
        "nodeType": "variable",
        "dataType": "double",
        "valueTemplate": "0.0"
    });

    let (status, _) = send(&app, Method::POST, BATCH, None, Some(batch.clone())).await?;
    assert_eq!(status, StatusCode::OK);

    // Second submission collides with every node from the first
    let (status, body) = send(&app, Method::POST, BATCH, None, Some(batch)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["duplicates"].as_array().map(Vec::len), Some(3));

    let (_, body) = send(&app, Method::GET, NODES, None, None).await?;
    let ids: Vec<&str> = body["nodes"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|n| n["node_id"].as_str())
        .collect();
    assert_eq!(ids, ["ns=2;s=Sensor1", "ns=2;s=Sensor2", "ns=2;s=Sensor3"]);
    Ok(())
}

#[tokio::test]
async fn test_inverted_batch_range_rejected() -> Result<()> {
    let batch = json!({
        "nameTemplate": "S_{i}",
        "nodeIdTemplate": "ns=2;s=S{i}",
        "startIndex": 5,
        "endIndex": 3,
        "valueTemplate": "1"
    });

    let (status, body) = send(&app(None), Method::POST, BATCH, None, Some(batch)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["range"].is_string());
    Ok(())
}

// =========================================================================
// CSRF
// =========================================================================

#[tokio::test]
async fn test_csrf_required_for_mutations_only() -> Result<()> {
    let app = app(Some("secret"));

    let (status, _) = send(&app, Method::GET, NODES, None, None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, NODES, None, Some(temp("1"))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "CSRF_FAILED");

    let (status, _) = send(&app, Method::POST, NODES, Some("wrong"), Some(temp("1"))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::POST, NODES, Some("secret"), Some(temp("1"))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

//! Integration tests for the HTTP server client
//!
//! These tests start a small axum server on an ephemeral local port that
//! serves a fixed catalog, and verify that:
//! - Catalog, required-config and location responses decode
//! - `POST /v1/applications` sends the canonical spec body
//! - Non-success statuses map to `ApiError::HttpError`
//! - The full wizard flow works against a real HTTP server

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{json, Value};

use deploy_wizard::api::{ApiError, ApplicationProvider, CatalogProvider, HttpServerClient};
use deploy_wizard::wizard::{FinishOutcome, StepId, Transition, WizardController, WizardSession};

const WEB_CLUSTER: &str = "brooklyn.demo.WebClusterDatabaseExample";

// ─── Fake Server ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct FakeServer {
    /// Bodies received on `POST /v1/applications`
    received: Arc<Mutex<Vec<Value>>>,
    /// Status to answer submissions with instead of 201
    reject_with: Arc<Mutex<Option<u16>>>,
}

async fn entities() -> Json<Value> {
    Json(json!([
        {"id": "brooklyn.entity.webapp.jboss.JBoss7Server", "name": "JBoss 7", "iconUrl": "/icons/jboss.png"},
        {"id": "brooklyn.entity.database.mysql.MySqlNode", "name": "MySQL"}
    ]))
}

async fn applications() -> Json<Value> {
    Json(json!([
        {"id": WEB_CLUSTER, "name": "Web Cluster + DB", "description": "Clustered web app with a database"}
    ]))
}

async fn entity_config(Path(type_id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if type_id != WEB_CLUSTER {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "config": [
            {"name": "wars.root", "type": "java.lang.String", "label": "WAR", "priority": 3},
            {"name": "debug", "type": "java.lang.Boolean", "label": "Debug", "priority": 5, "defaultValue": false},
            {"name": "internal.only", "type": "java.lang.String"}
        ]
    })))
}

async fn locations() -> Json<Value> {
    Json(json!([
        {"id": "0", "spec": "localhost", "links": {"self": "/v1/locations/0"}},
        {"name": "AWS US East", "spec": "aws-ec2:us-east-1", "links": {"self": "/v1/locations/1"}}
    ]))
}

async fn create_application(
    State(server): State<FakeServer>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    server.received.lock().unwrap().push(body);
    if let Some(status) = *server.reject_with.lock().unwrap() {
        return Err(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
    }
    Ok((StatusCode::CREATED, Json(json!({"entityId": "app-42"}))))
}

/// Start the fake server, returning its state and a client pointed at it
async fn start_server() -> (FakeServer, HttpServerClient) {
    let server = FakeServer::default();
    let router = Router::new()
        .route("/v1/catalog/entities", get(entities))
        .route("/v1/catalog/entities/:type_id", get(entity_config))
        .route("/v1/catalog/applications", get(applications))
        .route("/v1/locations", get(locations))
        .route("/v1/applications", post(create_application))
        .with_state(server.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = HttpServerClient::new(
        &format!("http://{}", addr),
        Duration::from_secs(5),
        "deploy-wizard-test",
    )
    .unwrap();
    (server, client)
}

// ─── Catalog Tests ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_catalog_lists_decode() {
    let (_server, client) = start_server().await;

    let entities = client.list_entities().await.unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].icon_url.as_deref(), Some("/icons/jboss.png"));

    let applications = client.list_applications().await.unwrap();
    assert_eq!(applications[0].id, WEB_CLUSTER);
    assert!(applications[0].description.is_some());
}

#[tokio::test]
async fn test_entity_config_orders_labeled_entries() {
    let (_server, client) = start_server().await;

    let schema = client.entity_config(WEB_CLUSTER).await.unwrap();
    let names: Vec<&str> = schema
        .displayed_entries()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["debug", "wars.root"]);
}

#[tokio::test]
async fn test_unknown_type_is_http_error() {
    let (_server, client) = start_server().await;

    let err = client.entity_config("com.example.Missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.provider_name(), "catalog");
}

#[tokio::test]
async fn test_locations_pretty_names() {
    let (_server, client) = start_server().await;

    let locations = client.list_locations().await.unwrap();
    assert_eq!(locations[0].uri(), "/v1/locations/0");
    assert_eq!(locations[0].pretty_name(), "localhost");
    assert_eq!(locations[1].pretty_name(), "AWS US East");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = HttpServerClient::new(
        "http://127.0.0.1:1",
        Duration::from_secs(2),
        "deploy-wizard-test",
    )
    .unwrap();

    let err = client.list_locations().await.unwrap_err();
    assert!(matches!(err, ApiError::NetworkError { .. }));
}

// ─── Submission Tests ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_application_posts_body() {
    let (server, client) = start_server().await;
    let body = json!({"type": WEB_CLUSTER, "locations": ["/v1/locations/0"]});

    let response = client.create_application(&body).await.unwrap();
    assert_eq!(response["entityId"], "app-42");
    assert_eq!(server.received.lock().unwrap().as_slice(), &[body]);
}

#[tokio::test]
async fn test_rejected_submission_reports_status() {
    let (server, client) = start_server().await;
    *server.reject_with.lock().unwrap() = Some(409);

    let err = client
        .create_application(&json!({"type": WEB_CLUSTER, "locations": []}))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.provider_name(), "applications");
}

// ─── Wizard Flow ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_wizard_flow_against_http_server() {
    let (server, client) = start_server().await;
    let client = Arc::new(client);
    let mut wizard =
        WizardController::new(client.clone(), client, WizardSession::default());
    wizard.sync().await;
    assert_eq!(wizard.retreat(), Transition::Illegal);

    // Entities -> Template -> App Class, then type the class name
    let ctrl_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
    wizard.handle_key(ctrl_t);
    wizard.handle_key(ctrl_t);
    for c in WEB_CLUSTER.chars() {
        wizard.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    assert_eq!(wizard.advance(), Transition::Moved(StepId::Deploy));
    wizard.sync().await;

    assert_eq!(wizard.spec().locations, vec!["/v1/locations/0"]);
    assert!(wizard.session().config_cache.schema().is_some());

    assert_eq!(wizard.preview(), Transition::Moved(StepId::Preview));
    let outcome = wizard.finish().await;
    assert!(matches!(outcome, FinishOutcome::Submitted(ref r) if r["entityId"] == "app-42"));

    let received = server.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["type"], WEB_CLUSTER);
    // Required rows are harvested into config with their defaults
    assert_eq!(received[0]["config"]["debug"], false);
    assert_eq!(received[0]["config"]["wars.root"], "");
    assert!(received[0].get("entities").is_none());
}

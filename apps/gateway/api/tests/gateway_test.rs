//! End-to-end tests of the assembled gateway over in-memory repositories.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use core_config::{app_info, server::ServerConfig};
use domain_environments::{EnvironmentService, InMemoryEnvironmentRepository};
use domain_events::{EventRepository, InMemoryEventRepository, IngestEventService};
use domain_triggers::{InMemoryTriggerRepository, InitializeTriggerService, TriggerRepository};
use gateway_api::{api, app};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const API_KEY: &str = "tr_dev_gateway";

struct Gateway {
    router: Router,
    environment_id: Uuid,
    events: InMemoryEventRepository,
    triggers: InMemoryTriggerRepository,
    trigger_id: Uuid,
}

async fn gateway() -> Gateway {
    let environments = InMemoryEnvironmentRepository::new();
    let user_id = Uuid::now_v7();
    let environment = environments.seed(API_KEY, Some(user_id)).await;

    let events = InMemoryEventRepository::new();
    let triggers = InMemoryTriggerRepository::new();
    let endpoint = triggers.add_endpoint(environment.id, "acme-endpoint").await;
    let trigger = triggers.add_dynamic_trigger(endpoint.id, "trg_1").await;

    let apis = api::v1_router(
        EnvironmentService::new(environments),
        IngestEventService::new(events.clone()),
        InitializeTriggerService::new(triggers.clone()),
    );
    let router = app(apis, api::probes(app_info!()), &ServerConfig::default());

    Gateway {
        router,
        environment_id: environment.id,
        events,
        triggers,
        trigger_id: trigger.id,
    }
}

fn request(method: &str, uri: &str, api_key: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(body.into()).unwrap()
}

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_send_event_round_trip() {
    let gw = gateway().await;

    let body = json!({"event": {"name": "user.signup", "payload": {"plan": "pro"}}}).to_string();
    let response = gw
        .router
        .oneshot(request("POST", "/api/v1/events", Some(API_KEY), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let event = json_body(response.into_body()).await;
    assert_eq!(event["name"], json!("user.signup"));
    assert_eq!(event["payload"], json!({"plan": "pro"}));
    assert_eq!(gw.events.count(gw.environment_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_wrong_key_is_401_and_nothing_persists() {
    let gw = gateway().await;

    let body = json!({"event": {"name": "user.signup"}}).to_string();
    let response = gw
        .router
        .oneshot(request("POST", "/api/v1/events", Some("tr_dev_unknown"), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response.into_body()).await,
        json!({"error": "Invalid or Missing API key"})
    );
    assert_eq!(gw.events.count(gw.environment_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_on_events_is_405() {
    let gw = gateway().await;

    let response = gw
        .router
        .oneshot(request("GET", "/api/v1/events", Some(API_KEY), Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST");
    assert_eq!(
        json_body(response.into_body()).await,
        json!({"error": "Method Not Allowed"})
    );
}

#[tokio::test]
async fn test_registration_twice_keeps_one_row() {
    let gw = gateway().await;
    let uri = "/api/v1/acme-endpoint/triggers/trg_1/registrations";

    for params in [json!({"branch": "main"}), json!({"branch": "dev"})] {
        let body = json!({"id": "reg_1", "params": params}).to_string();
        let response = gw
            .router
            .clone()
            .oneshot(request("POST", uri, Some(API_KEY), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response.into_body()).await["params"], params);
    }

    assert_eq!(gw.triggers.count_registrations(gw.trigger_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_whoami_reports_member_user() {
    let gw = gateway().await;

    let response = gw
        .router
        .oneshot(request("GET", "/api/v1/whoami", Some(API_KEY), Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["id"], json!(gw.environment_id));
    assert!(body["userId"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let gw = gateway().await;

    let response = gw
        .router
        .oneshot(request("GET", "/api/v2/events", Some(API_KEY), Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response.into_body()).await, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn test_trailing_slash_redirects() {
    let gw = gateway().await;

    let response = gw
        .router
        .oneshot(request("GET", "/api/v1/whoami/?verbose=1", None, Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "/api/v1/whoami?verbose=1");
}

#[tokio::test]
async fn test_every_response_carries_hsts() {
    let gw = gateway().await;

    for uri in ["/health", "/api/v1/events", "/nowhere"] {
        let response = gw
            .router
            .clone()
            .oneshot(request("GET", uri, None, Body::empty()))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::STRICT_TRANSPORT_SECURITY],
            "max-age=3153600000",
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_health_and_metrics_probes() {
    observability::init_metrics();
    let gw = gateway().await;

    let response = gw
        .router
        .clone()
        .oneshot(request("GET", "/health", None, Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response.into_body()).await["status"], json!("healthy"));

    let response = gw
        .router
        .oneshot(request("GET", "/metrics", None, Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_lists_v1_paths() {
    let gw = gateway().await;

    let response = gw
        .router
        .oneshot(request("GET", "/api-docs/openapi.json", None, Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response.into_body()).await;
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/v1/events"));
    assert!(paths.contains_key("/v1/whoami"));
    assert!(paths.contains_key("/v1/{endpoint_slug}/triggers/{id}/registrations"));
}

//! Postgres-backed tests for `PgEventRepository`.
//!
//! Require Docker; run with `cargo test -- --ignored`.

use domain_environments::{EnvironmentService, PgEnvironmentRepository};
use domain_events::*;
use serde_json::json;
use test_utils::{TestDataBuilder, TestDatabase};

#[tokio::test]
#[ignore] // Requires Docker
async fn test_ingest_persists_and_dedupes_on_event_id() {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name("pg_ingest_dedupe");
    let api_key = data.api_key("dev");
    db.seed_environment(&api_key).await;

    let envs = EnvironmentService::new(PgEnvironmentRepository::new(db.connection()));
    let env = envs.authenticate_api_key(&api_key).await.unwrap().unwrap();

    let repo = PgEventRepository::new(db.connection());
    let service = IngestEventService::new(repo);

    let event: RawEvent =
        serde_json::from_value(json!({"name": "user.signup", "id": "evt_pg", "payload": {"id": 1}}))
            .unwrap();

    let first = service.ingest(&env, event.clone(), None).await.unwrap();
    let second = service.ingest(&env, event, None).await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(second.record.id, first.record.id);
    assert_eq!(second.record.payload, json!({"id": 1}));

    let repo = PgEventRepository::new(db.connection());
    assert_eq!(repo.count(env.id).await.unwrap(), 1);
    assert_eq!(db.count("event_records").await, 1);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_record_round_trips_optional_columns() {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name("pg_event_columns");
    let api_key = data.api_key("dev");
    db.seed_environment(&api_key).await;

    let envs = EnvironmentService::new(PgEnvironmentRepository::new(db.connection()));
    let env = envs.authenticate_api_key(&api_key).await.unwrap().unwrap();

    let service = IngestEventService::new(PgEventRepository::new(db.connection()));
    let event: RawEvent = serde_json::from_value(json!({
        "name": "order.paid",
        "context": {"ip": "10.0.0.1"},
        "source": "billing"
    }))
    .unwrap();
    let options = SendEventOptions {
        deliver_after: Some(3600),
        account_id: Some("acct_7".into()),
        ..Default::default()
    };

    let ingested = service.ingest(&env, event, Some(options)).await.unwrap();
    let stored = PgEventRepository::new(db.connection())
        .find_by_event_id(env.id, &ingested.record.event_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.context, Some(json!({"ip": "10.0.0.1"})));
    assert_eq!(stored.source, "billing");
    assert_eq!(stored.external_account_id.as_deref(), Some("acct_7"));
    assert_eq!((stored.deliver_at - stored.created_at).num_seconds(), 3600);
}

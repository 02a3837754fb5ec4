//! Event domain models

use chrono::{DateTime, TimeDelta, Utc};
use domain_environments::AuthenticatedEnvironment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Source recorded when the caller does not name one.
pub const DEFAULT_SOURCE: &str = "api";

/// `POST /api/v1/events` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendEventBody {
    #[validate(nested)]
    pub event: RawEvent,
    #[validate(nested)]
    pub options: Option<SendEventOptions>,
}

/// The event as sent by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Any JSON; `null` when omitted
    #[serde(default)]
    pub payload: Value,

    pub context: Option<Value>,

    /// Caller-chosen id, used as the idempotency key. Generated when absent.
    #[validate(length(min = 1, max = 255))]
    pub id: Option<String>,

    /// Defaults to the receipt time
    pub timestamp: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 255))]
    pub source: Option<String>,
}

/// Delivery options. `deliverAt` wins over `deliverAfter`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEventOptions {
    pub deliver_at: Option<DateTime<Utc>>,

    /// Seconds after receipt; at most ten years
    #[validate(range(min = 0, max = 315_360_000))]
    pub deliver_after: Option<i64>,

    #[validate(length(min = 1, max = 255))]
    pub account_id: Option<String>,
}

impl SendEventOptions {
    /// When the event becomes deliverable, given its receipt time.
    pub fn deliver_at(&self, received_at: DateTime<Utc>) -> DateTime<Utc> {
        if let Some(at) = self.deliver_at {
            return at;
        }
        self.deliver_after
            .and_then(TimeDelta::try_seconds)
            .and_then(|delay| received_at.checked_add_signed(delay))
            .unwrap_or(received_at)
    }
}

/// A persisted event. Append-only: nothing in this crate updates a record.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: Uuid,
    pub event_id: String,
    pub name: String,
    pub payload: Value,
    pub context: Option<Value>,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub deliver_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub external_account_id: Option<String>,
    pub environment_id: Uuid,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    /// Attribute `event` to `environment`. The environment always comes from
    /// authentication, never from the body.
    pub fn new(
        environment: &AuthenticatedEnvironment,
        event: RawEvent,
        options: Option<&SendEventOptions>,
        received_at: DateTime<Utc>,
    ) -> Self {
        let options = options.cloned().unwrap_or_default();

        Self {
            id: Uuid::now_v7(),
            event_id: event.id.unwrap_or_else(|| Uuid::now_v7().to_string()),
            name: event.name,
            payload: event.payload,
            context: event.context,
            source: event.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            timestamp: event.timestamp.unwrap_or(received_at),
            deliver_at: options.deliver_at(received_at),
            delivered_at: None,
            cancelled_at: None,
            external_account_id: options.account_id,
            environment_id: environment.id,
            organization_id: environment.organization_id,
            created_at: received_at,
        }
    }
}

/// Result of an ingest: the stored record, and whether this call wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedEvent {
    pub record: EventRecord,
    pub created: bool,
}

/// Canonical JSON projection of an event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventLog {
    pub id: String,
    pub name: String,
    pub payload: Value,
    pub context: Option<Value>,
    pub timestamp: DateTime<Utc>,
    pub deliver_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<EventRecord> for ApiEventLog {
    fn from(record: EventRecord) -> Self {
        Self {
            id: record.event_id,
            name: record.name,
            payload: record.payload,
            context: record.context,
            timestamp: record.timestamp,
            deliver_at: record.deliver_at,
            delivered_at: record.delivered_at,
            cancelled_at: record.cancelled_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_environments::InMemoryEnvironmentRepository;
    use serde_json::json;

    fn raw(name: &str) -> RawEvent {
        serde_json::from_value(json!({"name": name})).unwrap()
    }

    #[test]
    fn test_raw_event_defaults() {
        let event = raw("user.signup");
        assert_eq!(event.payload, Value::Null);
        assert!(event.id.is_none());
        assert!(event.context.is_none());
    }

    #[test]
    fn test_deliver_at_precedence() {
        let received = Utc::now();
        let at = received + TimeDelta::hours(2);

        let both = SendEventOptions {
            deliver_at: Some(at),
            deliver_after: Some(60),
            account_id: None,
        };
        assert_eq!(both.deliver_at(received), at);

        let after = SendEventOptions {
            deliver_after: Some(60),
            ..Default::default()
        };
        assert_eq!(after.deliver_at(received), received + TimeDelta::seconds(60));

        assert_eq!(SendEventOptions::default().deliver_at(received), received);
    }

    #[tokio::test]
    async fn test_record_is_attributed_to_environment() {
        let env = InMemoryEnvironmentRepository::new().seed("tr_dev_attr", None).await;
        let received = Utc::now();
        let options = SendEventOptions {
            account_id: Some("acct_1".into()),
            ..Default::default()
        };

        let record = EventRecord::new(&env, raw("user.signup"), Some(&options), received);

        assert_eq!(record.environment_id, env.id);
        assert_eq!(record.organization_id, env.organization_id);
        assert_eq!(record.source, DEFAULT_SOURCE);
        assert_eq!(record.timestamp, received);
        assert_eq!(record.deliver_at, received);
        assert_eq!(record.external_account_id.as_deref(), Some("acct_1"));
        assert!(!record.event_id.is_empty());
    }

    #[tokio::test]
    async fn test_caller_id_and_timestamp_are_kept() {
        let env = InMemoryEnvironmentRepository::new().seed("tr_dev_ids", None).await;
        let event: RawEvent = serde_json::from_value(json!({
            "name": "order.paid",
            "id": "evt_42",
            "timestamp": "2026-01-02T03:04:05Z",
            "source": "billing"
        }))
        .unwrap();

        let record = EventRecord::new(&env, event, None, Utc::now());
        assert_eq!(record.event_id, "evt_42");
        assert_eq!(record.source, "billing");
        assert_eq!(record.timestamp.to_rfc3339(), "2026-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_projection_uses_event_id_and_camel_case() {
        let now = Utc::now();
        let record = EventRecord {
            id: Uuid::now_v7(),
            event_id: "evt_1".into(),
            name: "user.signup".into(),
            payload: json!({"id": 1}),
            context: None,
            source: "api".into(),
            timestamp: now,
            deliver_at: now,
            delivered_at: None,
            cancelled_at: None,
            external_account_id: None,
            environment_id: Uuid::now_v7(),
            organization_id: Uuid::now_v7(),
            created_at: now,
        };

        let value = serde_json::to_value(ApiEventLog::from(record)).unwrap();
        assert_eq!(value["id"], json!("evt_1"));
        assert_eq!(value["payload"], json!({"id": 1}));
        assert_eq!(value["context"], Value::Null);
        assert!(value.get("deliverAt").is_some());
        assert!(value.get("deliveredAt").is_some());
        assert!(value.get("environmentId").is_none());
    }
}

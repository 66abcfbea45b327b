//! Envelope decoding and metric routing.
//!
//! Covers the per-message isolation contract: malformed payloads fail
//! decoding in a typed way without affecting how neighboring payloads
//! route.

use engagement_service::aggregates::MetricAggregate;
use engagement_service::consumers::metric_events::route;
use engagement_service::error::AppError;
use engagement_service::events::{self, CounterAction, EmailEvent, MetricEvent, NotificationEvent};

fn metric_payload(metric_id: i64, column: &str, action: &str) -> Vec<u8> {
    serde_json::json!({
        "event_id": format!("evt-{}-{}", metric_id, column),
        "metric_id": metric_id,
        "column": column,
        "action": action,
        "entity": "USER_METRIC",
        "created_at": "2025-05-04T10:00:00Z",
        "source": "content-service",
        "metadata": {}
    })
    .to_string()
    .into_bytes()
}

#[test]
fn well_formed_metric_event_routes_to_user_aggregate() {
    let routed = route(&metric_payload(42, "post_count", "SUM"))
        .unwrap()
        .unwrap();

    assert_eq!(routed.descriptor.entity, "USER_METRIC");
    assert_eq!(routed.descriptor.table, "metric_users");
    assert_eq!(routed.owner_id, 42);
    assert_eq!(routed.column, "post_count");
    assert_eq!(routed.action, CounterAction::Sum);
}

#[test]
fn malformed_payload_is_a_typed_decode_failure() {
    let err = route(b"{not json").unwrap_err();
    assert!(matches!(err, AppError::MalformedEvent(_)));

    // Missing required field
    let err = route(br#"{"event_id": "evt-1"}"#).unwrap_err();
    assert!(matches!(err, AppError::MalformedEvent(_)));
}

#[test]
fn unknown_entity_is_dropped_not_failed() {
    let payload = serde_json::json!({
        "event_id": "evt-9",
        "metric_id": 9,
        "column": "post_count",
        "action": "SUM",
        "entity": "BADGE_METRIC",
        "created_at": "2025-05-04T10:00:00Z",
        "source": "content-service",
        "metadata": {}
    })
    .to_string();

    assert!(route(payload.as_bytes()).unwrap().is_none());
}

#[test]
fn bad_payloads_do_not_affect_surrounding_good_ones() {
    let sequence: Vec<Vec<u8>> = vec![
        b"{broken".to_vec(),
        metric_payload(1, "post_count", "SUM"),
        b"\xff\xfe not utf8 json".to_vec(),
        metric_payload(2, "comment_count", "RED"),
    ];

    let mut routed = Vec::new();
    for payload in &sequence {
        match route(payload) {
            Ok(Some(op)) => routed.push(op),
            Ok(None) => panic!("unexpected unroutable event"),
            Err(err) => assert!(matches!(err, AppError::MalformedEvent(_))),
        }
    }

    assert_eq!(routed.len(), 2);
    assert_eq!(routed[0].owner_id, 1);
    assert_eq!(routed[0].column, "post_count");
    assert_eq!(routed[1].owner_id, 2);
    assert_eq!(routed[1].column, "comment_count");
}

#[test]
fn routed_scenario_applies_sum_then_saturating_red() {
    let routed = route(&metric_payload(42, "post_count", "SUM"))
        .unwrap()
        .unwrap();

    let mut aggregate = MetricAggregate::new(routed.descriptor, routed.owner_id)
        .with_counter("post_count", 5)
        .unwrap();
    let change = aggregate
        .apply_action(&routed.column, routed.action)
        .unwrap();
    assert_eq!(change.current, 6);

    let routed = route(&metric_payload(42, "post_count", "RED"))
        .unwrap()
        .unwrap();
    let mut drained = MetricAggregate::new(routed.descriptor, routed.owner_id);
    let change = drained.apply_action(&routed.column, routed.action).unwrap();
    assert_eq!(change.previous, 0);
    assert_eq!(change.current, 0);
}

#[test]
fn notification_event_decodes_with_defaults() {
    let event: NotificationEvent = events::decode(
        serde_json::json!({
            "event_id": "4c0e1c1e-8d07-4a3b-a2da-9f2e14c8d8b1",
            "event_type": "NEW_VACANCY",
            "actor_id": 3,
            "entity_id": 88,
            "created_at": "2025-05-04T10:00:00Z",
            "source_service": "recruitment-service",
            "data": {"actor_name": "Acme"},
            "metadata": {}
        })
        .to_string()
        .as_bytes(),
    )
    .unwrap();

    assert_eq!(event.event_type.as_str(), "NEW_VACANCY");
    assert_eq!(event.actor_id, Some(3));
}

#[test]
fn email_event_decodes_optional_copies() {
    let event: EmailEvent = events::decode(
        serde_json::json!({
            "event_id": "2b3e58a4-4f87-4e8e-bf57-9c2a4f1f7f01",
            "email": "ana@example.com",
            "template_name": "welcome",
            "created_at": "2025-05-04T10:00:00Z",
            "source_service": "identity-service",
            "subject": "Welcome!",
            "cc": ["manager@example.com"],
            "data": {},
            "metadata": {}
        })
        .to_string()
        .as_bytes(),
    )
    .unwrap();

    assert_eq!(event.template_name.as_str(), "welcome");
    assert_eq!(event.cc.as_deref(), Some(&["manager@example.com".to_string()][..]));
    assert!(event.bcc.is_none());
}

#[test]
fn duplicate_metric_events_route_identically() {
    // At-least-once delivery: the router gives duplicates no special
    // treatment, so a redelivered event mutates again downstream.
    let payload = metric_payload(7, "share_count", "SUM");
    let first = route(&payload).unwrap().unwrap();
    let second = route(&payload).unwrap().unwrap();

    assert_eq!(first.descriptor.entity, second.descriptor.entity);
    assert_eq!(first.owner_id, second.owner_id);
    assert_eq!(first.column, second.column);
}

#[test]
fn metric_event_serializes_back_to_wire_shape() {
    let event: MetricEvent =
        events::decode(&metric_payload(42, "post_count", "RED")).unwrap();
    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(value["entity"], "USER_METRIC");
    assert_eq!(value["action"], "RED");
}

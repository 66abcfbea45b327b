//! Notification fanout: audience expansion and record synthesis.

use chrono::Utc;
use engagement_service::events::NotificationEvent;
use engagement_service::repository::{EnterpriseFollow, FollowRelationship};
use engagement_service::services::fanout::{
    build_enterprise_follower_records, build_user_follower_records, enterprise_follower_text,
    user_follower_text,
};

fn notification_event(kind: &str, data: serde_json::Value) -> NotificationEvent {
    serde_json::from_value(serde_json::json!({
        "event_id": "e4a7d9d0-5b2f-4a63-9a3e-7c1f0b2d4e55",
        "event_type": kind,
        "actor_id": 7,
        "entity_id": 12,
        "created_at": Utc::now().to_rfc3339(),
        "source_service": "content-service",
        "data": data,
        "metadata": {}
    }))
    .unwrap()
}

fn user_edge(id: i64, follower_id: i64, receive_post: bool) -> FollowRelationship {
    FollowRelationship {
        id,
        follower_id,
        followed_id: 7,
        receive_post,
        receive_comment: true,
        created_at: Utc::now(),
    }
}

#[test]
fn new_post_fans_out_one_record_per_matching_follower() {
    // Three follow edges exist with receive_post {true, true, false}; the
    // expansion query only returns the two with the flag set.
    let expanded = vec![user_edge(1, 101, true), user_edge(2, 102, true)];
    let skipped = user_edge(3, 103, false);

    let event = notification_event("NEW_POST", serde_json::json!({"user_name": "Marina"}));
    let records = build_user_follower_records(&expanded, &event);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].recipient_id, 101);
    assert_eq!(records[1].recipient_id, 102);
    assert!(records.iter().all(|r| r.recipient_id != skipped.follower_id));
    assert!(records.iter().all(|r| r.kind == "NEW_POST"));
    assert!(records.iter().all(|r| r.entity_id == Some(12)));
}

#[test]
fn no_matching_followers_is_not_an_error() {
    let event = notification_event("NEW_COMMENT", serde_json::json!({"user_name": "Marina"}));
    let records = build_user_follower_records(&[], &event);
    assert!(records.is_empty());
}

#[test]
fn user_follower_text_selects_template_by_kind() {
    let post = notification_event("NEW_POST", serde_json::json!({"user_name": "Marina"}));
    let (title, content) = user_follower_text(&post);
    assert_eq!(title, "The user Marina created a new post!");
    assert_eq!(content, "The user you follow, Marina, just created a new post!");

    let comment = notification_event("NEW_COMMENT", serde_json::json!({"user_name": "Marina"}));
    let (title, _) = user_follower_text(&comment);
    assert_eq!(title, "The user Marina created a new comment!");
}

#[test]
fn unknown_kind_falls_back_to_empty_text() {
    let event = notification_event("NEW_BADGE", serde_json::json!({"user_name": "Marina"}));
    let (title, content) = user_follower_text(&event);
    assert!(title.is_empty());
    assert!(content.is_empty());
}

#[test]
fn enterprise_fanout_addresses_the_following_user() {
    let follows = vec![
        EnterpriseFollow {
            id: 1,
            user_id: 201,
            enterprise_id: 7,
            receive_post: true,
            receive_comment: false,
            receive_vacancy: true,
            created_at: Utc::now(),
        },
        EnterpriseFollow {
            id: 2,
            user_id: 202,
            enterprise_id: 7,
            receive_post: true,
            receive_comment: false,
            receive_vacancy: true,
            created_at: Utc::now(),
        },
    ];

    let event = notification_event("NEW_VACANCY", serde_json::json!({"actor_name": "Acme"}));
    let records = build_enterprise_follower_records(&follows, &event);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].recipient_id, 201);
    assert_eq!(records[1].recipient_id, 202);
    assert_eq!(records[0].title, "The enterprise Acme created a new vacancy!");
    assert_eq!(
        records[0].content,
        "The enterprise you follow, Acme, just created a new vacancy!"
    );
}

#[test]
fn enterprise_post_text_differs_from_vacancy_text() {
    let post = notification_event("NEW_POST_ENTERPRISE", serde_json::json!({"actor_name": "Acme"}));
    let (title, _) = enterprise_follower_text(&post);
    assert_eq!(title, "The enterprise Acme created a new post!");
}

#[test]
fn missing_display_name_interpolates_empty() {
    let event = notification_event("NEW_POST", serde_json::json!({}));
    let (title, _) = user_follower_text(&event);
    assert_eq!(title, "The user  created a new post!");
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actor action described by a notification event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    NewPost,
    NewComment,
    NewPostEnterprise,
    NewVacancy,
    NewFollower,
    NewReviewEnterprise,
    ApplicationReceived,
    System,
    Unknown(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::NewPost => "NEW_POST",
            NotificationKind::NewComment => "NEW_COMMENT",
            NotificationKind::NewPostEnterprise => "NEW_POST_ENTERPRISE",
            NotificationKind::NewVacancy => "NEW_VACANCY",
            NotificationKind::NewFollower => "NEW_FOLLOWER",
            NotificationKind::NewReviewEnterprise => "NEW_REVIEW_ENTERPRISE",
            NotificationKind::ApplicationReceived => "APPLICATION_RECEIVED",
            NotificationKind::System => "SYSTEM",
            NotificationKind::Unknown(raw) => raw,
        }
    }
}

impl From<String> for NotificationKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "NEW_POST" => NotificationKind::NewPost,
            "NEW_COMMENT" => NotificationKind::NewComment,
            "NEW_POST_ENTERPRISE" => NotificationKind::NewPostEnterprise,
            "NEW_VACANCY" => NotificationKind::NewVacancy,
            "NEW_FOLLOWER" => NotificationKind::NewFollower,
            "NEW_REVIEW_ENTERPRISE" => NotificationKind::NewReviewEnterprise,
            "APPLICATION_RECEIVED" => NotificationKind::ApplicationReceived,
            "SYSTEM" => NotificationKind::System,
            _ => NotificationKind::Unknown(raw),
        }
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.as_str().to_string()
    }
}

/// An actor action to be fanned out to an audience of followers, or
/// delivered directly to a single recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub event_id: Uuid,
    pub event_type: NotificationKind,
    /// The acting entity (user or enterprise)
    pub actor_id: Option<i64>,
    /// The entity acted on (post, comment, vacancy, followed user)
    pub entity_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub source_service: String,
    /// Human-readable substitution fields (names, titles)
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl NotificationEvent {
    /// String field from the substitution payload.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}

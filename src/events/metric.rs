use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counter mutation direction carried by a metric event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CounterAction {
    /// Increment by one
    Sum,
    /// Decrement by one, saturating at zero
    Red,
}

impl CounterAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterAction::Sum => "SUM",
            CounterAction::Red => "RED",
        }
    }
}

/// Target aggregate kind of a metric event.
///
/// Unrecognized wire values deserialize into `Unknown` so the router can
/// drop them as a logged no-op rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    UserMetric,
    VacancyMetric,
    EnterpriseMetric,
    PostEnterpriseMetric,
    PostUserMetric,
    CommentPostEnterpriseMetric,
    CommentPostUserMetric,
    Unknown(String),
}

impl EntityKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::UserMetric => "USER_METRIC",
            EntityKind::VacancyMetric => "VACANCY_METRIC",
            EntityKind::EnterpriseMetric => "ENTERPRISE_METRIC",
            EntityKind::PostEnterpriseMetric => "POST_ENTERPRISE_METRIC",
            EntityKind::PostUserMetric => "POST_USER_METRIC",
            EntityKind::CommentPostEnterpriseMetric => "COMMENT_POST_ENTERPRISE_METRIC",
            EntityKind::CommentPostUserMetric => "COMMENT_POST_USER_METRIC",
            EntityKind::Unknown(raw) => raw,
        }
    }
}

impl From<String> for EntityKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "USER_METRIC" => EntityKind::UserMetric,
            "VACANCY_METRIC" => EntityKind::VacancyMetric,
            "ENTERPRISE_METRIC" => EntityKind::EnterpriseMetric,
            "POST_ENTERPRISE_METRIC" => EntityKind::PostEnterpriseMetric,
            "POST_USER_METRIC" => EntityKind::PostUserMetric,
            "COMMENT_POST_ENTERPRISE_METRIC" => EntityKind::CommentPostEnterpriseMetric,
            "COMMENT_POST_USER_METRIC" => EntityKind::CommentPostUserMetric,
            _ => EntityKind::Unknown(raw),
        }
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One counter mutation, delivered at least once. Duplicates double-count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEvent {
    /// Event id, for logging only (no enforced idempotency)
    pub event_id: String,
    /// Id of the owning entity of the target aggregate
    pub metric_id: i64,
    /// Name of the counter column to mutate
    pub column: String,
    pub action: CounterAction,
    pub entity: EntityKind,
    pub created_at: DateTime<Utc>,
    /// Emitting service
    pub source: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

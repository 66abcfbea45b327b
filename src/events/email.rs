use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transactional email template selected by an email event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemplateKind {
    Welcome,
    Goodbye,
    ApplicationReceived,
    InterviewScheduled,
    OfferExtended,
    Hired,
    Rejected,
    Unknown(String),
}

impl TemplateKind {
    pub fn as_str(&self) -> &str {
        match self {
            TemplateKind::Welcome => "welcome",
            TemplateKind::Goodbye => "goodbye",
            TemplateKind::ApplicationReceived => "application_received",
            TemplateKind::InterviewScheduled => "interview_scheduled",
            TemplateKind::OfferExtended => "offer_extended",
            TemplateKind::Hired => "hired",
            TemplateKind::Rejected => "rejected",
            TemplateKind::Unknown(raw) => raw,
        }
    }
}

impl From<String> for TemplateKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "welcome" => TemplateKind::Welcome,
            "goodbye" => TemplateKind::Goodbye,
            "application_received" => TemplateKind::ApplicationReceived,
            "interview_scheduled" => TemplateKind::InterviewScheduled,
            "offer_extended" => TemplateKind::OfferExtended,
            "hired" => TemplateKind::Hired,
            "rejected" => TemplateKind::Rejected,
            _ => TemplateKind::Unknown(raw),
        }
    }
}

impl From<TemplateKind> for String {
    fn from(kind: TemplateKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A single transactional email to render and deliver once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailEvent {
    pub event_id: Uuid,
    /// Recipient address; also the profile lookup key
    pub email: String,
    pub template_name: TemplateKind,
    pub created_at: DateTime<Utc>,
    pub source_service: String,
    pub subject: String,
    #[serde(default)]
    pub cc: Option<Vec<String>>,
    #[serde(default)]
    pub bcc: Option<Vec<String>>,
    /// Template substitution payload
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl EmailEvent {
    /// String field at a path into the substitution payload,
    /// e.g. `["vacancy", "title"]`.
    pub fn data_path(&self, path: &[&str]) -> Option<&str> {
        let mut value = &self.data;
        for key in path {
            value = value.get(key)?;
        }
        value.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_kind_round_trips_known_values() {
        for wire in [
            "welcome",
            "goodbye",
            "application_received",
            "interview_scheduled",
            "offer_extended",
            "hired",
            "rejected",
        ] {
            let kind = TemplateKind::from(wire.to_string());
            assert!(!matches!(kind, TemplateKind::Unknown(_)), "{}", wire);
            assert_eq!(kind.as_str(), wire);
        }
    }

    #[test]
    fn data_path_walks_nested_payload() {
        let event: EmailEvent = serde_json::from_value(serde_json::json!({
            "event_id": "0d4c1b2e-32a4-41c5-8c5e-2b0c0a6e8b11",
            "email": "ana@example.com",
            "template_name": "rejected",
            "created_at": "2025-05-04T10:00:00Z",
            "source_service": "recruitment-service",
            "subject": "Your application",
            "data": {"vacancy": {"title": "Backend Engineer"}},
            "metadata": {}
        }))
        .unwrap();

        assert_eq!(event.data_path(&["vacancy", "title"]), Some("Backend Engineer"));
        assert_eq!(event.data_path(&["offer_details", "document_link"]), None);
    }
}

//! Audience expansion: one actor event becomes N per-recipient
//! notification rows.

use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::events::{NotificationEvent, NotificationKind};
use crate::metrics;
use crate::repository::{
    EnterpriseFollow, FollowFlag, FollowRelationship, FollowRepository, NewNotification,
    NotificationAudience, NotificationRepository,
};

#[derive(Clone)]
pub struct NotificationFanout {
    follows: FollowRepository,
    notifications: NotificationRepository,
}

impl NotificationFanout {
    pub fn new(follows: FollowRepository, notifications: NotificationRepository) -> Self {
        Self {
            follows,
            notifications,
        }
    }

    /// Route one notification event to its audience.
    ///
    /// Unknown kinds are consumed as a logged no-op. Returns whether a
    /// mutation happened, for metric labeling.
    pub async fn dispatch(&self, event: &NotificationEvent) -> Result<bool> {
        match &event.event_type {
            NotificationKind::NewPost => {
                self.fanout_to_user_followers(event, FollowFlag::ReceivePost)
                    .await?;
            }
            NotificationKind::NewComment => {
                self.fanout_to_user_followers(event, FollowFlag::ReceiveComment)
                    .await?;
            }
            NotificationKind::NewPostEnterprise => {
                self.fanout_to_enterprise_followers(event, FollowFlag::ReceivePost)
                    .await?;
            }
            NotificationKind::NewVacancy => {
                self.fanout_to_enterprise_followers(event, FollowFlag::ReceiveVacancy)
                    .await?;
            }
            NotificationKind::NewFollower => self.notify_followed_user(event).await?,
            NotificationKind::NewReviewEnterprise | NotificationKind::ApplicationReceived => {
                self.notify_enterprise(event).await?;
            }
            NotificationKind::System => self.notify_system_recipient(event).await?,
            NotificationKind::Unknown(raw) => {
                warn!(
                    event_id = %event.event_id,
                    event_type = raw.as_str(),
                    "No handler for notification kind; dropping event"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn fanout_to_user_followers(
        &self,
        event: &NotificationEvent,
        flag: FollowFlag,
    ) -> Result<()> {
        let actor_id = require_id(event.actor_id, "actor_id")?;
        let follows = self.follows.followers_of_user(actor_id, flag).await?;
        let records = build_user_follower_records(&follows, event);
        let written = self
            .notifications
            .insert_batch(NotificationAudience::User, &records)
            .await?;

        metrics::observe_notifications_written(NotificationAudience::User.as_str(), written);
        info!(
            event_id = %event.event_id,
            event_type = event.event_type.as_str(),
            actor_id,
            recipients = written,
            "Fanned out to user followers"
        );
        Ok(())
    }

    async fn fanout_to_enterprise_followers(
        &self,
        event: &NotificationEvent,
        flag: FollowFlag,
    ) -> Result<()> {
        let enterprise_id = require_id(event.actor_id, "actor_id")?;
        let follows = self
            .follows
            .followers_of_enterprise(enterprise_id, flag)
            .await?;
        let records = build_enterprise_follower_records(&follows, event);
        let written = self
            .notifications
            .insert_batch(NotificationAudience::User, &records)
            .await?;

        metrics::observe_notifications_written(NotificationAudience::User.as_str(), written);
        info!(
            event_id = %event.event_id,
            event_type = event.event_type.as_str(),
            enterprise_id,
            recipients = written,
            "Fanned out to enterprise followers"
        );
        Ok(())
    }

    /// NEW_FOLLOWER targets one recipient: the followed user.
    async fn notify_followed_user(&self, event: &NotificationEvent) -> Result<()> {
        let recipient_id = require_id(event.entity_id, "entity_id")?;
        let user_name = event.data_str("user_name").unwrap_or_default();

        let record = NewNotification {
            recipient_id,
            title: format!("{} started following you!", user_name),
            content: "You have a new follower.".to_string(),
            link: None,
            kind: event.event_type.as_str().to_string(),
            entity_id: event.actor_id,
        };

        self.notifications
            .insert(NotificationAudience::User, &record)
            .await?;
        metrics::observe_notifications_written(NotificationAudience::User.as_str(), 1);
        Ok(())
    }

    /// Review and application events notify the enterprise itself.
    async fn notify_enterprise(&self, event: &NotificationEvent) -> Result<()> {
        let enterprise_id = require_id(event.actor_id, "actor_id")?;
        let (title, content) = enterprise_direct_text(event);

        let record = NewNotification {
            recipient_id: enterprise_id,
            title,
            content,
            link: None,
            kind: event.event_type.as_str().to_string(),
            entity_id: event.entity_id,
        };

        self.notifications
            .insert(NotificationAudience::Enterprise, &record)
            .await?;
        metrics::observe_notifications_written(NotificationAudience::Enterprise.as_str(), 1);
        Ok(())
    }

    /// SYSTEM events carry their own title and content in the payload.
    async fn notify_system_recipient(&self, event: &NotificationEvent) -> Result<()> {
        let recipient_id = require_id(event.entity_id, "entity_id")?;

        let record = NewNotification {
            recipient_id,
            title: event.data_str("title").unwrap_or_default().to_string(),
            content: event.data_str("content").unwrap_or_default().to_string(),
            link: event.data_str("link").map(str::to_string),
            kind: event.event_type.as_str().to_string(),
            entity_id: event.actor_id,
        };

        self.notifications
            .insert(NotificationAudience::User, &record)
            .await?;
        metrics::observe_notifications_written(NotificationAudience::User.as_str(), 1);
        Ok(())
    }
}

fn require_id(id: Option<i64>, field: &str) -> Result<i64> {
    id.ok_or_else(|| AppError::MalformedEvent(format!("{} is required", field)))
}

/// Title and content for events fanned out over user→user follows.
///
/// Kinds without a template entry fall back to empty strings; the fallback
/// is logged rather than silent.
pub fn user_follower_text(event: &NotificationEvent) -> (String, String) {
    let user_name = event.data_str("user_name").unwrap_or_default();
    match event.event_type {
        NotificationKind::NewPost => (
            format!("The user {} created a new post!", user_name),
            format!(
                "The user you follow, {}, just created a new post!",
                user_name
            ),
        ),
        NotificationKind::NewComment => (
            format!("The user {} created a new comment!", user_name),
            format!(
                "The user you follow, {}, just created a new comment!",
                user_name
            ),
        ),
        _ => {
            warn!(
                event_type = event.event_type.as_str(),
                "No follower template for notification kind; using empty text"
            );
            (String::new(), String::new())
        }
    }
}

/// Title and content for events fanned out over user→enterprise follows.
pub fn enterprise_follower_text(event: &NotificationEvent) -> (String, String) {
    let actor_name = event.data_str("actor_name").unwrap_or_default();
    match event.event_type {
        NotificationKind::NewPostEnterprise => (
            format!("The enterprise {} created a new post!", actor_name),
            format!(
                "The enterprise you follow, {}, just created a new post!",
                actor_name
            ),
        ),
        NotificationKind::NewVacancy => (
            format!("The enterprise {} created a new vacancy!", actor_name),
            format!(
                "The enterprise you follow, {}, just created a new vacancy!",
                actor_name
            ),
        ),
        _ => {
            warn!(
                event_type = event.event_type.as_str(),
                "No enterprise follower template for notification kind; using empty text"
            );
            (String::new(), String::new())
        }
    }
}

fn enterprise_direct_text(event: &NotificationEvent) -> (String, String) {
    let actor_name = event.data_str("actor_name").unwrap_or_default();
    match event.event_type {
        NotificationKind::NewReviewEnterprise => (
            "New Review Received!".to_string(),
            format!(
                "{} just left a new review! View the details and respond quickly.",
                actor_name
            ),
        ),
        NotificationKind::ApplicationReceived => {
            let vacancy_name = event.data_str("vacancy_name").unwrap_or_default();
            (
                "New Application Received!".to_string(),
                format!(
                    "{} just applied to your vacancy: {}. Review their profile now!",
                    actor_name, vacancy_name
                ),
            )
        }
        _ => (String::new(), String::new()),
    }
}

/// One record per follower, addressed to the follower side of the edge.
pub fn build_user_follower_records(
    follows: &[FollowRelationship],
    event: &NotificationEvent,
) -> Vec<NewNotification> {
    let (title, content) = user_follower_text(event);
    follows
        .iter()
        .map(|follow| NewNotification {
            recipient_id: follow.follower_id,
            title: title.clone(),
            content: content.clone(),
            link: None,
            kind: event.event_type.as_str().to_string(),
            entity_id: event.entity_id,
        })
        .collect()
}

/// One record per enterprise follower, addressed to the following user.
pub fn build_enterprise_follower_records(
    follows: &[EnterpriseFollow],
    event: &NotificationEvent,
) -> Vec<NewNotification> {
    let (title, content) = enterprise_follower_text(event);
    follows
        .iter()
        .map(|follow| NewNotification {
            recipient_id: follow.user_id,
            title: title.clone(),
            content: content.clone(),
            link: None,
            kind: event.event_type.as_str().to_string(),
            entity_id: event.entity_id,
        })
        .collect()
}

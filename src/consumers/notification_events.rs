//! Notification topic: fanout to followers and direct notifications.

use async_trait::async_trait;

use crate::error::Result;
use crate::events::{self, NotificationEvent};
use crate::metrics::ConsumeOutcome;
use crate::services::NotificationFanout;

use super::EventProcessor;

pub struct NotificationEventProcessor {
    fanout: NotificationFanout,
}

impl NotificationEventProcessor {
    pub fn new(fanout: NotificationFanout) -> Self {
        Self { fanout }
    }
}

#[async_trait]
impl EventProcessor for NotificationEventProcessor {
    async fn process(&self, payload: &[u8]) -> Result<ConsumeOutcome> {
        let event: NotificationEvent = events::decode(payload)?;

        if self.fanout.dispatch(&event).await? {
            Ok(ConsumeOutcome::Processed)
        } else {
            Ok(ConsumeOutcome::Skipped)
        }
    }
}

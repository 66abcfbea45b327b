//! Email topic: template selection and single-attempt SMTP delivery.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::events::{self, EmailEvent};
use crate::metrics::ConsumeOutcome;
use crate::services::EmailDispatcher;

use super::EventProcessor;

pub struct EmailEventProcessor {
    dispatcher: EmailDispatcher,
}

impl EmailEventProcessor {
    pub fn new(dispatcher: EmailDispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl EventProcessor for EmailEventProcessor {
    async fn process(&self, payload: &[u8]) -> Result<ConsumeOutcome> {
        let event: EmailEvent = events::decode(payload)?;

        info!(
            event_id = %event.event_id,
            template = event.template_name.as_str(),
            "Email event received"
        );

        if self.dispatcher.dispatch(&event).await? {
            Ok(ConsumeOutcome::Processed)
        } else {
            Ok(ConsumeOutcome::Skipped)
        }
    }
}

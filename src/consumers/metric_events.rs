//! Metric topic: counter mutations on metric aggregates.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::aggregates::{descriptor_for, AggregateDescriptor, CounterStore};
use crate::error::{AppError, Result};
use crate::events::{self, CounterAction, MetricEvent};
use crate::metrics::ConsumeOutcome;

use super::EventProcessor;

/// A decoded metric event resolved against the aggregate registry.
#[derive(Debug)]
pub struct RoutedMetric {
    pub descriptor: &'static AggregateDescriptor,
    pub owner_id: i64,
    pub column: String,
    pub action: CounterAction,
}

/// Decode and classify one payload. Pure routing: no side effects.
///
/// `Ok(None)` is an event whose entity matches no registered aggregate;
/// the caller drops it as a logged no-op.
pub fn route(payload: &[u8]) -> Result<Option<RoutedMetric>> {
    let event: MetricEvent = events::decode(payload)?;

    let Some(descriptor) = descriptor_for(&event.entity) else {
        warn!(
            event_id = event.event_id.as_str(),
            entity = event.entity.as_str(),
            "No aggregate registered for entity; dropping event"
        );
        return Ok(None);
    };

    info!(
        event_id = event.event_id.as_str(),
        entity = descriptor.entity,
        metric_id = event.metric_id,
        column = event.column.as_str(),
        action = event.action.as_str(),
        "Metric event received"
    );

    Ok(Some(RoutedMetric {
        descriptor,
        owner_id: event.metric_id,
        column: event.column,
        action: event.action,
    }))
}

pub struct MetricEventProcessor {
    store: CounterStore,
}

impl MetricEventProcessor {
    pub fn new(store: CounterStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventProcessor for MetricEventProcessor {
    async fn process(&self, payload: &[u8]) -> Result<ConsumeOutcome> {
        let Some(routed) = route(payload)? else {
            return Ok(ConsumeOutcome::Skipped);
        };

        match self
            .store
            .apply(routed.descriptor, routed.owner_id, &routed.column, routed.action)
            .await
        {
            Ok(_) => Ok(ConsumeOutcome::Processed),
            // Unknown column skips the mutation but consumes the message.
            Err(AppError::UnknownColumn { entity, column }) => {
                warn!(entity, column = column.as_str(), "Unknown counter column; skipping mutation");
                Ok(ConsumeOutcome::Skipped)
            }
            Err(err) => Err(err),
        }
    }
}

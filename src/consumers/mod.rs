//! Kafka consumption: one loop per topic, one message at a time.
//!
//! Offsets auto-commit on an interval independent of processing success,
//! so the guarantee is at-least-once and lossy on crash: a failure after a
//! commit checkpoint drops the event. Failures never abort the loop; they
//! are logged with the raw payload at the single-message boundary.

pub mod email_events;
pub mod metric_events;
pub mod notification_events;

pub use email_events::EmailEventProcessor;
pub use metric_events::MetricEventProcessor;
pub use notification_events::NotificationEventProcessor;

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::metrics::{self, ConsumeOutcome};

/// Processes one decoded payload per call. The loop owns error isolation
/// and logging; implementations just decode, route and apply.
#[async_trait]
pub trait EventProcessor: Send + Sync {
    async fn process(&self, payload: &[u8]) -> Result<ConsumeOutcome>;
}

/// Owns one broker subscription and drives it sequentially.
pub struct ConsumerLoop {
    consumer: StreamConsumer,
    topic: String,
    group_id: String,
    shutdown: watch::Receiver<bool>,
}

impl ConsumerLoop {
    /// Build and subscribe a stream consumer for one topic.
    pub fn new(
        brokers: &str,
        topic: &str,
        group_id: &str,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "5000")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "30000")
            .set("heartbeat.interval.ms", "3000")
            .set("max.poll.interval.ms", "300000")
            .set("enable.partition.eof", "false")
            .create()?;

        consumer.subscribe(&[topic])?;

        Ok(Self {
            consumer,
            topic: topic.to_string(),
            group_id: group_id.to_string(),
            shutdown,
        })
    }

    /// Pull messages until shutdown, processing one at a time in delivery
    /// order. Unsubscribes on every exit path: explicitly after the loop,
    /// and through the consumer's teardown on unwind.
    pub async fn run<P: EventProcessor>(mut self, processor: P) {
        info!(
            topic = self.topic.as_str(),
            group = self.group_id.as_str(),
            "Starting consumer loop"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    info!(topic = self.topic.as_str(), "Shutdown requested");
                    break;
                }
                msg = self.consumer.recv() => match msg {
                    Ok(message) => {
                        let Some(payload) = message.payload() else {
                            debug!(topic = self.topic.as_str(), "Message with empty payload");
                            continue;
                        };

                        match processor.process(payload).await {
                            Ok(outcome) => {
                                metrics::observe_consumed(&self.topic, outcome);
                            }
                            Err(err) => {
                                // The message still counts as consumed;
                                // commit progress is on a timer.
                                error!(
                                    topic = self.topic.as_str(),
                                    error = %err,
                                    payload = %String::from_utf8_lossy(payload),
                                    "Failed to process event"
                                );
                                metrics::observe_consumed(&self.topic, ConsumeOutcome::Failed);
                            }
                        }
                    }
                    Err(err) => {
                        error!(topic = self.topic.as_str(), error = %err, "Kafka consumer error");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }

        self.consumer.unsubscribe();
        info!(topic = self.topic.as_str(), "Consumer stopped");
    }
}

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, TextEncoder};

static EVENTS_CONSUMED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "engagement_service_events_consumed_total",
            "Broker messages consumed by engagement-service, by topic and outcome",
        ),
        &["topic", "outcome"],
    )
    .expect("failed to create engagement_service_events_consumed_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register engagement_service_events_consumed_total");
    counter
});

static NOTIFICATIONS_WRITTEN_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "engagement_service_notifications_written_total",
            "Notification rows written by engagement-service, by audience",
        ),
        &["audience"],
    )
    .expect("failed to create engagement_service_notifications_written_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register engagement_service_notifications_written_total");
    counter
});

/// Outcome of a single consumed message, used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Event decoded, routed and applied.
    Processed,
    /// Event consumed without a mutation (unroutable, unknown column).
    Skipped,
    /// Processing raised at the message boundary.
    Failed,
}

impl ConsumeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumeOutcome::Processed => "processed",
            ConsumeOutcome::Skipped => "skipped",
            ConsumeOutcome::Failed => "failed",
        }
    }
}

pub fn observe_consumed(topic: &str, outcome: ConsumeOutcome) {
    EVENTS_CONSUMED_TOTAL
        .with_label_values(&[topic, outcome.as_str()])
        .inc();
}

pub fn observe_notifications_written(audience: &str, count: u64) {
    NOTIFICATIONS_WRITTEN_TOTAL
        .with_label_values(&[audience])
        .inc_by(count);
}

pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

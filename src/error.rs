use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Payload could not be decoded into a typed event.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Event names a counter column the target aggregate does not carry.
    #[error("unknown column {column} on {entity}")]
    UnknownColumn { entity: &'static str, column: String },

    /// No aggregate row exists for the target id. Absence is reported,
    /// never auto-healed.
    #[error("no {entity} aggregate for id {id}")]
    AggregateNotFound { entity: &'static str, id: i64 },

    /// Discriminant matched no registered handler.
    #[error("unroutable event: {0}")]
    UnroutableEvent(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("email delivery failed: {0}")]
    EmailDelivery(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

//! Typed envelopes for the broker messages this service consumes.
//!
//! Each topic carries UTF-8 JSON documents. Decoding is strict on required
//! fields; unrecognized discriminant strings are preserved as catch-all
//! variants so routing can treat them as explicit no-ops instead of decode
//! failures.

pub mod email;
pub mod metric;
pub mod notification;

pub use email::{EmailEvent, TemplateKind};
pub use metric::{CounterAction, EntityKind, MetricEvent};
pub use notification::{NotificationEvent, NotificationKind};

use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// Decode a raw broker payload into a typed event.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|e| AppError::MalformedEvent(e.to_string()))
}

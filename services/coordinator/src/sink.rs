//! Event sink interface
//!
//! Durable, per-key ordered publishing of domain events, four topics
//! keyed by entity id. Publication is fire-and-forget from the
//! coordinator's standpoint: failures are logged and swallowed, and
//! the primary operation still commits.

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;
use types::events::EventEnvelope;

/// Publish failure surfaced by a sink implementation
#[derive(Debug, Clone, Error)]
#[error("Event sink failure: {0}")]
pub struct SinkError(pub String);

/// Downstream event transport
///
/// Implementations must be durable and ordered per key with
/// at-least-once delivery; the broker internals live outside the
/// core.
pub trait EventSink: Send + Sync {
    fn publish(&self, topic: &str, key: &str, envelope: &EventEnvelope) -> Result<(), SinkError>;
}

/// Sink that writes events to the log and nothing else
#[derive(Debug, Default)]
pub struct LoggingEventSink;

impl LoggingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LoggingEventSink {
    fn publish(&self, topic: &str, key: &str, envelope: &EventEnvelope) -> Result<(), SinkError> {
        let payload = serde_json::to_string(envelope).map_err(|e| SinkError(e.to_string()))?;
        debug!(%topic, %key, %payload, "Published event");
        Ok(())
    }
}

/// One captured publication
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    pub topic: String,
    pub key: String,
    pub envelope: EventEnvelope,
}

/// In-memory sink that records every publication, for tests
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    records: Mutex<Vec<PublishedEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Everything published so far, in publication order
    pub fn published(&self) -> Vec<PublishedEvent> {
        self.records.lock().clone()
    }

    /// Publications on one topic, in publication order
    pub fn for_topic(&self, topic: &str) -> Vec<PublishedEvent> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.topic == topic)
            .cloned()
            .collect()
    }
}

impl EventSink for RecordingEventSink {
    fn publish(&self, topic: &str, key: &str, envelope: &EventEnvelope) -> Result<(), SinkError> {
        self.records.lock().push(PublishedEvent {
            topic: topic.to_string(),
            key: key.to_string(),
            envelope: envelope.clone(),
        });
        Ok(())
    }
}

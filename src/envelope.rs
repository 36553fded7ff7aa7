//! Message envelope and its metadata projection

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable wrapper around a message body plus delivery metadata.
///
/// The `mime` field always matches the codec used to encode the envelope;
/// [`crate::client::Client`] and the worker-side rebuild both copy it from
/// the resolved codec's declared content type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub body: Value,
    pub topic: String,
    pub producer: String,
    /// Unix timestamp, seconds
    pub time: i64,
    pub mime: String,
}

impl Envelope {
    pub fn new(body: Value, topic: &str, producer: &str, time: i64, mime: &str) -> Self {
        Self {
            body,
            topic: topic.to_string(),
            producer: producer.to_string(),
            time,
            mime: mime.to_string(),
        }
    }

    /// Metadata projection handed to transports, which never need the body.
    pub fn metadata(&self) -> Metadata {
        Metadata {
            topic: self.topic.clone(),
            producer: self.producer.clone(),
            time: self.time,
            mime: self.mime.clone(),
        }
    }
}

/// Delivery metadata passed to `Transport::submit` independently of the
/// encoded payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub topic: String,
    pub producer: String,
    pub time: i64,
    pub mime: String,
}

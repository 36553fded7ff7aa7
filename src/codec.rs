//! Codec plugin contract and the built-in JSON codec
//!
//! A codec is a pure, stateless serializer: it declares a content type and
//! turns an [`Envelope`] into bytes. Encoding must be deterministic — the
//! same envelope value always yields identical bytes, so at-least-once
//! redelivery on the deferred path resubmits byte-identical payloads.

use crate::envelope::Envelope;
use crate::Result;

/// Pure serializer from envelope to bytes with a declared content type.
pub trait Codec: Send + Sync {
    /// MIME type stamped into every envelope this codec encodes.
    fn content_type(&self) -> &'static str;

    fn encode(&self, envelope: &Envelope) -> Result<Vec<u8>>;
}

/// Built-in JSON codec, registered as `"json"`.
#[derive(Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode(&self, envelope: &Envelope) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(envelope)?)
    }
}

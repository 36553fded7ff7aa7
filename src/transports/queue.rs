//! Queue-backed transport
//!
//! Hands the encoded payload plus metadata to an external payload queue
//! (message bus, SQS-style service) through the [`PayloadQueue`] seam. The
//! queue substrate itself is an external collaborator; this transport only
//! maps its rejections into the common submit-failure shape.

use async_trait::async_trait;

use crate::envelope::Metadata;
use crate::transports::Transport;
use crate::{Result, SubmitFailedError};

const TRANSPORT_NAME: &str = "QueueTransport";

/// Destination queue boundary for the `"queue"` transport.
pub trait PayloadQueue: Send + Sync {
    /// Push a payload onto the named queue; a rejection is reported as a
    /// human-readable detail string.
    fn push(&self, queue: &str, payload: &[u8], metadata: &Metadata) -> std::result::Result<(), String>;
}

pub struct QueueTransport {
    queue_name: String,
    queue: std::sync::Arc<dyn PayloadQueue>,
}

impl QueueTransport {
    pub fn new(queue_name: &str, queue: std::sync::Arc<dyn PayloadQueue>) -> Self {
        Self {
            queue_name: queue_name.to_string(),
            queue,
        }
    }
}

#[async_trait]
impl Transport for QueueTransport {
    fn name(&self) -> &str {
        TRANSPORT_NAME
    }

    async fn submit(&self, payload: &[u8], metadata: &Metadata) -> Result<()> {
        self.queue
            .push(&self.queue_name, payload, metadata)
            .map_err(|detail| SubmitFailedError::new(TRANSPORT_NAME, 500, detail).into())
    }
}

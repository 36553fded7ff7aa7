//! Logging transport
//!
//! Emits each submission through `tracing` instead of delivering it
//! anywhere. Useful as a development destination and as a cheap fan-out leg
//! next to a real transport.

use async_trait::async_trait;
use tracing::info;

use crate::envelope::Metadata;
use crate::transports::Transport;
use crate::Result;

#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl Transport for LogTransport {
    fn name(&self) -> &str {
        "LogTransport"
    }

    async fn submit(&self, payload: &[u8], metadata: &Metadata) -> Result<()> {
        info!(
            topic = %metadata.topic,
            producer = %metadata.producer,
            time = metadata.time,
            mime = %metadata.mime,
            bytes = payload.len(),
            "message submitted"
        );
        Ok(())
    }
}

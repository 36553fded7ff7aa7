//! Transport plugins: delivery of encoded payloads to a destination
//!
//! A transport receives the encoded bytes plus the envelope's metadata
//! projection and delivers them somewhere; it never sees the decoded body.
//! Implementations must be safe for concurrent reuse — every built-in holds
//! either no connection state or an internally pooled client.

pub mod https;
pub mod log;
pub mod multi;
pub mod queue;

pub use https::HttpTransport;
pub use log::LogTransport;
pub use multi::MultiTransport;
pub use queue::{PayloadQueue, QueueTransport};

use async_trait::async_trait;

use crate::envelope::Metadata;
use crate::Result;

/// Delivery contract. Delivery failures surface as
/// [`crate::SubmitFailedError`]; connection-level errors from the underlying
/// client propagate unmodified.
///
/// Deferred sends are redelivered at-least-once by the queue substrate, so
/// `submit` must tolerate receiving the same payload twice.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport identity used in error messages and, sanitized, in metrics
    /// tags for unregistered custom implementations.
    fn name(&self) -> &str;

    async fn submit(&self, payload: &[u8], metadata: &Metadata) -> Result<()>;
}

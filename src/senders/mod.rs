//! Sender strategies: when and where delivery executes
//!
//! One capability trait, two independent implementations chosen at
//! config-resolution time: [`SyncSender`] delivers inline on the caller's
//! task, [`AsyncSender`] enqueues a job for a background worker.

pub mod deferred;
pub mod sync;

pub use deferred::{perform, run_worker, AsyncSender, JobQueue, JobRecord, TokioJobQueue};
pub use sync::SyncSender;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::codec::Codec;
use crate::config::Config;
use crate::loader::Loader;
use crate::metrics::Metrics;
use crate::transports::Transport;
use crate::Result;

/// Delivery strategy contract shared by both sender variants.
#[async_trait]
pub trait Sender: Send + Sync {
    async fn send(&self, object: Value, topic: &str, time: i64) -> Result<()>;
}

/// Plugin bindings resolved once per client and shared by the senders.
pub(crate) struct Pipeline {
    pub(crate) config: Arc<Config>,
    pub(crate) codec: Arc<dyn Codec>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) loader: Arc<dyn Loader>,
    pub(crate) metrics: Arc<Metrics>,
}

//! Client facade
//!
//! Resolves codec, transport, loader, and sender bindings from a [`Config`]
//! exactly once, exposes read accessors for each, and offers the single
//! `send_data` entry point used by application code.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::codec::Codec;
use crate::config::Config;
use crate::loader::Loader;
use crate::metrics::Metrics;
use crate::registry;
use crate::senders::{AsyncSender, Pipeline, Sender, SyncSender};
use crate::transports::Transport;
use crate::{PipecastError, Result};

pub struct Client {
    pipeline: Arc<Pipeline>,
    sender: Arc<dyn Sender>,
}

impl Client {
    /// Resolve all plugin bindings and register the client under its
    /// configured pipe-instance name, so deferred workers can re-resolve it.
    pub fn build(config: Config) -> Result<Arc<Self>> {
        let client = Arc::new(Self::resolve(config)?);
        registry::register_client(Arc::clone(&client));
        Ok(client)
    }

    fn resolve(config: Config) -> Result<Self> {
        config.validate()?;

        let codec = registry::resolve_codec(&config.codec)?;
        let transport = registry::resolve_transport(&config)?;
        let loader = registry::resolve_loader(&config.loader)?;
        let metrics = Arc::new(Metrics::new(&config));
        let config = Arc::new(config);

        let pipeline = Arc::new(Pipeline {
            config: Arc::clone(&config),
            codec,
            transport,
            loader,
            metrics,
        });

        let sender: Arc<dyn Sender> = match config.sender.as_str() {
            "sync" => Arc::new(SyncSender::new(Arc::clone(&pipeline))),
            "async" => {
                let job_queue = config.job_queue.clone().ok_or_else(|| {
                    PipecastError::Config("the async sender requires a job_queue".to_string())
                })?;
                Arc::new(AsyncSender::new(Arc::clone(&pipeline), job_queue))
            }
            other => {
                return Err(PipecastError::UnknownPlugin {
                    kind: "sender",
                    name: other.to_string(),
                })
            }
        };

        info!(
            client = %config.client_name,
            transport = %config.transport_tag(),
            sender = %config.sender,
            "pipecast client resolved"
        );

        Ok(Self { pipeline, sender })
    }

    /// Wrap `object` in an envelope stamped with the current unix time and
    /// hand it to the resolved sender.
    pub async fn send_data<T: Serialize>(&self, object: &T, topic: &str) -> Result<()> {
        let value = serde_json::to_value(object)?;
        let time = chrono::Utc::now().timestamp();
        self.sender.send(value, topic, time).await
    }

    pub fn config(&self) -> &Config {
        &self.pipeline.config
    }

    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.pipeline.codec
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.pipeline.transport
    }

    pub fn loader(&self) -> &Arc<dyn Loader> {
        &self.pipeline.loader
    }

    pub fn metrics(&self) -> &Metrics {
        &self.pipeline.metrics
    }

    pub fn sender(&self) -> &Arc<dyn Sender> {
        &self.sender
    }
}

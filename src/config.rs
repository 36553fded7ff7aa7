//! Client configuration
//!
//! A [`Config`] is built once at startup and never mutated afterwards; the
//! resolved plugin bindings stay fixed for the lifetime of the client built
//! from it, so it can be shared freely across concurrent sends and worker
//! executions without locking.

use std::fmt;
use std::sync::Arc;

use crate::metrics::{CounterSink, RecorderSink};
use crate::senders::deferred::JobQueue;
use crate::transports::queue::PayloadQueue;
use crate::transports::Transport;
use crate::{PipecastError, Result};

/// Configuration value that is either fixed or computed per topic at submit
/// time (used for the HTTP basic-auth credential).
#[derive(Clone)]
pub enum DynamicValue {
    Static(String),
    PerTopic(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl DynamicValue {
    pub fn resolve(&self, topic: &str) -> String {
        match self {
            DynamicValue::Static(value) => value.clone(),
            DynamicValue::PerTopic(f) => f(topic),
        }
    }
}

impl fmt::Debug for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicValue::Static(value) => f.debug_tuple("Static").field(value).finish(),
            DynamicValue::PerTopic(_) => f.write_str("PerTopic(..)"),
        }
    }
}

/// Options for the HTTP transport.
#[derive(Clone)]
pub struct HttpOptions {
    /// Base URL requests are POSTed to.
    pub url: String,
    /// Basic-auth credential in `user:pass` form, static or per topic.
    pub basic_auth: DynamicValue,
    /// Optional per-topic path builder. A result without a leading `/` is
    /// appended to the base URL's path; with a leading `/` it replaces the
    /// base path entirely.
    pub dynamic_path: Option<Arc<dyn Fn(&str) -> String + Send + Sync>>,
}

impl fmt::Debug for HttpOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpOptions")
            .field("url", &self.url)
            .field("basic_auth", &self.basic_auth)
            .field("dynamic_path", &self.dynamic_path.as_ref().map(|_| ".."))
            .finish()
    }
}

/// How one transport slot is selected: by registry key, or as a custom
/// pre-built instance.
#[derive(Clone)]
pub enum TransportSelector {
    Named(String),
    Instance(Arc<dyn Transport>),
}

impl TransportSelector {
    pub fn named(key: &str) -> Self {
        TransportSelector::Named(key.to_string())
    }

    /// Short identifier contributed to the metrics transport tag: the
    /// registry key for named transports, the transport's reported name with
    /// namespace separators stripped for custom instances.
    pub fn tag(&self) -> String {
        match self {
            TransportSelector::Named(key) => key.clone(),
            TransportSelector::Instance(transport) => transport.name().replace("::", ""),
        }
    }
}

impl fmt::Debug for TransportSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportSelector::Named(key) => f.debug_tuple("Named").field(key).finish(),
            TransportSelector::Instance(t) => f.debug_tuple("Instance").field(&t.name()).finish(),
        }
    }
}

/// Immutable client configuration.
#[derive(Clone)]
pub struct Config {
    /// Producer identity stamped into every envelope.
    pub producer_name: String,
    /// Name of this client/pipe instance; key under which the built client
    /// is registered for worker-side re-resolution.
    pub client_name: String,
    /// Loader registry key.
    pub loader: String,
    /// Codec registry key.
    pub codec: String,
    /// One transport (single element) or an ordered fan-out set (several).
    pub transports: Vec<TransportSelector>,
    /// Sender strategy: `"sync"` or `"async"`.
    pub sender: String,
    /// HTTP transport options; required when a `"https"` transport is named.
    pub http: Option<HttpOptions>,
    /// Queue name stamped into deferred job records.
    pub queue_name: String,
    /// Destination for the `"queue"` transport.
    pub payload_queue: Option<Arc<dyn PayloadQueue>>,
    /// Deferred-delivery substrate; required when `sender` is `"async"`.
    pub job_queue: Option<Arc<dyn JobQueue>>,
    /// External counter sink wrapped by [`crate::metrics::Metrics`].
    pub metrics_sink: Arc<dyn CounterSink>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            producer_name: String::new(),
            client_name: String::new(),
            loader: "simple".to_string(),
            codec: "json".to_string(),
            transports: vec![TransportSelector::named("log")],
            sender: "sync".to_string(),
            http: None,
            queue_name: "pipecast".to_string(),
            payload_queue: None,
            job_queue: None,
            metrics_sink: Arc::new(RecorderSink),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("producer_name", &self.producer_name)
            .field("client_name", &self.client_name)
            .field("loader", &self.loader)
            .field("codec", &self.codec)
            .field("transports", &self.transports)
            .field("sender", &self.sender)
            .field("http", &self.http)
            .field("queue_name", &self.queue_name)
            .finish()
    }
}

impl Config {
    /// Deterministic, order-preserving transport identity used in metrics
    /// tags: the single transport's tag, or `multi_<tag>-<tag>-..` for a
    /// fan-out set.
    pub fn transport_tag(&self) -> String {
        let tags: Vec<String> = self.transports.iter().map(TransportSelector::tag).collect();
        if tags.len() == 1 {
            tags.into_iter().next().unwrap_or_default()
        } else {
            format!("multi_{}", tags.join("-"))
        }
    }

    /// Validate structural invariants before plugin resolution.
    pub fn validate(&self) -> Result<()> {
        if self.client_name.is_empty() {
            return Err(PipecastError::Config("client_name must not be empty".to_string()));
        }
        if self.transports.is_empty() {
            return Err(PipecastError::Config(
                "at least one transport must be configured".to_string(),
            ));
        }
        if self.sender == "async" && self.job_queue.is_none() {
            return Err(PipecastError::Config(
                "the async sender requires a job_queue".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Metadata;
    use async_trait::async_trait;

    struct CustomTransport;

    #[async_trait]
    impl Transport for CustomTransport {
        fn name(&self) -> &str {
            "pipecast::MyCustomTransport"
        }

        async fn submit(&self, _payload: &[u8], _metadata: &Metadata) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn single_transport_tag_is_its_key() {
        let config = Config {
            transports: vec![TransportSelector::named("sqs")],
            ..Config::default()
        };
        assert_eq!(config.transport_tag(), "sqs");
    }

    #[test]
    fn composite_tag_preserves_order_and_sanitizes_custom_names() {
        let config = Config {
            transports: vec![
                TransportSelector::named("sqs"),
                TransportSelector::named("log"),
                TransportSelector::Instance(Arc::new(CustomTransport)),
            ],
            ..Config::default()
        };
        assert_eq!(config.transport_tag(), "multi_sqs-log-pipecastMyCustomTransport");
    }

    #[test]
    fn identical_configurations_produce_identical_tags() {
        let build = || Config {
            transports: vec![
                TransportSelector::named("https"),
                TransportSelector::named("log"),
            ],
            ..Config::default()
        };
        assert_eq!(build().transport_tag(), build().transport_tag());
    }

    #[test]
    fn validate_rejects_empty_transports() {
        let config = Config {
            client_name: "c".to_string(),
            transports: vec![],
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(PipecastError::Config(_))));
    }

    #[test]
    fn validate_requires_job_queue_for_async_sender() {
        let config = Config {
            client_name: "c".to_string(),
            sender: "async".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(PipecastError::Config(_))));
    }

    #[test]
    fn dynamic_value_resolves_per_topic() {
        let value = DynamicValue::PerTopic(Arc::new(|topic| format!("test-{topic}:foobar")));
        assert_eq!(value.resolve("marsupials"), "test-marsupials:foobar");

        let fixed = DynamicValue::Static("test-token:x".to_string());
        assert_eq!(fixed.resolve("anything"), "test-token:x");
    }
}

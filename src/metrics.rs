//! Counter metrics tagged with the resolved plugin configuration
//!
//! [`Metrics`] wraps an external counter sink and appends a canonical,
//! deterministically ordered default tag set derived from the [`Config`]:
//! producer, pipe instance, loader, codec, transport identity and sender.
//! The default set is computed once per config and cached; callers only
//! supply operation-specific tags.

use std::sync::Arc;

use crate::config::Config;

/// External counter sink boundary (e.g. statsd, the `metrics` facade).
pub trait CounterSink: Send + Sync {
    fn increment(&self, name: &str, tags: &[String]);
}

/// Default sink forwarding to the `metrics` crate facade; whatever recorder
/// the host application installs receives the counters.
#[derive(Debug, Default)]
pub struct RecorderSink;

impl CounterSink for RecorderSink {
    fn increment(&self, name: &str, tags: &[String]) {
        let labels: Vec<metrics::Label> = tags
            .iter()
            .filter_map(|tag| tag.split_once(':'))
            .map(|(key, value)| metrics::Label::new(key.to_string(), value.to_string()))
            .collect();
        metrics::counter!(name.to_string(), labels).increment(1);
    }
}

/// Counter client with cached per-config default tags.
pub struct Metrics {
    sink: Arc<dyn CounterSink>,
    default_tags: Vec<String>,
}

impl Metrics {
    pub fn new(config: &Config) -> Self {
        Self {
            sink: Arc::clone(&config.metrics_sink),
            default_tags: Self::default_tags(config),
        }
    }

    /// Increment `name` by one, tagged with the default set followed by any
    /// caller-supplied tags.
    pub fn increment(&self, name: &str, tags: &[String]) {
        let mut combined = Vec::with_capacity(self.default_tags.len() + tags.len());
        combined.extend_from_slice(&self.default_tags);
        combined.extend_from_slice(tags);
        self.sink.increment(name, &combined);
    }

    fn default_tags(config: &Config) -> Vec<String> {
        vec![
            format!("producer:{}", config.producer_name.replace(' ', "_")),
            format!("pipe_instance:{}", config.client_name),
            format!("loader:{}", config.loader),
            format!("codec:{}", config.codec),
            format!("transport:{}", config.transport_tag()),
            format!("sender:{}", config.sender),
        ]
    }
}

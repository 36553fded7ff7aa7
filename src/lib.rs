//! Pipecast: configurable outbound message-publishing client
//!
//! Application code hands a serializable object plus a topic name to a
//! [`Client`]; the client wraps it in a metadata [`Envelope`], serializes it
//! through a pluggable [`Codec`], and delivers the payload through a
//! pluggable [`Transport`] — inline on the caller's task or deferred to a
//! background worker. Every operation records success/failure counters
//! tagged with the resolved plugin configuration.
//!
//! ```no_run
//! use pipecast::{Client, Config, DynamicValue, HttpOptions, TransportSelector};
//!
//! # async fn example() -> pipecast::Result<()> {
//! let client = Client::build(Config {
//!     producer_name: "Order Service".to_string(),
//!     client_name: "orders".to_string(),
//!     transports: vec![TransportSelector::named("https")],
//!     http: Some(HttpOptions {
//!         url: "https://events.example.com/ingest".to_string(),
//!         basic_auth: DynamicValue::Static("token:x".to_string()),
//!         dynamic_path: None,
//!     }),
//!     ..Config::default()
//! })?;
//!
//! client.send_data(&serde_json::json!({"order_id": 7}), "orders.created").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod loader;
pub mod metrics;
pub mod registry;
pub mod senders;
pub mod transports;

pub use client::Client;
pub use codec::{Codec, JsonCodec};
pub use config::{Config, DynamicValue, HttpOptions, TransportSelector};
pub use envelope::{Envelope, Metadata};
pub use loader::{Loader, PassthroughLoader};
pub use metrics::{CounterSink, Metrics, RecorderSink};
pub use senders::{AsyncSender, JobQueue, JobRecord, Sender, SyncSender, TokioJobQueue};
pub use transports::{HttpTransport, LogTransport, MultiTransport, PayloadQueue, QueueTransport, Transport};

use thiserror::Error;

/// Transport-level delivery failure: identity of the failing transport, an
/// HTTP-style status code, and the response body (or equivalent detail for
/// non-HTTP transports).
///
/// The `Display` output and [`SubmitFailedError::message`] are identical —
/// some error trackers only ever invoke generic stringification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{transport} couldn't submit message (HTTP response: status={status} body=\"{body}\")")]
pub struct SubmitFailedError {
    pub transport: String,
    pub status: u16,
    pub body: String,
}

impl SubmitFailedError {
    pub fn new(transport: &str, status: u16, body: String) -> Self {
        Self {
            transport: transport.to_string(),
            status,
            body,
        }
    }

    /// Structured message accessor; always equal to the `Display` output.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Pipecast errors
#[derive(Debug, Error)]
pub enum PipecastError {
    #[error(transparent)]
    Submit(#[from] SubmitFailedError),

    /// Aggregate composite-transport failure: every leg was attempted, the
    /// listed ones failed.
    #[error("MultiTransport: {failed} of {total} sub-transports failed ({details})")]
    FanoutFailed {
        failed: usize,
        total: usize,
        details: String,
    },

    /// A configured identifier has no registered implementation. Fatal at
    /// resolution time, never retried.
    #[error("unknown {kind}: {name}")]
    UnknownPlugin { kind: &'static str, name: String },

    #[error("unknown client: {0}")]
    UnknownClient(String),

    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("loader error: {0}")]
    Loader(String),

    #[error("queue error: {0}")]
    Queue(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for pipecast operations
pub type Result<T> = std::result::Result<T, PipecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_failed_message_and_display_agree() {
        let error = SubmitFailedError::new("HttpTransport", 504, "oh, no!".to_string());
        let expected =
            "HttpTransport couldn't submit message (HTTP response: status=504 body=\"oh, no!\")";

        assert_eq!(error.to_string(), expected);
        assert_eq!(error.message(), expected);
    }
}

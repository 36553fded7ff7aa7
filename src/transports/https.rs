//! HTTP transport
//!
//! POSTs the encoded payload to a destination URL. Wire contract:
//! `Content-Type` from the envelope's mime, a product/version user-agent,
//! basic auth (static or computed per topic), and `X-Sent-At` / `X-Topic` /
//! `X-Producer` headers carrying the metadata. Any non-2xx response becomes
//! a [`SubmitFailedError`] with the response status and body; connection
//! errors (timeouts, DNS) propagate unmodified from `reqwest`.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tracing::debug;
use url::Url;

use crate::config::HttpOptions;
use crate::envelope::Metadata;
use crate::transports::Transport;
use crate::{PipecastError, Result, SubmitFailedError};

const TRANSPORT_NAME: &str = "HttpTransport";

fn user_agent() -> String {
    format!("Pipecast v{}", env!("CARGO_PKG_VERSION"))
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    options: HttpOptions,
}

impl HttpTransport {
    pub fn new(options: HttpOptions) -> Result<Self> {
        let base_url = Url::parse(&options.url)
            .map_err(|e| PipecastError::Config(format!("invalid transport url: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            options,
        })
    }

    /// Resolve the target URL for a topic. Without a path builder the base
    /// URL is used as-is. A built path without a leading `/` is appended to
    /// the base path; with a leading `/` it replaces the base path entirely.
    fn resolve_url(&self, topic: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Some(builder) = &self.options.dynamic_path {
            let path = builder(topic);
            if let Some(absolute) = path.strip_prefix('/') {
                url.set_path(absolute);
            } else {
                let base = self.base_url.path().trim_end_matches('/');
                url.set_path(&format!("{base}/{path}"));
            }
        }
        url
    }

    fn auth_header(&self, topic: &str) -> String {
        let credential = self.options.basic_auth.resolve(topic);
        format!("Basic {}", BASE64.encode(credential))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        TRANSPORT_NAME
    }

    async fn submit(&self, payload: &[u8], metadata: &Metadata) -> Result<()> {
        let url = self.resolve_url(&metadata.topic);
        debug!(url = %url, topic = %metadata.topic, bytes = payload.len(), "submitting over HTTP");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, metadata.mime.as_str())
            .header(USER_AGENT, user_agent())
            .header(AUTHORIZATION, self.auth_header(&metadata.topic))
            .header("X-Sent-At", metadata.time.to_string())
            .header("X-Topic", metadata.topic.as_str())
            .header("X-Producer", metadata.producer.as_str())
            .body(payload.to_vec())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SubmitFailedError::new(TRANSPORT_NAME, status.as_u16(), body).into())
        }
    }
}

//! Inline sender: deliver on the caller's task

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::envelope::Envelope;
use crate::senders::{Pipeline, Sender};
use crate::Result;

/// Builds the envelope, encodes it, and submits through the transport before
/// the caller's `send_data` returns. Success and failure counters are tagged
/// with the topic; errors re-surface unmodified after the failure counter is
/// recorded.
pub struct SyncSender {
    pipeline: Arc<Pipeline>,
}

impl SyncSender {
    pub(crate) fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl Sender for SyncSender {
    async fn send(&self, object: Value, topic: &str, time: i64) -> Result<()> {
        let p = &self.pipeline;
        let envelope = Envelope::new(
            object,
            topic,
            &p.config.producer_name,
            time,
            p.codec.content_type(),
        );
        let topic_tag = [format!("topic:{topic}")];

        let result = async {
            let payload = p.codec.encode(&envelope)?;
            p.transport.submit(&payload, &envelope.metadata()).await
        }
        .await;

        match result {
            Ok(()) => {
                p.metrics.increment("pipecast.senders.sync.msg_sent", &topic_tag);
                Ok(())
            }
            Err(e) => {
                p.metrics.increment("pipecast.senders.sync.failure", &topic_tag);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::config::Config;
    use crate::envelope::Metadata;
    use crate::loader::PassthroughLoader;
    use crate::metrics::{CounterSink, Metrics};
    use crate::transports::Transport;
    use crate::{PipecastError, SubmitFailedError};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl CounterSink for RecordingSink {
        fn increment(&self, name: &str, tags: &[String]) {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), tags.to_vec()));
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        fail: bool,
        submitted: Mutex<Vec<(Vec<u8>, Metadata)>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        fn name(&self) -> &str {
            "RecordingTransport"
        }

        async fn submit(&self, payload: &[u8], metadata: &Metadata) -> Result<()> {
            if self.fail {
                return Err(SubmitFailedError::new("RecordingTransport", 504, "oh, no!".to_string()).into());
            }
            self.submitted
                .lock()
                .unwrap()
                .push((payload.to_vec(), metadata.clone()));
            Ok(())
        }
    }

    fn pipeline(transport: Arc<RecordingTransport>, sink: Arc<RecordingSink>) -> Arc<Pipeline> {
        let config = Arc::new(Config {
            producer_name: "Mr. Koala".to_string(),
            client_name: "sync_test".to_string(),
            metrics_sink: sink,
            ..Config::default()
        });
        Arc::new(Pipeline {
            metrics: Arc::new(Metrics::new(&config)),
            config,
            codec: Arc::new(JsonCodec),
            transport,
            loader: Arc::new(PassthroughLoader),
        })
    }

    #[tokio::test]
    async fn delivers_inline_and_counts_success() {
        let transport = Arc::new(RecordingTransport::default());
        let sink = Arc::new(RecordingSink::default());
        let sender = SyncSender::new(pipeline(Arc::clone(&transport), Arc::clone(&sink)));

        sender
            .send(json!({"id": 1}), "marsupials", 123123123)
            .await
            .unwrap();

        let submitted = transport.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].1.topic, "marsupials");
        assert_eq!(submitted[0].1.producer, "Mr. Koala");
        assert_eq!(submitted[0].1.time, 123123123);
        assert_eq!(submitted[0].1.mime, "application/json");

        let calls = sink.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "pipecast.senders.sync.msg_sent");
        assert!(calls[0].1.contains(&"topic:marsupials".to_string()));
    }

    #[tokio::test]
    async fn counts_failure_and_reraises_the_original_error() {
        let transport = Arc::new(RecordingTransport {
            fail: true,
            ..RecordingTransport::default()
        });
        let sink = Arc::new(RecordingSink::default());
        let sender = SyncSender::new(pipeline(transport, Arc::clone(&sink)));

        let err = sender.send(json!(1), "marsupials", 1).await.unwrap_err();
        assert!(matches!(err, PipecastError::Submit(_)));

        let calls = sink.calls.lock().unwrap();
        assert_eq!(calls[0].0, "pipecast.senders.sync.failure");
    }
}

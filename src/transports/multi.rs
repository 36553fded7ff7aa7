//! Composite transport: ordered fan-out to several sub-transports
//!
//! Every sub-transport receives the same payload and metadata, in configured
//! order. A failed leg never short-circuits the rest: all legs are attempted,
//! then a single aggregate error reports every leg that failed. Partial
//! success is therefore visible in the aggregate detail, never silent.

use async_trait::async_trait;
use tracing::warn;

use crate::envelope::Metadata;
use crate::transports::Transport;
use crate::{PipecastError, Result};

pub struct MultiTransport {
    /// `(tag, transport)` pairs in configured order.
    legs: Vec<(String, std::sync::Arc<dyn Transport>)>,
}

impl MultiTransport {
    pub fn new(legs: Vec<(String, std::sync::Arc<dyn Transport>)>) -> Self {
        Self { legs }
    }
}

#[async_trait]
impl Transport for MultiTransport {
    fn name(&self) -> &str {
        "MultiTransport"
    }

    async fn submit(&self, payload: &[u8], metadata: &Metadata) -> Result<()> {
        let mut failures: Vec<(String, String)> = Vec::new();

        for (tag, transport) in &self.legs {
            if let Err(e) = transport.submit(payload, metadata).await {
                warn!(transport = %tag, error = %e, "fan-out leg failed");
                failures.push((tag.clone(), e.to_string()));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            let details = failures
                .iter()
                .map(|(tag, error)| format!("{tag}: {error}"))
                .collect::<Vec<_>>()
                .join("; ");
            Err(PipecastError::FanoutFailed {
                failed: failures.len(),
                total: self.legs.len(),
                details,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::SubmitFailedError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct StubTransport {
        fail: bool,
        order: Arc<Mutex<Vec<&'static str>>>,
        label: &'static str,
        calls: AtomicUsize,
    }

    impl StubTransport {
        fn new(label: &'static str, fail: bool, order: Arc<Mutex<Vec<&'static str>>>) -> Self {
            Self {
                fail,
                order,
                label,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        fn name(&self) -> &str {
            self.label
        }

        async fn submit(&self, _payload: &[u8], _metadata: &Metadata) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.order.lock().unwrap().push(self.label);
            if self.fail {
                Err(SubmitFailedError::new(self.label, 504, "oh, no!".to_string()).into())
            } else {
                Ok(())
            }
        }
    }

    fn metadata() -> Metadata {
        Envelope::new(json!(1), "t", "p", 1, "none").metadata()
    }

    #[tokio::test]
    async fn fans_out_in_configured_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let multi = MultiTransport::new(vec![
            ("a".to_string(), Arc::new(StubTransport::new("a", false, Arc::clone(&order))) as _),
            ("b".to_string(), Arc::new(StubTransport::new("b", false, Arc::clone(&order))) as _),
            ("c".to_string(), Arc::new(StubTransport::new("c", false, Arc::clone(&order))) as _),
        ]);

        multi.submit(b"payload", &metadata()).await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn attempts_every_leg_despite_earlier_failures() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let last = Arc::new(StubTransport::new("c", false, Arc::clone(&order)));
        let multi = MultiTransport::new(vec![
            ("a".to_string(), Arc::new(StubTransport::new("a", true, Arc::clone(&order))) as _),
            ("b".to_string(), Arc::new(StubTransport::new("b", true, Arc::clone(&order))) as _),
            ("c".to_string(), Arc::clone(&last) as _),
        ]);

        let err = multi.submit(b"payload", &metadata()).await.unwrap_err();

        assert_eq!(last.calls.load(Ordering::SeqCst), 1);
        match err {
            PipecastError::FanoutFailed { failed, total, details } => {
                assert_eq!(failed, 2);
                assert_eq!(total, 3);
                assert!(details.contains("a:"));
                assert!(details.contains("b:"));
                assert!(!details.contains("c:"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

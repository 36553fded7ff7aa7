//! Deferred sender: enqueue now, deliver later on a worker
//!
//! The caller's task only decomposes the object and enqueues a job record;
//! delivery happens on an independent worker task with whatever at-least-once
//! semantics the queue substrate provides. Nothing live crosses the execution
//! boundary: the job carries primitive data plus the client's name, and the
//! worker re-resolves the same client through the process-wide registry.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::envelope::Envelope;
use crate::registry;
use crate::senders::{Pipeline, Sender};
use crate::{PipecastError, Result};

/// Positional job arguments: `[decomposed_object, topic, unix_time,
/// client_name]` — serializes as an array, every element primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobArgs(pub Value, pub String, pub i64, pub String);

impl JobArgs {
    pub fn decomposed_object(&self) -> &Value {
        &self.0
    }

    pub fn topic(&self) -> &str {
        &self.1
    }

    pub fn time(&self) -> i64 {
        self.2
    }

    pub fn client_name(&self) -> &str {
        &self.3
    }
}

/// Record handed to the queue substrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub class: String,
    pub retry: bool,
    pub queue: String,
    pub args: JobArgs,
}

/// Queue substrate boundary. Enqueue is fire-and-forget: it returns as soon
/// as the record is accepted, before delivery happens.
pub trait JobQueue: Send + Sync {
    fn enqueue(&self, job: JobRecord) -> Result<()>;
}

/// Enqueues a [`JobRecord`] per send. Decomposition runs here, on the
/// caller's task, because it may depend on live object state that cannot
/// cross the execution boundary.
pub struct AsyncSender {
    pipeline: Arc<Pipeline>,
    job_queue: Arc<dyn JobQueue>,
}

impl AsyncSender {
    pub(crate) fn new(pipeline: Arc<Pipeline>, job_queue: Arc<dyn JobQueue>) -> Self {
        Self { pipeline, job_queue }
    }
}

#[async_trait]
impl Sender for AsyncSender {
    async fn send(&self, object: Value, topic: &str, time: i64) -> Result<()> {
        let p = &self.pipeline;
        let decomposed = p.loader.decompose(&object)?;

        let job = JobRecord {
            class: "Worker".to_string(),
            retry: true,
            queue: p.config.queue_name.clone(),
            args: JobArgs(
                decomposed,
                topic.to_string(),
                time,
                p.config.client_name.clone(),
            ),
        };

        debug!(queue = %job.queue, topic = %topic, "enqueueing deferred delivery");
        self.job_queue.enqueue(job)
    }
}

/// Worker-side execution of one job: re-resolve the client by name, reload
/// the object, rebuild the envelope, encode, submit, count. On any error the
/// failure counter is recorded and the error returned unchanged, so the
/// substrate's retry/backoff governs redelivery.
pub async fn perform(job: &JobRecord) -> Result<()> {
    let client = registry::lookup_client(job.args.client_name())?;

    let object = client.loader().load(job.args.decomposed_object().clone())?;
    let envelope = Envelope::new(
        object,
        job.args.topic(),
        &client.config().producer_name,
        job.args.time(),
        client.codec().content_type(),
    );
    let topic_tag = [format!("topic:{}", job.args.topic())];

    let result = async {
        let payload = client.codec().encode(&envelope)?;
        client.transport().submit(&payload, &envelope.metadata()).await
    }
    .await;

    match result {
        Ok(()) => {
            client
                .metrics()
                .increment("pipecast.senders.async.msg_sent", &topic_tag);
            Ok(())
        }
        Err(e) => {
            client
                .metrics()
                .increment("pipecast.senders.async.failure", &topic_tag);
            Err(e)
        }
    }
}

/// In-process queue substrate over an unbounded tokio channel. No durability
/// and no redelivery; terminal failures are logged and dropped. Durable
/// substrates implement [`JobQueue`] against their own backend and apply
/// their own retry policy around [`perform`].
pub struct TokioJobQueue {
    tx: mpsc::UnboundedSender<JobRecord>,
}

impl TokioJobQueue {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<JobRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl JobQueue for TokioJobQueue {
    fn enqueue(&self, job: JobRecord) -> Result<()> {
        self.tx
            .send(job)
            .map_err(|_| PipecastError::Queue("worker channel closed".to_string()))
    }
}

/// Drain jobs until the channel closes. Spawn this on a worker task next to
/// a [`TokioJobQueue`].
pub async fn run_worker(mut jobs: mpsc::UnboundedReceiver<JobRecord>) {
    info!("deferred delivery worker started");
    while let Some(job) = jobs.recv().await {
        if let Err(e) = perform(&job).await {
            error!(
                queue = %job.queue,
                client = %job.args.client_name(),
                error = %e,
                "deferred delivery failed"
            );
        }
    }
    info!("deferred delivery worker stopped");
}

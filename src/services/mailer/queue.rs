use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Address, MailData, Mailer};
use crate::services::metrics::MetricsRegistry;

/// One message waiting for delivery.
#[derive(Debug, Clone)]
pub struct EmailJob {
    pub recipients: Vec<Address>,
    pub template: &'static str,
    pub data: MailData,
}

/// Fire-and-forget handle onto a bounded delivery queue.
///
/// `enqueue` never waits: a full or closed queue drops the job. Failures are
/// logged and counted, never returned to the caller.
#[derive(Clone)]
pub struct EmailQueue {
    tx: mpsc::Sender<EmailJob>,
    metrics: Arc<MetricsRegistry>,
}

impl EmailQueue {
    /// Spawns the delivery worker and returns the queue handle. The worker
    /// exits once every handle has been dropped.
    pub fn start(
        mailer: Arc<dyn Mailer>,
        capacity: usize,
        metrics: Arc<MetricsRegistry>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(mailer, rx, metrics.clone()));

        (Self { tx, metrics }, worker)
    }

    pub fn enqueue(&self, job: EmailJob) {
        let template = job.template;
        match self.tx.try_send(job) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(template, "email queue full, message dropped");
                self.metrics.record_email(template, "dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!(template, "email worker stopped, message dropped");
                self.metrics.record_email(template, "dropped");
            }
        }
    }
}

async fn run_worker(
    mailer: Arc<dyn Mailer>,
    mut rx: mpsc::Receiver<EmailJob>,
    metrics: Arc<MetricsRegistry>,
) {
    while let Some(job) = rx.recv().await {
        match mailer.send(&job.recipients, job.template, &job.data).await {
            Ok(()) => {
                tracing::debug!(template = job.template, "email sent");
                metrics.record_email(job.template, "sent");
            }
            Err(e) => {
                tracing::error!(error = %e, template = job.template, "failed to send email");
                metrics.record_email(job.template, "failed");
            }
        }
    }

    tracing::info!("email queue closed, worker exiting");
}

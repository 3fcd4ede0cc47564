//! Best-effort notification port
//!
//! Audit logging, sense splits, noise and skip marks are sent without the
//! session waiting for them. A single background task delivers them in the
//! order they were issued; failures are logged and otherwise ignored.

use crate::backend::{Backend, BackendError, Operation};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

#[derive(Debug)]
enum Notification {
    BoundaryClick { uid: String, index: usize },
    Reset { uid: String, form: String },
    SenseSplit { uid: String, context_id: String },
    Noise { uid: String, form: String },
    Skip { uid: String, form: String },
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget sender of backend notifications
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Start the delivery task on the current tokio runtime
    pub fn spawn(backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(deliver(backend, rx));
        Self { tx }
    }

    pub fn boundary_click(&self, uid: &str, index: usize) {
        self.send(Notification::BoundaryClick {
            uid: uid.to_string(),
            index,
        });
    }

    pub fn reset(&self, uid: &str, form: &str) {
        self.send(Notification::Reset {
            uid: uid.to_string(),
            form: form.to_string(),
        });
    }

    pub fn sense_split(&self, uid: &str, context_id: &str) {
        self.send(Notification::SenseSplit {
            uid: uid.to_string(),
            context_id: context_id.to_string(),
        });
    }

    pub fn noise(&self, uid: &str, form: &str) {
        self.send(Notification::Noise {
            uid: uid.to_string(),
            form: form.to_string(),
        });
    }

    pub fn skip(&self, uid: &str, form: &str) {
        self.send(Notification::Skip {
            uid: uid.to_string(),
            form: form.to_string(),
        });
    }

    /// Wait until every notification issued so far has been delivered or failed
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(Notification::Flush(done_tx));
        let _ = done_rx.await;
    }

    fn send(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            warn!("Notification task stopped, dropping notification");
        }
    }
}

async fn deliver(backend: Arc<dyn Backend>, mut rx: mpsc::UnboundedReceiver<Notification>) {
    while let Some(notification) = rx.recv().await {
        let (op, result): (Operation, Result<(), BackendError>) = match notification {
            Notification::BoundaryClick { uid, index } => (
                Operation::AuditBoundaryClick,
                backend.audit_boundary_click(&uid, index).await,
            ),
            Notification::Reset { uid, form } => {
                (Operation::AuditReset, backend.audit_reset(&uid, &form).await)
            }
            Notification::SenseSplit { uid, context_id } => (
                Operation::SplitSense,
                backend.split_sense(&context_id, &uid).await,
            ),
            Notification::Noise { uid, form } => {
                (Operation::MarkNoise, backend.mark_noise(&form, &uid).await)
            }
            Notification::Skip { uid, form } => {
                (Operation::MarkSkip, backend.mark_skip(&form, &uid).await)
            }
            Notification::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };

        match result {
            Ok(()) => debug!(op = %op, "Notification delivered"),
            Err(e) => warn!(op = %op, error = %e, "Notification failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, InMemoryBackend};

    #[tokio::test]
    async fn test_delivered_in_order() {
        let backend = Arc::new(InMemoryBackend::new());
        let notifier = Notifier::spawn(backend.clone());

        notifier.boundary_click("w", 2);
        notifier.boundary_click("w", 0);
        notifier.reset("w", "foxes");
        notifier.flush().await;

        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::AuditBoundaryClick { index: 2 },
                BackendCall::AuditBoundaryClick { index: 0 },
                BackendCall::AuditReset { form: "foxes".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_delivery() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.fail(Operation::MarkSkip);
        let notifier = Notifier::spawn(backend.clone());

        notifier.skip("w", "fox");
        notifier.noise("w", "ox");
        notifier.flush().await;

        assert_eq!(backend.calls_of(Operation::MarkSkip).len(), 1);
        assert_eq!(
            backend.calls_of(Operation::MarkNoise),
            vec![BackendCall::MarkNoise { form: "ox".into() }]
        );
    }
}

//! FIFO write queue in front of the storage backend.
//!
//! Mutators update the snapshot synchronously and then hand the changed keys
//! to this queue.  A single background task applies the writes to the
//! backend one at a time, in the order they were enqueued, so two mutators
//! touching the same key can never land out of order.
//!
//! ```text
//! mutator ─► enqueue(op) ─► [mpsc, unbounded] ─► writer task ─► backend
//!    │                                                 │
//!    └──────────── PendingWrite ◄── oneshot ◄──────────┘
//! ```
//!
//! Dropping a [`PendingWrite`] does not cancel the write.  Dropping the queue
//! closes the channel; the task drains what is already enqueued and exits.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::backend::{StorageBackend, StorageError, StorageMap};
use super::store::StoreError;

/// One backend operation.
#[derive(Debug)]
pub enum WriteOp {
    Set(StorageMap),
    Clear,
}

struct WriteRequest {
    op: WriteOp,
    done: oneshot::Sender<Result<(), StorageError>>,
}

/// Handle to the writer task.
pub struct WriteQueue {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl WriteQueue {
    /// Spawns the writer task.  Must be called inside a Tokio runtime.
    pub fn spawn(backend: Arc<dyn StorageBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(backend, rx));
        Self { tx }
    }

    /// Enqueues `op` and returns a handle resolving once it has been applied.
    pub fn enqueue(&self, op: WriteOp) -> PendingWrite {
        let (done, rx) = oneshot::channel();
        match self.tx.send(WriteRequest { op, done }) {
            Ok(()) => PendingWrite::queued(rx),
            Err(_) => PendingWrite::failed(StoreError::WriterClosed),
        }
    }
}

async fn run_writer(backend: Arc<dyn StorageBackend>, mut rx: mpsc::UnboundedReceiver<WriteRequest>) {
    while let Some(request) = rx.recv().await {
        let result = match request.op {
            WriteOp::Set(items) => {
                let keys: Vec<String> = items.keys().cloned().collect();
                debug!("writing keys {keys:?}");
                backend.set(items).await
            }
            WriteOp::Clear => {
                debug!("clearing storage");
                backend.clear().await
            }
        };
        if let Err(e) = &result {
            warn!("storage write failed: {e}");
        }
        // The caller may have dropped its PendingWrite; that is fine.
        let _ = request.done.send(result);
    }
    debug!("write queue closed");
}

// ── PendingWrite ──────────────────────────────────────────────────────────────

enum PendingInner {
    /// The mutator short-circuited; nothing was written.
    Noop,
    Queued(oneshot::Receiver<Result<(), StorageError>>),
    Failed(Option<StoreError>),
}

/// Completion signal of a mutator's backend write.
///
/// Awaiting yields `Ok(())` once the backend accepted the write, or the
/// backend's error unchanged.  The in-memory snapshot is already updated
/// by the time a `PendingWrite` exists.
pub struct PendingWrite {
    inner: PendingInner,
}

impl PendingWrite {
    pub(crate) fn noop() -> Self {
        Self {
            inner: PendingInner::Noop,
        }
    }

    pub(crate) fn queued(rx: oneshot::Receiver<Result<(), StorageError>>) -> Self {
        Self {
            inner: PendingInner::Queued(rx),
        }
    }

    pub(crate) fn failed(err: StoreError) -> Self {
        Self {
            inner: PendingInner::Failed(Some(err)),
        }
    }

    /// True when the mutator's precondition was not met and nothing changed.
    pub fn is_noop(&self) -> bool {
        matches!(self.inner, PendingInner::Noop)
    }
}

impl Future for PendingWrite {
    type Output = Result<(), StoreError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.inner {
            PendingInner::Noop => Poll::Ready(Ok(())),
            PendingInner::Queued(rx) => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result.map_err(StoreError::from)),
                Poll::Ready(Err(_)) => Poll::Ready(Err(StoreError::WriterClosed)),
                Poll::Pending => Poll::Pending,
            },
            PendingInner::Failed(err) => {
                Poll::Ready(Err(err.take().unwrap_or(StoreError::WriterClosed)))
            }
        }
    }
}

impl std::fmt::Debug for PendingWrite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.inner {
            PendingInner::Noop => "noop",
            PendingInner::Queued(_) => "queued",
            PendingInner::Failed(_) => "failed",
        };
        f.debug_struct("PendingWrite").field("state", &state).finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

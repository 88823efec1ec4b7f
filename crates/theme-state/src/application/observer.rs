//! Diagnostic hook for backend change events.
//!
//! When several processes share one backend, each store only learns about
//! the others' writes through these events.  The observer logs them and
//! nothing else: the local snapshot is not reconciled.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::backend::StorageChange;

/// Spawns a task logging every event from `events` until the stream closes.
pub fn spawn_change_observer(mut events: broadcast::Receiver<StorageChange>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(change) => on_state_changed(&change),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("change observer lagged; {skipped} events dropped")
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!("change observer stopped");
    })
}

fn on_state_changed(change: &StorageChange) {
    debug!(
        "[{}] state change: {:?}",
        change.area_name,
        change.changed_keys()
    );
}

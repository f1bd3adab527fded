use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::models::SyncStatus;

struct StatusState {
    status: SyncStatus,
    generation: u64,
}

/// Sync state shown to the user. Success and failure results reset to
/// `Idle` after `display_for` unless a newer status replaced them.
#[derive(Clone)]
pub struct StatusIndicator {
    state: Arc<Mutex<StatusState>>,
    display_for: Duration,
}

impl StatusIndicator {
    pub fn new(display_for: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(StatusState {
                status: SyncStatus::Idle,
                generation: 0,
            })),
            display_for,
        }
    }

    pub fn current(&self) -> SyncStatus {
        self.state.lock().status.clone()
    }

    /// Must be called inside a tokio runtime when `status` is terminal.
    pub fn set(&self, status: SyncStatus) {
        let terminal = status.is_terminal();
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.status = status;
            state.generation
        };

        if terminal {
            let state = Arc::clone(&self.state);
            let display_for = self.display_for;
            tokio::spawn(async move {
                tokio::time::sleep(display_for).await;
                let mut state = state.lock();
                if state.generation == generation {
                    state.status = SyncStatus::Idle;
                }
            });
        }
    }
}

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};

use super::RemoteStore;
use crate::error::GatewayError;
use crate::models::RemoteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    Ping,
    Fetch,
    Upsert,
    Delete,
}

/// A call as observed by the in-memory remote, failed or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Ping,
    FetchAll,
    Upsert(Vec<String>),
    Delete(Vec<String>),
}

#[derive(Default)]
struct MemoryState {
    rows: BTreeMap<String, RemoteRow>,
    calls: Vec<RemoteCall>,
    failing: HashSet<RemoteOp>,
}

/// A remote table held in process memory.
///
/// Records every call and can be told to reject specific operations.
pub struct InMemoryRemote {
    connected: bool,
    state: Mutex<MemoryState>,
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self {
            connected: true,
            state: Mutex::new(MemoryState::default()),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            state: Mutex::new(MemoryState::default()),
        }
    }

    pub fn with_rows(rows: impl IntoIterator<Item = RemoteRow>) -> Self {
        let remote = Self::new();
        for row in rows {
            remote.insert(row);
        }
        remote
    }

    pub fn insert(&self, row: RemoteRow) {
        self.state.lock().rows.insert(row.id.clone(), row);
    }

    pub fn rows(&self) -> Vec<RemoteRow> {
        self.state.lock().rows.values().cloned().collect()
    }

    pub fn row(&self, id: &str) -> Option<RemoteRow> {
        self.state.lock().rows.get(id).cloned()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Reject every subsequent call of this kind until `recover` is called.
    pub fn fail(&self, op: RemoteOp) {
        self.state.lock().failing.insert(op);
    }

    pub fn recover(&self, op: RemoteOp) {
        self.state.lock().failing.remove(&op);
    }

    fn begin(&self, op: RemoteOp, call: RemoteCall) -> Result<parking_lot::MutexGuard<'_, MemoryState>, GatewayError> {
        if !self.connected {
            return Err(GatewayError::Configuration("in-memory remote is disconnected".to_string()));
        }

        let mut state = self.state.lock();
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(GatewayError::Rejected {
                status: 503,
                message: format!("injected {:?} failure", op),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemote {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        drop(self.begin(RemoteOp::Ping, RemoteCall::Ping)?);
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<RemoteRow>, GatewayError> {
        let state = self.begin(RemoteOp::Fetch, RemoteCall::FetchAll)?;
        Ok(state.rows.values().cloned().collect())
    }

    async fn bulk_upsert(&self, rows: &[RemoteRow]) -> Result<(), GatewayError> {
        let ids = rows.iter().map(|r| r.id.clone()).collect();
        let mut state = self.begin(RemoteOp::Upsert, RemoteCall::Upsert(ids))?;

        for row in rows {
            let mut row = row.clone();
            // The owner column is assigned remotely and survives updates.
            if let Some(existing) = state.rows.get(&row.id) {
                row.user_id = existing.user_id.clone();
                if row.created_at.is_none() {
                    row.created_at = existing.created_at;
                }
            }
            state.rows.insert(row.id.clone(), row);
        }
        Ok(())
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<(), GatewayError> {
        let mut state = self.begin(RemoteOp::Delete, RemoteCall::Delete(ids.to_vec()))?;
        for id in ids {
            state.rows.remove(id);
        }
        Ok(())
    }
}

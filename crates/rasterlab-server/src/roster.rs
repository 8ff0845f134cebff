//! The connection roster.
//!
//! A single owned collection behind one lock, mutated only through these
//! methods - connection tasks never hold a raw reference into it. A watch
//! channel carries a revision counter so an operator view can re-query
//! the snapshot whenever the roster changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::types::{ConnectionId, ConnectionInfo};

/// Shared handle to the live connection list.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Arc<RwLock<BTreeMap<ConnectionId, ConnectionInfo>>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Roster {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Roster {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
            revision: Arc::new(revision),
        }
    }

    /// Add a just-accepted, not-yet-authenticated connection.
    pub async fn register(&self, id: ConnectionId) {
        let mut entries = self.entries.write().await;
        entries.insert(id, ConnectionInfo::new(id));
        drop(entries);
        self.touch();
    }

    /// Record the authenticated user of a connection.
    pub async fn set_user(&self, id: ConnectionId, user: &str) {
        let mut entries = self.entries.write().await;
        if let Some(info) = entries.get_mut(&id) {
            info.user = Some(user.to_string());
        }
        drop(entries);
        self.touch();
    }

    /// Drop a closed connection; returns its last known entry.
    pub async fn remove(&self, id: ConnectionId) -> Option<ConnectionInfo> {
        let mut entries = self.entries.write().await;
        let removed = entries.remove(&id);
        drop(entries);
        self.touch();
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Point-in-time snapshot in connection-id order. Not kept fresh;
    /// observers re-query on each revision change.
    pub async fn snapshot(&self) -> Vec<ConnectionInfo> {
        self.entries.read().await.values().cloned().collect()
    }

    /// Watch for roster changes; the value is a bare revision counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn touch(&self) {
        self.revision.send_if_modified(|rev| {
            *rev += 1;
            true
        });
    }
}

impl Default for Roster {
    fn default() -> Self {
        Roster::new()
    }
}

//! Shared types for the workbench TCP server.

use std::fmt;

/// Identifier for an accepted connection.
///
/// This is intentionally opaque; we just guarantee uniqueness
/// over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One roster entry: a connection and whoever has authenticated on it.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub id: ConnectionId,

    /// Empty until login succeeds on this connection.
    pub user: Option<String>,
}

impl ConnectionInfo {
    pub fn new(id: ConnectionId) -> Self {
        ConnectionInfo { id, user: None }
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user {
            Some(user) => write!(f, "socket {} (user {})", self.id, user),
            None => write!(f, "socket {} (not authorized yet)", self.id),
        }
    }
}

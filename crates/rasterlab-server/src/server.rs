//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ConnectionId` and a roster entry.
//! - Snapshots the catalog into a private workspace per connection.
//! - Spawns one task per connection to drive its session.
//!
//! The per-connection state machine lives in `session`, its socket
//! driver in `connection`.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use rasterlab_core::Catalog;

use crate::config::Config;
use crate::connection;
use crate::credentials::CredentialStore;
use crate::roster::Roster;
use crate::session::Session;
use crate::types::ConnectionId;

/// Global-ish counter for assigning unique `ConnectionId`s.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_connection_id() -> ConnectionId {
    let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
    ConnectionId(id)
}

/// A bound listener plus everything connections are built from.
pub struct Server {
    listener: TcpListener,
    catalog: Catalog,
    credentials: Arc<CredentialStore>,
    roster: Roster,
    max_clients: usize,
}

impl Server {
    /// Bind the listening socket. Failure here is fatal to the server
    /// and surfaced to the caller, never retried.
    pub async fn bind(
        config: &Config,
        catalog: Catalog,
        credentials: CredentialStore,
    ) -> anyhow::Result<Self> {
        let addr = config.socket_addr_string();
        let listener = TcpListener::bind(&addr).await?;
        info!("listening on {}", addr);

        if credentials.is_empty() {
            warn!("credential store is empty; every login will be rejected");
        }

        Ok(Server {
            listener,
            catalog,
            credentials: Arc::new(credentials),
            roster: Roster::new(),
            max_clients: config.max_clients,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle to the live connection roster, for operator views.
    pub fn roster(&self) -> Roster {
        self.roster.clone()
    }

    /// Accept connections forever.
    pub async fn serve(self) -> anyhow::Result<()> {
        loop {
            let (stream, peer_addr) = self.listener.accept().await?;

            if self.roster.len().await >= self.max_clients {
                warn!(
                    %peer_addr,
                    "rejecting connection: max_clients ({}) reached", self.max_clients
                );
                // Just drop the stream; client will see the connection closed.
                continue;
            }

            let id = next_connection_id();
            info!(connection = %id, %peer_addr, "accepted connection");

            // Private universe for this connection: fresh registries,
            // empty model collection, no aliasing to the catalog.
            let workspace = self.catalog.snapshot();
            let session = Session::new(workspace, self.credentials.clone());

            self.roster.register(id).await;
            let roster = self.roster.clone();

            tokio::spawn(async move {
                let result = connection::run_connection(id, stream, session, roster.clone()).await;
                let entry = roster.remove(id).await;
                let who = entry
                    .and_then(|info| info.user)
                    .unwrap_or_else(|| "unauthenticated".to_string());
                match result {
                    Ok(()) => info!(connection = %id, user = %who, "connection ended"),
                    Err(err) => warn!(connection = %id, user = %who, error = %err, "connection failed"),
                }
            });
        }
    }
}

/// Load credentials, bind, and serve - the binary entry point.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let credentials = match &config.accounts_file {
        Some(path) => CredentialStore::load(path)?,
        None => CredentialStore::empty(),
    };

    let server = Server::bind(&config, Catalog::builtin(), credentials).await?;
    server.serve().await
}

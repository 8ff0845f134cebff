//! Per-connection protocol state machine.
//!
//! This is the sans-I/O half of a connection actor: it consumes raw bytes
//! pushed in by the socket driver and emits the replies to write back.
//! Keeping the socket out of here is what lets the state-machine
//! properties (auth gate, length exactness, framing-error tolerance) be
//! tested without a network.
//!
//! States: `AwaitingLogin → Idle ⇄ Receiving{Model|Algorithm}`. There is
//! no terminal state; the driver drops the session when the socket
//! closes, and the workspace snapshot goes with it.

use std::sync::Arc;

use bytes::BytesMut;
use thiserror::Error;
use tracing::{debug, warn};

use rasterlab_core::{AlgorithmError, DocumentError, Workspace};
use rasterlab_protocol::codec::{self, Header, ProtocolError};
use rasterlab_protocol::frame::{AckKind, PayloadKind};
use rasterlab_protocol::payload;

use crate::credentials::CredentialStore;

/// Where a session is in the request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing is actioned until a registered login line arrives.
    AwaitingLogin,

    /// Authenticated, waiting for the next request header.
    Idle,

    /// A data header declared `expected` body bytes; collecting them.
    Receiving { kind: PayloadKind, expected: usize },
}

/// One frame to write back to the peer.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// `Login:OK` line.
    LoginOk,

    /// `Success:<code>` / `Error:<code>` line.
    Ack { kind: AckKind, code: u32 },

    /// `Model:<n>` header plus this compressed body.
    Model(Vec<u8>),
}

impl Reply {
    pub fn success() -> Self {
        Reply::Ack {
            kind: AckKind::Success,
            code: 0,
        }
    }

    pub fn error() -> Self {
        Reply::Ack {
            kind: AckKind::Error,
            code: 0,
        }
    }
}

/// Everything one `receive` call produced.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Frames to write, in order.
    pub replies: Vec<Reply>,

    /// Set when this batch of bytes completed a login; the driver
    /// forwards it to the roster.
    pub authenticated: Option<String>,
}

#[derive(Debug, Error)]
enum RequestError {
    #[error(transparent)]
    Wire(#[from] ProtocolError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Execution(#[from] AlgorithmError),
}

/// The per-connection state machine.
///
/// Owns the connection's receive buffer, its workspace snapshot, and the
/// authenticated-user slot. Frame handling is never re-entrant: one
/// `receive` call drains as far as the buffered bytes allow and returns.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    buffer: BytesMut,
    workspace: Workspace,
    credentials: Arc<CredentialStore>,
    user: Option<String>,
}

impl Session {
    pub fn new(workspace: Workspace, credentials: Arc<CredentialStore>) -> Self {
        Session {
            state: SessionState::AwaitingLogin,
            buffer: BytesMut::new(),
            workspace,
            credentials,
            user: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Feed received bytes through the state machine.
    ///
    /// Consumes as many complete frames as the buffer now holds; a body
    /// shorter than its declared length stays buffered and the session
    /// stays in its `Receiving` state until the rest arrives.
    pub fn receive(&mut self, bytes: &[u8]) -> Outcome {
        self.buffer.extend_from_slice(bytes);
        let mut outcome = Outcome::default();

        loop {
            match self.state {
                SessionState::AwaitingLogin | SessionState::Idle => {
                    let Some(line) = codec::take_line(&mut self.buffer) else {
                        break;
                    };
                    self.handle_header_line(&line, &mut outcome);
                }
                SessionState::Receiving { kind, expected } => {
                    if self.buffer.len() < expected {
                        break;
                    }
                    let body = self.buffer.split_to(expected);
                    self.state = SessionState::Idle;
                    self.react(kind, &body, &mut outcome);
                }
            }
        }

        outcome
    }

    fn handle_header_line(&mut self, line: &str, outcome: &mut Outcome) {
        let header = match codec::parse_header(line) {
            Ok(header) => header,
            Err(err) => {
                // Framing error: ignore the line, stay in the current state.
                warn!(error = %err, "ignoring malformed header line");
                return;
            }
        };

        match (self.state, header) {
            (SessionState::AwaitingLogin, Header::Login { user, digest }) => {
                if self.credentials.verify(&user, &digest) {
                    debug!(user = %user, "login accepted");
                    self.user = Some(user.clone());
                    self.state = SessionState::Idle;
                    outcome.authenticated = Some(user);
                    outcome.replies.push(Reply::LoginOk);
                } else {
                    // Rejected logins get no reply at all; the peer is
                    // expected to time out and may try again.
                    debug!(user = %user, "login rejected");
                }
            }
            (SessionState::AwaitingLogin, Header::Data { kind, .. }) => {
                warn!(kind = kind.as_str(), "payload header before login ignored");
            }
            (SessionState::Idle, Header::Data { kind, len }) => {
                self.state = SessionState::Receiving {
                    kind,
                    expected: len,
                };
            }
            (SessionState::Idle, Header::Login { user, .. }) => {
                warn!(user = %user, "login on authenticated connection ignored");
            }
            (_, Header::LoginOk) | (_, Header::Ack { .. }) => {
                warn!("server-direction header from peer ignored");
            }
            (SessionState::Receiving { .. }, _) => {
                // Unreachable: header lines are only read outside Receiving.
            }
        }
    }

    fn react(&mut self, kind: PayloadKind, body: &[u8], outcome: &mut Outcome) {
        match kind {
            PayloadKind::Model => match self.ingest_model(body) {
                Ok(name) => {
                    debug!(model = %name, "model ingested");
                    outcome.replies.push(Reply::success());
                }
                Err(err) => {
                    warn!(error = %err, "model upload failed");
                    outcome.replies.push(Reply::error());
                }
            },
            PayloadKind::Algorithm => match self.execute_algorithm(body) {
                Ok(frames) => {
                    let count = frames.len();
                    outcome
                        .replies
                        .extend(frames.into_iter().map(Reply::Model));
                    outcome.replies.push(Reply::success());
                    debug!(results = count, "algorithm completed");
                }
                Err(err) => {
                    warn!(error = %err, "algorithm execution failed");
                    outcome.replies.push(Reply::error());
                }
            },
        }
    }

    fn ingest_model(&self, body: &[u8]) -> Result<String, RequestError> {
        let doc = payload::decode_document(body)?;
        Ok(self.workspace.ingest_document(&doc)?)
    }

    /// Decode, resolve, and synchronously run an algorithm; result models
    /// are encoded up front so a failure sends a single `Error` ack and
    /// no partial result stream.
    fn execute_algorithm(&self, body: &[u8]) -> Result<Vec<Vec<u8>>, RequestError> {
        let doc = payload::decode_document(body)?;
        let algorithm = self.workspace.decode_algorithm(&doc)?;
        let results = algorithm.run()?;

        let mut frames = Vec::with_capacity(results.len());
        for model in &results {
            debug!(result = %self.workspace.render(model.as_ref()), "algorithm result");
            frames.push(payload::encode_model(model.as_ref())?);
        }
        Ok(frames)
    }
}

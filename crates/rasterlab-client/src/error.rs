//! Client-side error taxonomy.
//!
//! A transport failure is terminal for the current operation; the caller
//! reconnects and retries from `login`. A `Rejected` ack leaves the
//! connection usable for the next request.

use std::io;
use std::time::Duration;

use thiserror::Error;

use rasterlab_core::DocumentError;
use rasterlab_protocol::ProtocolError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("i/o: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The server stayed silent past the login deadline - indistinguishable
    /// from a rejected login by design.
    #[error("no login acknowledgement within {0:?}")]
    LoginTimeout(Duration),

    /// The server answered the login with something other than `Login:OK`.
    #[error("login rejected: {0:?}")]
    LoginRejected(String),

    /// The server answered the request with an `Error` ack.
    #[error("request rejected by server (code {0})")]
    Rejected(u32),

    /// The connection closed before the exchange completed.
    #[error("connection closed by server")]
    Disconnected,

    /// A frame that makes no sense at this point in the exchange.
    #[error("unexpected frame: {0:?}")]
    UnexpectedFrame(String),
}

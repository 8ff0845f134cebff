//! The client session.
//!
//! Mirrors the server's one-request/one-response discipline: every send
//! blocks the calling task until the peer's acknowledgement (or result
//! stream) has been read. A GUI caller is expected to run this off its
//! interactive thread.

use std::time::Duration;

use bytes::BytesMut;
use md5::{Digest, Md5};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use rasterlab_core::{Algorithm, Catalog, Model, Workspace};
use rasterlab_protocol::codec::{self, Header};
use rasterlab_protocol::frame::{AckKind, PayloadKind};
use rasterlab_protocol::payload;

use crate::error::ClientError;

const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

/// One connection to a remote workbench server.
///
/// Result models are materialized into the client's own workspace
/// snapshot, so the caller can look them up by name afterwards.
#[derive(Debug)]
pub struct WorkbenchClient {
    stream: TcpStream,
    read_buffer: BytesMut,
    workspace: Workspace,
    login_timeout: Duration,
}

impl WorkbenchClient {
    /// Connect to `addr`, materializing results against a snapshot of
    /// the given catalog.
    pub async fn connect(addr: &str, catalog: &Catalog) -> Result<Self, ClientError> {
        info!("connecting to {}...", addr);
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        info!("connected");

        Ok(WorkbenchClient {
            stream,
            read_buffer: BytesMut::with_capacity(65536),
            workspace: catalog.snapshot(),
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
        })
    }

    /// Deadline applied to the login acknowledgement. A server rejects a
    /// bad login with silence, so this is the only way to observe one.
    pub fn set_login_timeout(&mut self, deadline: Duration) {
        self.login_timeout = deadline;
    }

    /// The workspace result models are materialized into.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Hash the password and log in; waits for `Login:OK`.
    pub async fn login(&mut self, user: &str, password: &str) -> Result<(), ClientError> {
        let line = codec::render_login(user, &password_digest(password));
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.flush().await?;

        let reply = match timeout(self.login_timeout, self.read_line()).await {
            Ok(read) => read?.ok_or(ClientError::Disconnected)?,
            Err(_) => return Err(ClientError::LoginTimeout(self.login_timeout)),
        };

        match codec::parse_header(&reply) {
            Ok(Header::LoginOk) => {
                debug!(user = %user, "login acknowledged");
                Ok(())
            }
            _ => Err(ClientError::LoginRejected(reply)),
        }
    }

    /// Upload one prerequisite model and wait for the ack.
    pub async fn send_model(&mut self, model: &dyn Model) -> Result<(), ClientError> {
        let body = payload::encode_model(model)?;
        self.write_data_frame(PayloadKind::Model, &body).await?;
        debug!(model = %model.name(), bytes = body.len(), "model sent");

        match self.read_ack().await? {
            (AckKind::Success, _) => Ok(()),
            (AckKind::Error, code) => Err(ClientError::Rejected(code)),
        }
    }

    /// Submit an algorithm and collect its result models.
    ///
    /// Each incoming `Model` frame is materialized into the client
    /// workspace; the returned names are in arrival order. The exchange
    /// ends at the server's closing `Success` ack, or with `Rejected` on
    /// an `Error` ack. On a mid-stream disconnect the models received so
    /// far stay in the workspace.
    pub async fn run_algorithm(
        &mut self,
        algorithm: &dyn Algorithm,
    ) -> Result<Vec<String>, ClientError> {
        let body = payload::encode_algorithm(algorithm)?;
        self.write_data_frame(PayloadKind::Algorithm, &body).await?;
        debug!(
            algorithm = algorithm.type_name(),
            bytes = body.len(),
            "algorithm sent"
        );

        let mut results = Vec::new();
        loop {
            let line = self.read_line().await?.ok_or(ClientError::Disconnected)?;
            match codec::parse_header(&line) {
                Ok(Header::Data {
                    kind: PayloadKind::Model,
                    len,
                }) => {
                    let body = self.read_body(len).await?;
                    let doc = payload::decode_document(&body)?;
                    let name = self.workspace.ingest_document(&doc)?;
                    debug!(model = %name, "result model received");
                    results.push(name);
                }
                Ok(Header::Ack {
                    kind: AckKind::Success,
                    ..
                }) => return Ok(results),
                Ok(Header::Ack {
                    kind: AckKind::Error,
                    code,
                }) => return Err(ClientError::Rejected(code)),
                _ => return Err(ClientError::UnexpectedFrame(line)),
            }
        }
    }

    async fn write_data_frame(
        &mut self,
        kind: PayloadKind,
        body: &[u8],
    ) -> Result<(), ClientError> {
        let header = codec::render_data_header(kind, body.len());
        self.stream.write_all(header.as_bytes()).await?;
        self.stream.write_all(body).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn read_ack(&mut self) -> Result<(AckKind, u32), ClientError> {
        let line = self.read_line().await?.ok_or(ClientError::Disconnected)?;
        match codec::parse_header(&line) {
            Ok(Header::Ack { kind, code }) => Ok((kind, code)),
            _ => Err(ClientError::UnexpectedFrame(line)),
        }
    }

    /// Read one terminated header line; `None` on a clean EOF.
    async fn read_line(&mut self) -> Result<Option<String>, ClientError> {
        loop {
            if let Some(line) = codec::take_line(&mut self.read_buffer) {
                return Ok(Some(line));
            }
            let mut buf = [0u8; 4096];
            let n = self.stream.read(&mut buf).await?;
            if n == 0 {
                return Ok(None);
            }
            self.read_buffer.extend_from_slice(&buf[..n]);
        }
    }

    /// Accumulate exactly `len` body bytes; never returns short.
    async fn read_body(&mut self, len: usize) -> Result<Vec<u8>, ClientError> {
        while self.read_buffer.len() < len {
            let mut buf = [0u8; 4096];
            let n = self.stream.read(&mut buf).await?;
            if n == 0 {
                return Err(ClientError::Disconnected);
            }
            self.read_buffer.extend_from_slice(&buf[..n]);
        }
        Ok(self.read_buffer.split_to(len).to_vec())
    }
}

/// Lowercase md5 hex of a password, as the login line carries it.
pub fn password_digest(password: &str) -> String {
    let digest = Md5::digest(password.as_bytes());
    format!("{digest:x}")
}

//! Socket driver for one connection's session.
//!
//! Reads block until bytes arrive, every buffered frame is processed
//! before the next read, and replies are written flush-and-wait - the
//! strictly sequential one-request/one-response discipline of the
//! protocol. A read or write failure ends the connection; the caller
//! removes the roster entry.

use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tracing::{debug, info};

use rasterlab_protocol::codec;
use rasterlab_protocol::frame::PayloadKind;

use crate::roster::Roster;
use crate::session::{Reply, Session};
use crate::types::ConnectionId;

/// Run the I/O loop for a single connection until the socket closes.
pub(crate) async fn run_connection(
    id: ConnectionId,
    stream: TcpStream,
    mut session: Session,
    roster: Roster,
) -> io::Result<()> {
    let (mut reader, mut writer) = stream.into_split();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            // EOF - peer disconnected
            debug!(connection = %id, "peer closed connection");
            break;
        }

        let outcome = session.receive(&buf[..n]);

        if let Some(user) = &outcome.authenticated {
            info!(connection = %id, user = %user, "user authenticated");
            roster.set_user(id, user).await;
        }

        for reply in &outcome.replies {
            write_reply(&mut writer, reply).await?;
        }
    }

    Ok(())
}

async fn write_reply(writer: &mut OwnedWriteHalf, reply: &Reply) -> io::Result<()> {
    match reply {
        Reply::LoginOk => {
            writer
                .write_all(codec::render_login_ok().as_bytes())
                .await?;
        }
        Reply::Ack { kind, code } => {
            writer
                .write_all(codec::render_ack(*kind, *code).as_bytes())
                .await?;
        }
        Reply::Model(body) => {
            let header = codec::render_data_header(PayloadKind::Model, body.len());
            writer.write_all(header.as_bytes()).await?;
            writer.write_all(body).await?;
        }
    }
    writer.flush().await
}

//! Header-line rendering and parsing.
//!
//! A header line splits on `:` into exactly two fields (`Type:Length` for
//! data frames, `Type:Code` for acks, `Login:OK` for the login ack) or
//! exactly three for the client's login request (`Login:user:digest`).
//! Anything else is a framing error; receivers log and ignore the line
//! and keep waiting for a well-formed header.

use bytes::BytesMut;
use thiserror::Error;

use crate::frame::{AckKind, PayloadKind, LINE_TERM, LOGIN_LINE_TERM, LOGIN_OK, MAX_PAYLOAD_LEN};

/// Errors that can arise while framing or unframing wire data.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Header line does not split into a known shape.
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    /// First header field is not a known frame type.
    #[error("unknown frame type: {0:?}")]
    UnknownFrameType(String),

    /// Length/code field is not a number.
    #[error("invalid numeric field in header: {0:?}")]
    InvalidNumber(String),

    /// Declared body length exceeds [`MAX_PAYLOAD_LEN`].
    #[error("declared length {0} exceeds payload cap")]
    OversizedPayload(usize),

    /// Payload compression or decompression failed.
    #[error("payload codec: {0}")]
    Compression(#[from] std::io::Error),

    /// Payload decompressed but is not a well-formed document.
    #[error(transparent)]
    Document(#[from] rasterlab_core::DocumentError),
}

/// A parsed header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    /// `Login:<user>:<md5 hex digest>` - client login request.
    Login { user: String, digest: String },

    /// `Login:OK` - server login acknowledgement.
    LoginOk,

    /// `Model:<n>` / `Algorithm:<n>` - `n` body bytes follow.
    Data { kind: PayloadKind, len: usize },

    /// `Success:<code>` / `Error:<code>`.
    Ack { kind: AckKind, code: u32 },
}

/// Render a data-frame header, e.g. `"Model:1234\n"`.
pub fn render_data_header(kind: PayloadKind, len: usize) -> String {
    format!("{}:{}{}", kind.as_str(), len, LINE_TERM)
}

/// Render an acknowledgement, e.g. `"Success:0\n"`.
pub fn render_ack(kind: AckKind, code: u32) -> String {
    format!("{}:{}{}", kind.as_str(), code, LINE_TERM)
}

/// Render the client login request line.
pub fn render_login(user: &str, digest: &str) -> String {
    format!("Login:{}:{}{}", user, digest, LOGIN_LINE_TERM)
}

/// Render the server login acknowledgement line.
pub fn render_login_ok() -> String {
    format!("{}{}", LOGIN_OK, LINE_TERM)
}

/// Parse one header line (already stripped of its terminator).
pub fn parse_header(line: &str) -> Result<Header, ProtocolError> {
    let fields: Vec<&str> = line.split(':').collect();

    match fields.as_slice() {
        ["Login", user, digest] => Ok(Header::Login {
            user: user.to_string(),
            digest: digest.to_string(),
        }),
        ["Login", "OK"] => Ok(Header::LoginOk),
        [kind, value] => {
            if let Some(kind) = PayloadKind::from_token(kind) {
                let len: usize = value
                    .parse()
                    .map_err(|_| ProtocolError::InvalidNumber(line.to_string()))?;
                if len > MAX_PAYLOAD_LEN {
                    return Err(ProtocolError::OversizedPayload(len));
                }
                Ok(Header::Data { kind, len })
            } else if let Some(kind) = AckKind::from_token(kind) {
                let code: u32 = value
                    .parse()
                    .map_err(|_| ProtocolError::InvalidNumber(line.to_string()))?;
                Ok(Header::Ack { kind, code })
            } else {
                Err(ProtocolError::UnknownFrameType((*kind).to_string()))
            }
        }
        _ => Err(ProtocolError::MalformedHeader(line.to_string())),
    }
}

/// Split one terminated line off the front of a receive buffer.
///
/// Returns `None` while no full line has arrived. The terminator (and a
/// preceding `\r`, for the login line) is consumed but not returned.
pub fn take_line(buf: &mut BytesMut) -> Option<String> {
    let pos = buf.iter().position(|&b| b == b'\n')?;
    let line = buf.split_to(pos + 1);
    let mut end = line.len() - 1;
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    Some(String::from_utf8_lossy(&line[..end]).into_owned())
}

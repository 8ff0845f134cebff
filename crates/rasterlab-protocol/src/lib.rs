//! rasterlab-protocol
//!
//! Wire-level framing for the remote execution protocol.
//!
//! This crate is responsible for turning logical exchanges (login, model
//! upload, algorithm upload, acks, result models) into bytes and back:
//!
//! - [`frame`]   : frame kinds and wire constants
//! - [`codec`]   : header-line and ack rendering/parsing
//! - [`payload`] : gzip payload compression over tagged documents

pub mod frame;
pub mod codec;
pub mod payload;

pub use frame::{AckKind, PayloadKind, MAX_PAYLOAD_LEN};
pub use codec::{parse_header, take_line, Header, ProtocolError};
pub use payload::{compress, decode_document, decompress, encode_algorithm, encode_model};

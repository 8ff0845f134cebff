//! Frame kinds and wire constants.
//!
//! Headers are human-readable `:`-separated text lines terminated by a
//! line break; bodies are raw length-delimited bytes with no further
//! framing, so receivers never scan a body for a terminator. The login
//! request is the one frame transmitted as a self-delimited text line
//! (terminated `\r\n`) instead of a length-prefixed body.
//!
//! The actual render/parse logic lives in `codec`.

/// Line terminator for every header except the login request.
pub const LINE_TERM: &str = "\n";

/// Line terminator of the client's login request line.
pub const LOGIN_LINE_TERM: &str = "\r\n";

/// The server's login acknowledgement line.
pub const LOGIN_OK: &str = "Login:OK";

/// Upper bound accepted for a declared body length. A header declaring
/// more than this is treated as a framing error rather than an
/// allocation request.
pub const MAX_PAYLOAD_LEN: usize = 1_073_741_824; // 1 GB

/// Body-carrying frame kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadKind {
    /// A serialized model (either direction).
    Model,

    /// A serialized algorithm description (client → server only).
    Algorithm,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Model => "Model",
            PayloadKind::Algorithm => "Algorithm",
        }
    }

    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "Model" => Some(PayloadKind::Model),
            "Algorithm" => Some(PayloadKind::Algorithm),
            _ => None,
        }
    }
}

/// Bodyless acknowledgement kinds (server → client).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AckKind {
    Success,
    Error,
}

impl AckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AckKind::Success => "Success",
            AckKind::Error => "Error",
        }
    }

    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "Success" => Some(AckKind::Success),
            "Error" => Some(AckKind::Error),
            _ => None,
        }
    }
}

//! rasterlab-client
//!
//! Client session for the remote workbench execution protocol: connect,
//! log in, upload the models an algorithm needs, submit the algorithm,
//! and materialize the result models streamed back.

pub mod error;
pub mod network;

pub use error::ClientError;
pub use network::WorkbenchClient;

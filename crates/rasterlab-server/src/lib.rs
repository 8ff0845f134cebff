//! rasterlab-server
//!
//! Multi-client async TCP server for remote workbench algorithm execution.

pub mod config;
pub mod credentials;
pub mod roster;
pub mod server;
pub mod session;
pub mod types;

// internal module, not re-exported
mod connection;

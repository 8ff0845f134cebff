//! Configuration for the workbench TCP server.
//!
//! For now this is intentionally simple: you can either use defaults
//! or override via a few environment variables:
//!
//! - `RASTERLAB_BIND_ADDR`     (default: "0.0.0.0")
//! - `RASTERLAB_PORT`          (default: "9300")
//! - `RASTERLAB_MAX_CLIENTS`   (default: "1024")
//! - `RASTERLAB_ACCOUNTS_FILE` (no default; without it no login succeeds)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// Path to the `user:md5hex` accounts file.
    pub accounts_file: Option<PathBuf>,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to reasonable defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("RASTERLAB_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("RASTERLAB_PORT", 9300u16)?;
        let max_clients = read_env_or_default("RASTERLAB_MAX_CLIENTS", 1024usize)?;
        let accounts_file = env::var("RASTERLAB_ACCOUNTS_FILE").ok().map(PathBuf::from);

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            accounts_file,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => Ok(val.parse::<T>()?),
        Err(_) => Ok(default),
    }
}

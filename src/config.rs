// Query server configuration
use std::time::Duration;

use crate::args::Args;
use crate::constants::DEFAULT_CACHE_CAPACITY;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `host:port` to bind.
    pub address: String,
    pub cache_capacity: usize,
    /// Read/write timeout applied to each accepted connection.
    pub io_timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            address: format!("{}:{}", args.host, args.port),
            cache_capacity: args.cache_capacity,
            io_timeout: args.read_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Ephemeral localhost port with default settings.
    pub fn local_ephemeral() -> Self {
        Self {
            address: "127.0.0.1:0".to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            io_timeout: Some(Duration::from_secs(10)),
        }
    }
}

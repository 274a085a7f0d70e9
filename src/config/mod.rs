//! Configuration module for Sockrelay
//!
//! The proxy takes all of its settings from the command line; this module
//! turns them into an immutable [`Config`] that is shared by every
//! connection handler.

mod rewrite;
mod socks;

pub use rewrite::RewriteTable;
pub use socks::{SocksConfig, Verbosity, DEFAULT_CONNECT_TIMEOUT, MAX_VERBOSITY};

/// Default listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8888";

/// Root configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the proxy listens on (`ip:port`)
    pub listen: String,

    /// SOCKS5 handshake configuration
    pub socks: SocksConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: DEFAULT_LISTEN_ADDR.to_string(),
            socks: SocksConfig::default(),
        }
    }
}

impl Config {
    /// Build a configuration from the raw command line values
    pub fn from_args(listen: impl Into<String>, rewrite: &str, verbose: u8) -> Self {
        Config {
            listen: listen.into(),
            socks: SocksConfig {
                rewrites: RewriteTable::parse(rewrite),
                verbosity: Verbosity::from(verbose),
                ..Default::default()
            },
        }
    }
}

//! # Sockrelay - SOCKS5 CONNECT proxy with hostname rewriting
//!
//! Sockrelay accepts SOCKS5 clients, negotiates the handshake, resolves the
//! requested destination (optionally substituting the hostname through a
//! rewrite table), dials it, and relays bytes in both directions until
//! either side closes.
//!
//! ## Features
//!
//! - **CONNECT only**: BIND and UDP ASSOCIATE are rejected with a reply
//! - **No authentication**: clients must offer method `0x00`
//! - **Hostname rewriting**: `--rewrite a.example:b.example` resolves
//!   `b.example` whenever a client asks for `a.example`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sockrelay::config::Config;
//! use sockrelay::server::Server;
//! use tokio::sync::broadcast;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_args("127.0.0.1:1080", "a.example:b.example", 1);
//!     let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
//!
//!     Server::bind(&config).await?.run(shutdown_rx).await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Client -> Listener -> Handshake -> Relay <-> Destination
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod server;
pub mod socks;

// Re-export commonly used items
pub use config::{Config, RewriteTable, SocksConfig, Verbosity};
pub use error::{HandshakeError, Socks5ReplyCode};
pub use server::Server;

/// Version of the Sockrelay library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");

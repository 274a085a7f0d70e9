//! SOCKS5 handshake configuration
//!
//! Everything the handshake engine and relay need, captured once at startup.

use super::RewriteTable;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Default destination dial timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Highest supported verbosity level
pub const MAX_VERBOSITY: u8 = 3;

/// Logging verbosity selected with `--verbose`
///
/// * 0 - silent
/// * 1 - connection-level logs
/// * 2 - adds resolution logs
/// * 3 - adds rewrite rules and raw payload logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Create a verbosity level, clamped to [`MAX_VERBOSITY`]
    pub fn new(level: u8) -> Self {
        Verbosity(level.min(MAX_VERBOSITY))
    }

    /// Maximum tracing level enabled at this verbosity
    pub fn level_filter(self) -> LevelFilter {
        match self.0 {
            0 => LevelFilter::OFF,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        Verbosity::new(level)
    }
}

/// SOCKS5 server configuration
#[derive(Debug, Clone)]
pub struct SocksConfig {
    /// Hostname substitutions applied before resolution
    pub rewrites: RewriteTable,

    /// Destination dial timeout
    pub connect_timeout: Duration,

    /// Logging verbosity
    pub verbosity: Verbosity,
}

impl Default for SocksConfig {
    fn default() -> Self {
        Self {
            rewrites: RewriteTable::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            verbosity: Verbosity::default(),
        }
    }
}

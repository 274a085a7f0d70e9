//! Error types for Sockrelay
//!
//! This module defines the handshake error taxonomy and the SOCKS5 reply
//! status codes written back to clients.

use std::io;
use thiserror::Error;

/// Errors that abort a SOCKS5 handshake
///
/// Every variant is fatal to the single connection it occurred on. None of
/// them cause a reply to be written; failures that *are* reported to the
/// client end the handshake with [`HandshakeOutcome::Failed`] instead.
///
/// [`HandshakeOutcome::Failed`]: crate::socks::HandshakeOutcome::Failed
#[derive(Error, Debug)]
pub enum HandshakeError {
    /// IO error on the client stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported SOCKS version in the greeting
    #[error("Invalid version in handshake: {0}")]
    InvalidVersion(u8),

    /// The client did not offer the "no authentication" method
    #[error("Client does not support 'no authentication'")]
    NoAcceptableAuthMethod,

    /// Address type not supported
    #[error("Invalid address type requested by client: {0:#04x}")]
    UnsupportedAddressType(u8),

    /// Domain name is not valid UTF-8
    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),

    /// Domain name could not be resolved to any address
    #[error("Failed to resolve {host}: {source}")]
    Resolution {
        /// Hostname that was looked up (after rewriting)
        host: String,
        /// Underlying resolver error
        #[source]
        source: io::Error,
    },
}

impl HandshakeError {
    /// Build a resolution error for `host`
    pub fn resolution(host: impl Into<String>, source: io::Error) -> Self {
        HandshakeError::Resolution {
            host: host.into(),
            source,
        }
    }

    /// Whether the error was caused by the client violating the protocol
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            HandshakeError::InvalidVersion(_)
                | HandshakeError::NoAcceptableAuthMethod
                | HandshakeError::UnsupportedAddressType(_)
                | HandshakeError::InvalidDomain(_)
        )
    }
}

/// Reply codes for SOCKS5 protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Socks5ReplyCode {
    /// Command succeeded
    Succeeded = 0x00,
    /// General SOCKS server failure
    GeneralFailure = 0x01,
    /// Command not supported
    CommandNotSupported = 0x07,
}

impl From<Socks5ReplyCode> for u8 {
    fn from(code: Socks5ReplyCode) -> Self {
        code as u8
    }
}

impl TryFrom<u8> for Socks5ReplyCode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Socks5ReplyCode::Succeeded),
            0x01 => Ok(Socks5ReplyCode::GeneralFailure),
            0x07 => Ok(Socks5ReplyCode::CommandNotSupported),
            other => Err(other),
        }
    }
}

//! SOCKS5 handshake engine
//!
//! Drives a client through greeting, method selection, request parsing,
//! destination resolution and the final reply. On success the caller gets
//! the established destination stream to hand to the relay.

use crate::config::SocksConfig;
use crate::error::{HandshakeError, Socks5ReplyCode};
use crate::socks::auth::negotiate_auth;
use crate::socks::command::{parse_request, send_reply};
use crate::socks::consts::SOCKS5_VERSION;
use crate::socks::resolve::{resolve_target, Resolver, SystemResolver};
use crate::socks::types::{ConnectRequest, RequestAddr, ResolvedTarget};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Result of a completed handshake
#[derive(Debug)]
pub enum HandshakeOutcome {
    /// The destination was dialed and a success reply was sent
    Connected {
        /// Stream to the destination
        stream: TcpStream,
        /// Address that was dialed
        target: ResolvedTarget,
    },
    /// A failure reply with this status was sent
    Failed(Socks5ReplyCode),
}

/// Handshake engine shared by all connection handlers
///
/// Holds the immutable configuration and the resolver. Cloning is cheap.
pub struct Handshake<R = SystemResolver> {
    config: Arc<SocksConfig>,
    resolver: Arc<R>,
}

impl<R> Clone for Handshake<R> {
    fn clone(&self) -> Self {
        Handshake {
            config: Arc::clone(&self.config),
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl Handshake<SystemResolver> {
    /// Create a handshake engine using the system resolver
    pub fn new(config: SocksConfig) -> Self {
        Self::with_resolver(config, SystemResolver)
    }
}

impl<R: Resolver> Handshake<R> {
    /// Create a handshake engine with a custom resolver
    pub fn with_resolver(config: SocksConfig, resolver: R) -> Self {
        Handshake {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
        }
    }

    /// Run the SOCKS5 handshake on `client`
    ///
    /// # Protocol Flow
    ///
    /// 1. Version byte (only 5 is accepted)
    /// 2. Method selection ("no authentication" only)
    /// 3. Request parsing
    /// 4. Destination resolution, with hostname rewriting
    /// 5. Destination dial and reply
    ///
    /// Errors are returned without writing a reply. Failures reported to the
    /// client (unsupported command, dial failure) come back as
    /// [`HandshakeOutcome::Failed`].
    pub async fn negotiate<S>(&self, client: &mut S) -> Result<HandshakeOutcome, HandshakeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let version = client.read_u8().await?;
        if version != SOCKS5_VERSION {
            return Err(HandshakeError::InvalidVersion(version));
        }

        negotiate_auth(client).await?;

        let request = parse_request(client).await?;

        if !request.is_connect() {
            warn!("Rejecting {}: command not supported", request);
            send_reply(client, Socks5ReplyCode::CommandNotSupported).await?;
            return Ok(HandshakeOutcome::Failed(
                Socks5ReplyCode::CommandNotSupported,
            ));
        }

        // A failed lookup closes the connection without a reply.
        let target = resolve_target(&request, &self.config.rewrites, &*self.resolver).await?;
        log_resolution(&request, &target);

        let dial = tokio::time::timeout(
            self.config.connect_timeout,
            TcpStream::connect(target.socket_addr()),
        )
        .await;

        match dial {
            Ok(Ok(stream)) => {
                send_reply(client, Socks5ReplyCode::Succeeded).await?;
                Ok(HandshakeOutcome::Connected { stream, target })
            }
            Ok(Err(e)) => {
                warn!("Failed to connect to {}: {}", target, e);
                send_reply(client, Socks5ReplyCode::GeneralFailure).await?;
                Ok(HandshakeOutcome::Failed(Socks5ReplyCode::GeneralFailure))
            }
            Err(_) => {
                warn!("Connection timeout to {}", target);
                send_reply(client, Socks5ReplyCode::GeneralFailure).await?;
                Ok(HandshakeOutcome::Failed(Socks5ReplyCode::GeneralFailure))
            }
        }
    }
}

fn log_resolution(request: &ConnectRequest, target: &ResolvedTarget) {
    match &request.addr {
        RequestAddr::Domain(domain) if target.is_rewritten() => {
            debug!("Requested {}. Rewriting IP address {}", domain, target)
        }
        RequestAddr::Domain(domain) => {
            debug!("Requested {}. Using IP address {}", domain, target)
        }
        _ => debug!("Requested {}", target),
    }
}

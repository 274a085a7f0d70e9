//! Proxy server
//!
//! Accepts client connections and runs each one through the handshake and
//! relay on its own task.

use crate::config::{Config, SocksConfig};
use crate::socks::{relay, Handshake, HandshakeOutcome, Resolver, SystemResolver};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, info_span, warn, Instrument};

/// SOCKS5 proxy server bound to a listening socket
pub struct Server<R = SystemResolver> {
    listener: TcpListener,
    handshake: Handshake<R>,
}

impl Server<SystemResolver> {
    /// Bind the listen address from `config`
    pub async fn bind(config: &Config) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen)
            .await
            .with_context(|| format!("Could not listen on {}", config.listen))?;

        Ok(Server {
            listener,
            handshake: Handshake::new(config.socks.clone()),
        })
    }
}

impl<R: Resolver + 'static> Server<R> {
    /// Create a server on an existing listener with a custom resolver
    pub fn with_resolver(listener: TcpListener, config: SocksConfig, resolver: R) -> Self {
        Server {
            listener,
            handshake: Handshake::with_resolver(config, resolver),
        }
    }

    /// Address the server is listening on
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until shutdown
    ///
    /// Every accepted connection is handled on its own task. An accept error
    /// stops the server and is returned; per-connection errors are only
    /// logged.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<bool>) -> Result<()> {
        let local = self.local_addr()?;
        info!("Socks5 proxy listening on {}", local);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted.context("Error from listen port")?;
                    let handshake = self.handshake.clone();

                    info!("New connection from {} to {}", peer, local);
                    tokio::spawn(
                        handle_connection(stream, handshake)
                            .instrument(info_span!("conn", %peer)),
                    );
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Handle one client connection from handshake to teardown
///
/// The client stream is owned here and dropped, which closes it, on every
/// path out of this function.
pub async fn handle_connection<S, R>(mut client: S, handshake: Handshake<R>)
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: Resolver,
{
    match handshake.negotiate(&mut client).await {
        Ok(HandshakeOutcome::Connected { stream, target }) => {
            info!("Tunnel established to {}", target);
            let stats = relay(client, stream).await;
            info!(
                "Tunnel to {} closed: {} bytes sent, {} bytes received",
                target, stats.a_to_b, stats.b_to_a
            );
        }
        Ok(HandshakeOutcome::Failed(code)) => {
            info!("Handshake ended with reply {:?}", code);
        }
        Err(e) if e.is_protocol_error() => {
            info!("Rejected client: {}", e);
        }
        Err(e) => {
            warn!("Error: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Socks5ReplyCode;
    use crate::socks::{encode_reply, SOCKS5_VERSION};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_bind_invalid_address() {
        let config = Config {
            listen: "not-an-address".to_string(),
            ..Default::default()
        };

        let result = Server::bind(&config).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let config = Config {
            listen: "127.0.0.1:0".to_string(),
            ..Default::default()
        };

        let server = Server::bind(&config).await.unwrap();
        assert!(server.local_addr().unwrap().port() > 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = Server::with_resolver(listener, SocksConfig::default(), SystemResolver);
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(server.run(rx));
        tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_handle_connection_closes_client_on_failure() {
        let (mut client, server_side) = tokio::io::duplex(1024);
        let handshake = Handshake::new(SocksConfig::default());

        let task = tokio::spawn(handle_connection(server_side, handshake));

        client.write_all(&[0x04, 1, 0]).await.unwrap();

        // No reply, just end-of-stream.
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).await.unwrap();
        assert!(buf.is_empty());
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_connection_dial_failure() {
        let closed = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let (mut client, server_side) = tokio::io::duplex(1024);
        let handshake = Handshake::new(SocksConfig::default());

        let task = tokio::spawn(handle_connection(server_side, handshake));

        let mut request = vec![SOCKS5_VERSION, 1, 0x00, SOCKS5_VERSION, 1, 0, 1, 127, 0, 0, 1];
        request.extend_from_slice(&closed.port().to_be_bytes());
        client.write_all(&request).await.unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).await.unwrap();
        let mut expected = vec![SOCKS5_VERSION, 0x00];
        expected.extend_from_slice(&encode_reply(Socks5ReplyCode::GeneralFailure));
        assert_eq!(buf, expected);
        task.await.unwrap();
    }
}

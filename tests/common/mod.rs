//! Test utilities and mocks for Sockrelay
//!
//! This module provides common test utilities used across integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use sockrelay::config::SocksConfig;
use sockrelay::server::Server;
use sockrelay::socks::Resolver;
use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

/// Create a test TCP listener on an available port
pub async fn create_test_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// An address nothing is listening on
pub async fn closed_addr() -> SocketAddr {
    let (_listener, addr) = create_test_listener().await;
    addr
}

/// Spawn a TCP echo server, returning its address
pub async fn spawn_echo_server() -> SocketAddr {
    let (listener, addr) = create_test_listener().await;

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let (mut reader, mut writer) = stream.split();
                let _ = tokio::io::copy(&mut reader, &mut writer).await;
            });
        }
    });

    addr
}

/// Resolver answering from a fixed table and recording every query
#[derive(Clone, Default)]
pub struct StaticResolver {
    answers: HashMap<String, Vec<IpAddr>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl StaticResolver {
    /// Answer `host` with `ips`
    pub fn with(mut self, host: &str, ips: &[IpAddr]) -> Self {
        self.answers.insert(host.to_string(), ips.to_vec());
        self
    }

    /// Hostnames looked up so far
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        self.queries.lock().unwrap().push(host.to_string());
        self.answers
            .get(host)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "unknown host"))
    }
}

/// A running proxy and the handle that stops it
pub struct TestProxy {
    /// Address the proxy listens on
    pub addr: SocketAddr,
    shutdown_tx: broadcast::Sender<bool>,
}

impl TestProxy {
    /// Start a proxy with the given configuration and resolver
    pub async fn start(config: SocksConfig, resolver: StaticResolver) -> Self {
        let (listener, addr) = create_test_listener().await;
        let server = Server::with_resolver(listener, config, resolver);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        tokio::spawn(server.run(shutdown_rx));

        TestProxy { addr, shutdown_tx }
    }

    /// Stop accepting connections
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Connect to the proxy and complete method negotiation
pub async fn connect_and_greet(proxy: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(proxy).await.unwrap();
    stream
        .write_all(&socks5_mock::create_auth_request_no_auth())
        .await
        .unwrap();

    let mut ack = [0u8; 2];
    stream.read_exact(&mut ack).await.unwrap();
    assert_eq!(ack, [5, 0]);

    stream
}

/// Read the 10-byte reply record
pub async fn read_reply(stream: &mut TcpStream) -> [u8; 10] {
    let mut reply = [0u8; 10];
    stream.read_exact(&mut reply).await.unwrap();
    reply
}

/// Mock SOCKS5 handshake data
pub mod socks5_mock {
    use sockrelay::socks::*;
    use std::net::SocketAddr;

    /// Create a no-auth method selection request
    pub fn create_auth_request_no_auth() -> Vec<u8> {
        vec![SOCKS5_VERSION, 1, SOCKS5_AUTH_METHOD_NONE]
    }

    /// Create a request for `addr` with the given command
    pub fn create_request(command: u8, addr: SocketAddr) -> Vec<u8> {
        let mut cmd = vec![SOCKS5_VERSION, command, SOCKS5_RESERVED];
        match addr {
            SocketAddr::V4(addr) => {
                cmd.push(SOCKS5_ADDR_TYPE_IPV4);
                cmd.extend_from_slice(&addr.ip().octets());
            }
            SocketAddr::V6(addr) => {
                cmd.push(SOCKS5_ADDR_TYPE_IPV6);
                cmd.extend_from_slice(&addr.ip().octets());
            }
        }
        cmd.extend_from_slice(&addr.port().to_be_bytes());
        cmd
    }

    /// Create a connect command to an IP address
    pub fn create_connect(addr: SocketAddr) -> Vec<u8> {
        create_request(SOCKS5_CMD_TCP_CONNECT, addr)
    }

    /// Create a connect command to domain
    pub fn create_connect_domain(domain: &str, port: u16) -> Vec<u8> {
        let mut cmd = vec![
            SOCKS5_VERSION,
            SOCKS5_CMD_TCP_CONNECT,
            SOCKS5_RESERVED,
            SOCKS5_ADDR_TYPE_DOMAIN,
            domain.len() as u8,
        ];
        cmd.extend_from_slice(domain.as_bytes());
        cmd.extend_from_slice(&port.to_be_bytes());
        cmd
    }
}

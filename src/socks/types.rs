//! SOCKS5 type definitions
//!
//! Defines the core types used in SOCKS5 protocol handling.

use super::consts::*;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// SOCKS5 command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocksCommand {
    /// TCP CONNECT - establish a TCP connection to target
    Connect,
    /// TCP BIND - wait for incoming connection (not implemented)
    Bind,
    /// UDP ASSOCIATE - establish UDP relay (not implemented)
    UdpAssociate,
}

impl SocksCommand {
    /// Parse a command byte into SocksCommand
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SOCKS5_CMD_TCP_CONNECT => Some(SocksCommand::Connect),
            SOCKS5_CMD_TCP_BIND => Some(SocksCommand::Bind),
            SOCKS5_CMD_UDP_ASSOCIATE => Some(SocksCommand::UdpAssociate),
            _ => None,
        }
    }
}

impl fmt::Display for SocksCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocksCommand::Connect => write!(f, "CONNECT"),
            SocksCommand::Bind => write!(f, "BIND"),
            SocksCommand::UdpAssociate => write!(f, "UDP ASSOCIATE"),
        }
    }
}

/// Destination address as sent by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestAddr {
    /// Raw IPv4 address (ATYP 1)
    Ipv4(Ipv4Addr),
    /// Hostname (ATYP 3)
    Domain(String),
    /// Raw IPv6 address (ATYP 4)
    Ipv6(Ipv6Addr),
}

impl fmt::Display for RequestAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestAddr::Ipv4(ip) => write!(f, "{}", ip),
            RequestAddr::Domain(domain) => write!(f, "{}", domain),
            RequestAddr::Ipv6(ip) => write!(f, "{}", ip),
        }
    }
}

/// A decoded SOCKS5 connection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    /// Raw command byte; only CONNECT is served
    pub command: u8,
    /// Requested destination
    pub addr: RequestAddr,
    /// Requested destination port
    pub port: u16,
}

impl ConnectRequest {
    /// The command, if it is one SOCKS5 defines
    pub fn socks_command(&self) -> Option<SocksCommand> {
        SocksCommand::from_byte(self.command)
    }

    /// Whether this is a CONNECT request
    pub fn is_connect(&self) -> bool {
        self.socks_command() == Some(SocksCommand::Connect)
    }
}

impl fmt::Display for ConnectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.socks_command() {
            Some(cmd) => write!(f, "{} ", cmd)?,
            None => write!(f, "CMD({:#04x}) ", self.command)?,
        }
        match &self.addr {
            RequestAddr::Ipv6(ip) => write!(f, "[{}]:{}", ip, self.port),
            addr => write!(f, "{}:{}", addr, self.port),
        }
    }
}

/// The single address a request resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTarget {
    addr: SocketAddr,
    rewritten: bool,
}

impl ResolvedTarget {
    /// Create a target from an IP and port
    ///
    /// IPv4-mapped IPv6 addresses are folded to their IPv4 form.
    pub fn new(ip: IpAddr, port: u16) -> Self {
        ResolvedTarget {
            addr: SocketAddr::new(ip.to_canonical(), port),
            rewritten: false,
        }
    }

    /// Mark the target as coming from a rewritten hostname
    pub fn rewritten(mut self) -> Self {
        self.rewritten = true;
        self
    }

    /// Whether the hostname was substituted through the rewrite table
    pub fn is_rewritten(&self) -> bool {
        self.rewritten
    }

    /// Socket address to dial
    pub fn socket_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)
    }
}

//! SOCKS5 request parser
//!
//! Parses SOCKS5 connection requests from the client.

use crate::error::HandshakeError;
use crate::socks::consts::*;
use crate::socks::types::{ConnectRequest, RequestAddr};
use std::net::{Ipv4Addr, Ipv6Addr};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Parse a SOCKS5 request from the stream
///
/// # SOCKS5 Request Format
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | Variable |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
///
/// The version and reserved bytes are read but not validated. The command is
/// returned as-is so the caller can reject it after the whole request has
/// been consumed.
pub async fn parse_request<S>(stream: &mut S) -> Result<ConnectRequest, HandshakeError>
where
    S: AsyncRead + Unpin,
{
    // Read: VER CMD RSV ATYP
    let mut header = [0u8; 4];
    stream.read_exact(&mut header).await?;

    let command = header[1];
    let addr_type = header[3];

    let addr = parse_address(stream, addr_type).await?;
    let port = stream.read_u16().await?;

    Ok(ConnectRequest {
        command,
        addr,
        port,
    })
}

/// Parse the address portion of a SOCKS5 request
async fn parse_address<S>(stream: &mut S, addr_type: u8) -> Result<RequestAddr, HandshakeError>
where
    S: AsyncRead + Unpin,
{
    match addr_type {
        SOCKS5_ADDR_TYPE_IPV4 => {
            let mut addr = [0u8; 4];
            stream.read_exact(&mut addr).await?;
            Ok(RequestAddr::Ipv4(Ipv4Addr::from(addr)))
        }

        SOCKS5_ADDR_TYPE_DOMAIN => {
            let domain_len = stream.read_u8().await? as usize;

            let mut domain_buf = vec![0u8; domain_len];
            stream.read_exact(&mut domain_buf).await?;

            let domain = String::from_utf8(domain_buf).map_err(|e| {
                HandshakeError::InvalidDomain(String::from_utf8_lossy(e.as_bytes()).into_owned())
            })?;

            Ok(RequestAddr::Domain(domain))
        }

        SOCKS5_ADDR_TYPE_IPV6 => {
            let mut addr = [0u8; 16];
            stream.read_exact(&mut addr).await?;
            Ok(RequestAddr::Ipv6(Ipv6Addr::from(addr)))
        }

        _ => Err(HandshakeError::UnsupportedAddressType(addr_type)),
    }
}

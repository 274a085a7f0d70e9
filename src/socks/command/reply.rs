//! SOCKS5 reply builder
//!
//! Constructs SOCKS5 reply messages.

use crate::error::Socks5ReplyCode;
use crate::socks::consts::*;
use bytes::{BufMut, Bytes, BytesMut};
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Encode a SOCKS5 reply record
///
/// # SOCKS5 Reply Format
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' | X'01'| 0.0.0.0  |    0     |
/// +----+-----+-------+------+----------+----------+
/// ```
///
/// The bound address is always reported as `0.0.0.0:0`; CONNECT clients
/// only look at the status byte.
pub fn encode_reply(reply_code: Socks5ReplyCode) -> Bytes {
    let mut reply = BytesMut::with_capacity(SOCKS5_REPLY_LEN);
    reply.put_u8(SOCKS5_VERSION);
    reply.put_u8(reply_code.into());
    reply.put_u8(SOCKS5_RESERVED);
    reply.put_u8(SOCKS5_ADDR_TYPE_IPV4);
    reply.put_slice(&[0, 0, 0, 0]);
    reply.put_u16(0);
    reply.freeze()
}

/// Build and send a SOCKS5 reply
pub async fn send_reply<S>(stream: &mut S, reply_code: Socks5ReplyCode) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&encode_reply(reply_code)).await?;
    stream.flush().await
}

//! SOCKS5 authentication negotiation
//!
//! Only the "no authentication" method is implemented. A client that does
//! not offer it is disconnected without a method-selection reply.

use super::consts::*;
use crate::error::HandshakeError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Negotiate the authentication method
///
/// Reads `NMETHODS` and the method list that follow the version byte and,
/// if `0x00` is offered, acknowledges it with `[0x05, 0x00]`.
///
/// # SOCKS5 Method Selection
///
/// ```text
/// +----+----------+----------+        +----+--------+
/// |VER | NMETHODS | METHODS  |   ->   |VER | METHOD |
/// +----+----------+----------+        +----+--------+
/// | 1  |    1     | 1 to 255 |        | 1  |   1    |
/// +----+----------+----------+        +----+--------+
/// ```
pub async fn negotiate_auth<S>(stream: &mut S) -> Result<(), HandshakeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let num_methods = stream.read_u8().await?;

    let mut methods = vec![0u8; num_methods as usize];
    stream.read_exact(&mut methods).await?;
    trace!("Client offered auth methods: {:?}", methods);

    if !methods.contains(&SOCKS5_AUTH_METHOD_NONE) {
        return Err(HandshakeError::NoAcceptableAuthMethod);
    }

    stream
        .write_all(&[SOCKS5_VERSION, SOCKS5_AUTH_METHOD_NONE])
        .await?;
    stream.flush().await?;

    Ok(())
}

//! Bidirectional relay for established CONNECT tunnels
//!
//! Copies bytes between the client and the destination. The tunnel is torn
//! down as soon as either side reaches end-of-stream.

use crate::socks::consts::RELAY_BUFFER_SIZE;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

/// Byte counts for a finished relay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Bytes copied from `a` to `b`
    pub a_to_b: u64,
    /// Bytes copied from `b` to `a`
    pub b_to_a: u64,
}

/// Relay data bidirectionally between two streams
///
/// Each direction reads into its own fixed buffer and stops on end-of-stream
/// or on any read or write error. The first direction to stop ends the whole
/// relay: the other direction is cancelled and both write sides are shut
/// down, so neither peer is left waiting on the other. Both directions are
/// finished when this returns.
pub async fn relay<A, B>(a: A, b: B) -> RelayStats
where
    A: AsyncRead + AsyncWrite + Unpin,
    B: AsyncRead + AsyncWrite + Unpin,
{
    let (mut a_read, mut a_write) = tokio::io::split(a);
    let (mut b_read, mut b_write) = tokio::io::split(b);
    let mut stats = RelayStats::default();

    tokio::select! {
        _ = pump(&mut a_read, &mut b_write, "A->B", &mut stats.a_to_b) => {
            debug!("A->B ended first, closing tunnel");
        }
        _ = pump(&mut b_read, &mut a_write, "B->A", &mut stats.b_to_a) => {
            debug!("B->A ended first, closing tunnel");
        }
    }

    // Either peer may already be gone; a failed shutdown is not an error here.
    if let Err(e) = b_write.shutdown().await {
        trace!("A->B shutdown: {}", e);
    }
    if let Err(e) = a_write.shutdown().await {
        trace!("B->A shutdown: {}", e);
    }

    stats
}

/// Copy one direction until the reader ends or an error occurs
///
/// `total` is updated after every completed write so the count survives
/// cancellation.
async fn pump<R, W>(reader: &mut R, writer: &mut W, direction: &str, total: &mut u64)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; RELAY_BUFFER_SIZE];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!("{} read error: {}", direction, e);
                break;
            }
        };

        trace!("{} payload: {}", direction, String::from_utf8_lossy(&buf[..n]));

        if let Err(e) = writer.write_all(&buf[..n]).await {
            debug!("{} write error: {}", direction, e);
            break;
        }
        *total += n as u64;
    }

    debug!("{} finished: {} bytes", direction, total);
}

//! Destination resolution
//!
//! Turns a [`ConnectRequest`] into exactly one dialable address, applying
//! the hostname rewrite table to domain-name requests.

use crate::config::RewriteTable;
use crate::error::HandshakeError;
use crate::socks::types::{ConnectRequest, RequestAddr, ResolvedTarget};
use async_trait::async_trait;
use std::io;
use std::net::IpAddr;
use tracing::debug;

/// Name resolution backend
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve `host` to its addresses, in the order the backend returns them
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// Resolver backed by the operating system (`getaddrinfo`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl Resolver for SystemResolver {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0)).await?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// Resolve a request to a single target
///
/// IP requests are used verbatim. Domain requests are looked up after
/// substituting any matching rewrite rule, and the first returned address
/// is used.
pub async fn resolve_target<R>(
    request: &ConnectRequest,
    rewrites: &RewriteTable,
    resolver: &R,
) -> Result<ResolvedTarget, HandshakeError>
where
    R: Resolver + ?Sized,
{
    match &request.addr {
        RequestAddr::Ipv4(ip) => Ok(ResolvedTarget::new(IpAddr::V4(*ip), request.port)),
        RequestAddr::Ipv6(ip) => Ok(ResolvedTarget::new(IpAddr::V6(*ip), request.port)),
        RequestAddr::Domain(domain) => {
            let (host, rewritten) = match rewrites.lookup(domain) {
                Some(replacement) => (replacement, true),
                None => (domain.as_str(), false),
            };

            let ips = resolver
                .lookup(host)
                .await
                .map_err(|e| HandshakeError::resolution(host, e))?;
            debug!("Found IPs for {}: {:?}", host, ips);

            // TODO: pick among multiple addresses instead of always the first
            let ip = ips.first().copied().ok_or_else(|| {
                HandshakeError::resolution(
                    host,
                    io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
                )
            })?;

            let target = ResolvedTarget::new(ip, request.port);
            Ok(if rewritten { target.rewritten() } else { target })
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Resolver answering from a fixed table and recording every query
    #[derive(Default)]
    pub(crate) struct StaticResolver {
        answers: HashMap<String, Vec<IpAddr>>,
        queries: Mutex<Vec<String>>,
    }

    impl StaticResolver {
        pub(crate) fn with(mut self, host: &str, ips: &[IpAddr]) -> Self {
            self.answers.insert(host.to_string(), ips.to_vec());
            self
        }

        pub(crate) fn queries(&self) -> Vec<String> {
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
}

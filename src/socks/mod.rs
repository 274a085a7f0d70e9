//! SOCKS5 module for Sockrelay
//!
//! This module implements the CONNECT subset of SOCKS5: method negotiation
//! (no authentication only), request parsing, destination resolution with
//! hostname rewriting, the reply record and the bidirectional relay.

mod auth;
mod command;
mod consts;
mod handshake;
mod relay;
mod resolve;
mod types;

pub use auth::negotiate_auth;
pub use command::{encode_reply, parse_request, send_reply};
pub use consts::*;
pub use handshake::{Handshake, HandshakeOutcome};
pub use relay::{relay, RelayStats};
pub use resolve::{resolve_target, Resolver, SystemResolver};
pub use types::{ConnectRequest, RequestAddr, ResolvedTarget, SocksCommand};

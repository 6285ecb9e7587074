//! # Server Role (Device A)
//!
//! Device A owns the listening side of the chat: bind the configured
//! address (falling back to the wildcard address if that fails), wait for
//! device B, accept exactly one connection, then hand the stream to the
//! duplex session.
//!
//! There is no multi-client support. The listener keeps a backlog of one
//! and is never polled again after the first accept, so any further
//! connection attempts are simply ignored.

use anyhow::Result;
use log::{info, warn};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket};

use crate::common::config::{ChatConfig, Role};
use crate::common::session;

/// Exactly one pending peer is ever expected.
const LISTEN_BACKLOG: u32 = 1;

/// Run the device A side: listen, accept device B once, chat.
///
/// Binding fails fatally only if both the configured address and the
/// wildcard fallback refuse to bind.
pub async fn run(config: &ChatConfig) -> Result<()> {
    let addr = config.endpoint()?;
    let listener = bind_listener(addr)?;

    println!("[Device A - Server]");
    println!("[Listening on {}:{}]", config.network.a, config.port);
    println!("[Waiting for Device B to connect...]");

    let (stream, peer_addr) = listener.accept().await?;
    info!("🔗 Accepted connection from {}", peer_addr);

    println!("[Device B connected from {}]", peer_addr.ip());
    println!("[Type messages and press Enter. Type /quit to exit]\n");

    session::run(stream, &Role::A.peer().to_string()).await
}

/// Bind a listening socket to `addr`, falling back once to the wildcard
/// address on the same port if the specific address cannot be bound (e.g.,
/// it is not assigned to any local interface).
///
/// # Returns
/// - `Ok(TcpListener)`: Bound and listening with a backlog of one
/// - `Err`: Both the configured and the wildcard bind failed
pub fn bind_listener(addr: SocketAddr) -> Result<TcpListener> {
    match try_bind(addr) {
        Ok(listener) => Ok(listener),
        Err(e) => {
            warn!(
                "⚠️ Could not bind {} ({}), falling back to 0.0.0.0:{}",
                addr,
                e,
                addr.port()
            );
            try_bind(SocketAddr::from(([0, 0, 0, 0], addr.port())))
        }
    }
}

fn try_bind(addr: SocketAddr) -> Result<TcpListener> {
    let socket = TcpSocket::new_v4()?;
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    Ok(socket.listen(LISTEN_BACKLOG)?)
}

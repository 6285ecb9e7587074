//! # Device B Connector
//!
//! Connect-side counterpart to the server role: dial device A, retrying
//! refused attempts on a fixed delay, then run the duplex session.

use anyhow::Result;
use log::{debug, info};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::common::config::{ChatConfig, Role};
use crate::common::session;

/// Fixed wait between connect attempts while device A is not yet listening.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Run the device B side: connect to device A (retrying refusal), chat.
///
/// Returns `Ok(())` without chatting if the operator cancels with Ctrl-C
/// while waiting for device A to appear.
pub async fn run(config: &ChatConfig) -> Result<()> {
    let addr = config.endpoint()?;

    println!("[Device B - Client]");
    println!(
        "[Connecting to Device A at {}:{}...]",
        config.network.a, config.port
    );

    let stream = match connect_with_retry(addr, RETRY_DELAY).await? {
        Some(stream) => stream,
        None => {
            println!("\n[Cancelled]");
            return Ok(());
        }
    };
    info!("🔗 Connected to {}", addr);

    println!("[Connected to Device A]");
    println!("[Type messages and press Enter. Type /quit to exit]\n");

    session::run(stream, &Role::B.peer().to_string()).await
}

/// Connect to `addr`, retrying every `retry_delay` for as long as the
/// attempts fail with connection refused. Retries are unbounded; the loop
/// only ends with a connection, a cancellation, or a non-refusal error.
///
/// # Returns
/// - `Ok(Some(stream))`: Connected
/// - `Ok(None)`: Ctrl-C arrived while waiting between attempts
/// - `Err`: The attempt failed with something other than refusal
pub async fn connect_with_retry(
    addr: SocketAddr,
    retry_delay: Duration,
) -> Result<Option<TcpStream>> {
    loop {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(Some(stream)),
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                println!(
                    "[Device A not ready, retrying in {}s...]",
                    retry_delay.as_secs()
                );
                debug!("Connect to {} refused, waiting {:?}", addr, retry_delay);
                tokio::select! {
                    _ = sleep(retry_delay) => {}
                    _ = tokio::signal::ctrl_c() => return Ok(None),
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

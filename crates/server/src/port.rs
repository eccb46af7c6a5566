// crates/server/src/port.rs
//! Listener setup: first free port in a range, and the address to advertise.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use signal_view_core::PortRange;
use tokio::net::TcpListener;
use tracing::debug;

use crate::error::{ServerError, ServerResult};

/// Bind the first port in `range` (scanning upward) that accepts a listener.
pub async fn bind_first_free(host: IpAddr, range: PortRange) -> ServerResult<TcpListener> {
    range.validate()?;
    for port in range.ports() {
        match TcpListener::bind(SocketAddr::new(host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) => debug!(port, error = %e, "port unavailable"),
        }
    }
    Err(ServerError::NoFreePort {
        start: range.start,
        end: range.end,
    })
}

/// Best-effort LAN address of this host, for the startup banner.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface, whose address is then read back.
pub fn local_ip() -> IpAddr {
    UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .and_then(|socket| {
            socket.connect((Ipv4Addr::new(10, 255, 255, 255), 1))?;
            socket.local_addr()
        })
        .map(|addr| addr.ip())
        .ok()
        .filter(|ip| !ip.is_unspecified())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

//! Device IP discovery
//!
//! The gateway wants the end user's device address for fraud screening. This is
//! best effort only: a missing address never fails a checkout.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Sent when no address could be discovered
pub const LOOPBACK_PLACEHOLDER: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

// Any routable address works; connecting a UDP socket sends no packets.
const ROUTE_PROBE: (Ipv4Addr, u16) = (Ipv4Addr::new(1, 1, 1, 1), 80);

/// IPv4 address of the interface carrying the default route, if any
pub fn discover_outbound_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(ROUTE_PROBE).ok()?;
    let ip = socket.local_addr().ok()?.ip();

    (!ip.is_unspecified() && !ip.is_loopback()).then_some(ip)
}

/// Configured override, else the discovered address, else [`LOOPBACK_PLACEHOLDER`]
pub fn resolve_device_ip(configured: Option<IpAddr>) -> IpAddr {
    configured
        .or_else(discover_outbound_ip)
        .unwrap_or_else(|| {
            tracing::debug!("No outbound address found, using loopback placeholder");
            LOOPBACK_PLACEHOLDER
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let ip: IpAddr = "10.0.0.7".parse().unwrap();
        assert_eq!(resolve_device_ip(Some(ip)), ip);
    }

    #[test]
    fn test_discovery_yields_usable_ipv4() {
        // Sandboxes without a route fall back to the placeholder
        let ip = resolve_device_ip(None);
        assert!(ip.is_ipv4(), "got {ip}");
        assert!(!ip.is_unspecified());

        if let Some(discovered) = discover_outbound_ip() {
            assert!(discovered.is_ipv4());
            assert!(!discovered.is_unspecified() && !discovered.is_loopback());
            assert_eq!(ip, discovered);
        } else {
            assert_eq!(ip, LOOPBACK_PLACEHOLDER);
        }
    }
}

use std::net::Ipv4Addr;

use crate::error::{Result, SapError};

/// Looks up the IPv4 address of a named network interface.
pub trait InterfaceResolver {
    /// Returns the first IPv4 address assigned to `name`.
    ///
    /// Fails with [`SapError::InterfaceNotFound`] if no such interface
    /// exists, or [`SapError::NoIpv4Address`] if it has only non-IPv4
    /// addresses.
    fn ipv4_address(&self, name: &str) -> Result<Ipv4Addr>;
}

/// Resolver backed by the operating system's interface list (`getifaddrs`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

#[cfg(unix)]
impl InterfaceResolver for SystemInterfaces {
    fn ipv4_address(&self, name: &str) -> Result<Ipv4Addr> {
        use std::net::SocketAddrV4;

        let addrs = nix::ifaddrs::getifaddrs()
            .map_err(|e| SapError::Io(std::io::Error::from(e)))?;

        let mut found = false;
        for ifaddr in addrs.filter(|a| a.interface_name == name) {
            found = true;
            if let Some(sin) = ifaddr.address.as_ref().and_then(|a| a.as_sockaddr_in()) {
                return Ok(*SocketAddrV4::from(*sin).ip());
            }
        }

        if found {
            Err(SapError::NoIpv4Address(name.to_string()))
        } else {
            Err(SapError::InterfaceNotFound(name.to_string()))
        }
    }
}

#[cfg(not(unix))]
impl InterfaceResolver for SystemInterfaces {
    fn ipv4_address(&self, name: &str) -> Result<Ipv4Addr> {
        Err(SapError::InterfaceNotFound(name.to_string()))
    }
}

/// Pick the local address for the multicast join.
///
/// With no interface requested, or if the requested one cannot be
/// resolved, joins on `0.0.0.0` and lets the kernel choose. A failed
/// lookup is logged as a warning and does not abort the run.
pub fn join_address(resolver: &dyn InterfaceResolver, interface: Option<&str>) -> Ipv4Addr {
    let Some(name) = interface else {
        return Ipv4Addr::UNSPECIFIED;
    };

    match resolver.ipv4_address(name) {
        Ok(ip) => {
            tracing::info!(interface = name, %ip, "using interface");
            ip
        }
        Err(e) => {
            tracing::warn!(
                interface = name,
                error = %e,
                "interface lookup failed, falling back to default interface"
            );
            Ipv4Addr::UNSPECIFIED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedInterfaces;

    impl InterfaceResolver for FixedInterfaces {
        fn ipv4_address(&self, name: &str) -> Result<Ipv4Addr> {
            match name {
                "eth0" => Ok(Ipv4Addr::new(192, 168, 1, 20)),
                "wg0" => Err(SapError::NoIpv4Address(name.to_string())),
                _ => Err(SapError::InterfaceNotFound(name.to_string())),
            }
        }
    }

    #[test]
    fn no_interface_uses_default() {
        assert_eq!(join_address(&FixedInterfaces, None), Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn resolved_interface_is_used() {
        assert_eq!(
            join_address(&FixedInterfaces, Some("eth0")),
            Ipv4Addr::new(192, 168, 1, 20)
        );
    }

    #[test]
    fn failed_lookup_falls_back() {
        assert_eq!(join_address(&FixedInterfaces, Some("wg0")), Ipv4Addr::UNSPECIFIED);
        assert_eq!(join_address(&FixedInterfaces, Some("nope0")), Ipv4Addr::UNSPECIFIED);
    }

    #[cfg(unix)]
    #[test]
    fn system_lookup_of_missing_interface() {
        let err = SystemInterfaces
            .ipv4_address("definitely-not-an-interface0")
            .unwrap_err();
        assert!(matches!(err, SapError::InterfaceNotFound(_)));
    }
}

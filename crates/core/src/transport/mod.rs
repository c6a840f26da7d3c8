//! Network side of SAP discovery.
//!
//! - **Interfaces** ([`interface`]): resolve an interface name such as
//!   `eth0` to the IPv4 address used for the IGMP join.
//!
//! - **Multicast** ([`multicast`]): a UDP socket bound to the SAP port and
//!   joined to the announcement group, read with a short timeout so the
//!   collector can check its deadline between datagrams.

pub mod interface;
pub mod multicast;

pub use interface::{InterfaceResolver, SystemInterfaces};
pub use multicast::{DatagramSource, MulticastListener};

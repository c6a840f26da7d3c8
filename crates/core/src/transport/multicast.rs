use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

use crate::error::{Result, SapError};

/// Something the collector can pull datagrams from.
///
/// `Ok(None)` means nothing arrived before the source's timeout; the
/// caller should check its deadline and try again.
pub trait DatagramSource {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>>;
}

/// UDP socket joined to a SAP multicast group.
///
/// Bound to `0.0.0.0:<port>` with `SO_REUSEADDR` so several listeners (or
/// other SAP tools) can share the port. The group membership is dropped
/// and the socket closed when the listener is dropped.
pub struct MulticastListener {
    socket: UdpSocket,
    group: Ipv4Addr,
    interface: Ipv4Addr,
}

impl MulticastListener {
    /// Bind the SAP port and join `group` on the interface with address
    /// `interface` (`0.0.0.0` for the system default).
    ///
    /// Every failure here is a [`SapError::SocketSetup`].
    pub fn bind(
        group: Ipv4Addr,
        port: u16,
        interface: Ipv4Addr,
        read_timeout: Duration,
    ) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(SapError::socket("create"))?;
        socket
            .set_reuse_address(true)
            .map_err(SapError::socket("SO_REUSEADDR"))?;

        let bind_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
        socket
            .bind(&bind_addr.into())
            .map_err(SapError::socket("bind"))?;
        socket
            .join_multicast_v4(&group, &interface)
            .map_err(SapError::socket("join multicast group"))?;
        socket
            .set_read_timeout(Some(read_timeout))
            .map_err(SapError::socket("read timeout"))?;

        tracing::info!(%group, port, %interface, "joined SAP multicast group");

        Ok(Self {
            socket: socket.into(),
            group,
            interface,
        })
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl DatagramSource for MulticastListener {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        match self.socket.recv_from(buf) {
            Ok((len, from)) => {
                tracing::trace!(%from, len, "datagram received");
                Ok(Some(len))
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl Drop for MulticastListener {
    fn drop(&mut self) {
        if let Err(e) = self.socket.leave_multicast_v4(&self.group, &self.interface) {
            tracing::debug!(error = %e, group = %self.group, "leave multicast group failed");
        }
        tracing::debug!(group = %self.group, "multicast socket closed");
    }
}

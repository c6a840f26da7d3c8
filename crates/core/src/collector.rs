use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::protocol::SapPacketParser;
use crate::registry::StreamRegistry;
use crate::transport::interface::join_address;
use crate::transport::{DatagramSource, InterfaceResolver, MulticastListener, SystemInterfaces};

/// Global-scope IPv4 SAP group (RFC 2974 §3).
pub const DEFAULT_SAP_GROUP: Ipv4Addr = Ipv4Addr::new(224, 2, 127, 254);

/// Well-known SAP port.
pub const DEFAULT_SAP_PORT: u16 = 9875;

/// Largest UDP payload; SAP packets are required to fit in one datagram.
const RECV_BUFFER_SIZE: usize = 65535;

/// Pause after a receive error so a failing socket does not spin.
const ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// Listener settings, usually filled from the command line.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Multicast group to join.
    pub group: Ipv4Addr,
    /// UDP port to bind.
    pub port: u16,
    /// Interface name for the join (e.g. `eth0`). `None` uses the default.
    pub interface: Option<String>,
    /// How long to collect announcements.
    pub duration: Duration,
    /// Receive timeout; bounds how late the deadline and stop flag are noticed.
    pub read_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            group: DEFAULT_SAP_GROUP,
            port: DEFAULT_SAP_PORT,
            interface: None,
            duration: Duration::from_secs(15),
            read_timeout: Duration::from_secs(1),
        }
    }
}

/// Listens for SAP announcements for a bounded time and collects the
/// streams they describe.
///
/// Collection ends when [`ListenerConfig::duration`] elapses or the
/// shared `running` flag is cleared ([`stop`](Self::stop), or a signal
/// handler holding [`running_flag`](Self::running_flag)). Either way the
/// streams gathered so far are returned.
pub struct Collector {
    config: ListenerConfig,
    running: Arc<AtomicBool>,
}

impl Collector {
    pub fn new(config: ListenerConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    /// Flag checked between receives. Storing `false` ends collection.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("collector stopping");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Join the configured group and collect until the deadline.
    ///
    /// Fails only if the socket cannot be set up; nothing has been
    /// collected at that point.
    pub fn run(&self) -> Result<StreamRegistry> {
        self.run_with(&SystemInterfaces)
    }

    /// Like [`run`](Self::run) with a custom interface resolver.
    pub fn run_with(&self, resolver: &dyn InterfaceResolver) -> Result<StreamRegistry> {
        let interface = join_address(resolver, self.config.interface.as_deref());
        let mut listener = MulticastListener::bind(
            self.config.group,
            self.config.port,
            interface,
            self.config.read_timeout,
        )?;

        // Dropping the listener on return leaves the group and closes the socket.
        Ok(self.collect(&mut listener))
    }

    /// Receive loop over any datagram source.
    pub fn collect(&self, source: &mut dyn DatagramSource) -> StreamRegistry {
        let mut registry = StreamRegistry::new();
        let mut parser = SapPacketParser::new();
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let start = Instant::now();

        tracing::info!(
            group = %self.config.group,
            port = self.config.port,
            duration_secs = self.config.duration.as_secs(),
            "listening for SAP announcements"
        );

        let reason = loop {
            if !self.is_running() {
                break "interrupted";
            }
            if start.elapsed() >= self.config.duration {
                break "duration elapsed";
            }

            match source.recv(&mut buf) {
                Ok(Some(len)) => {
                    let Some(session) = parser.parse(&buf[..len]) else {
                        continue;
                    };
                    let name = session.name.clone();
                    let uri = session.stream_uri.clone();
                    if registry.register(session) {
                        tracing::info!(
                            name = %name,
                            uri = uri.as_deref().unwrap_or_default(),
                            "found stream"
                        );
                    }
                }
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "error receiving data");
                    thread::sleep(ERROR_BACKOFF);
                }
            }
        };

        tracing::info!(
            reason,
            packets = parser.packet_count(),
            streams = registry.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "collection finished"
        );
        registry
    }
}

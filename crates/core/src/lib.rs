pub mod collector;
pub mod error;
pub mod playlist;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod transport;

pub use collector::{Collector, ListenerConfig};
pub use error::{Result, SapError};
pub use playlist::WriteOutcome;
pub use protocol::{SapHeader, SapPacketParser, parse_packet};
pub use registry::StreamRegistry;
pub use session::SessionDescription;

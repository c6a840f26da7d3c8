//! SAP wire format (RFC 2974) and the SDP it carries.
//!
//! A SAP announcement is a single UDP datagram sent periodically to a
//! well-known multicast group (`224.2.127.254:9875` for global scope IPv4):
//!
//! ```text
//! 20 00 1f 4c                 ← header: V=1, no auth, msg id hash 0x1f4c
//! 0a 00 00 01                 ← originating source 10.0.0.1
//! application/sdp\0           ← optional payload type
//! v=0\r\n                     ← SDP body
//! s=BBC One\r\n
//! ...
//! ```
//!
//! ## Handled variants
//!
//! | Case | Result |
//! |------|--------|
//! | V=1, plain payload | parsed |
//! | V≠1 | rejected |
//! | E=1 (encrypted) | rejected |
//! | C=1 (zlib compressed) | rejected |
//! | T=1 (deletion) | parsed, logged |
//! | missing payload type | assumed `application/sdp` |
//! | other payload type | rejected |

pub mod header;
pub mod packet;
pub mod sdp;

pub use header::SapHeader;
pub use packet::{SapPacketParser, parse_packet};
pub use sdp::parse_session;

use std::fmt::Write as _;

use crate::error::{ParseErrorKind, Result, SapError, UnsupportedKind};
use crate::protocol::header::SapHeader;
use crate::protocol::sdp::parse_session;
use crate::session::SessionDescription;

/// Payload type for SDP bodies (RFC 2974 §3).
pub const SDP_MIME_TYPE: &str = "application/sdp";

/// Number of leading datagram bytes included in the debug hex dump.
const HEXDUMP_BYTES: usize = 64;

/// Parse a SAP datagram into a session description.
///
/// Steps, in order:
///
/// 1. Decode the fixed header ([`SapHeader::decode`]).
/// 2. Reject version ≠ 1, compressed, and encrypted packets.
/// 3. Require at least one byte past the origin and auth data.
/// 4. Split off the NUL-terminated MIME type if present; announcers that
///    omit it are treated as sending `application/sdp`.
/// 5. Hand `application/sdp` (or empty type) bodies to the SDP parser.
///
/// Deletion messages are not treated specially: their SDP is parsed like
/// an announcement's.
pub fn parse_packet(data: &[u8]) -> Result<SessionDescription> {
    let (header, offset) = SapHeader::decode(data)?;

    tracing::debug!(
        version = header.version,
        addr_type = header.address_type,
        msg_type = header.message_type,
        auth_len = header.auth_len,
        msg_hash = header.msg_id_hash,
        encrypted = header.encrypted,
        compressed = header.compressed,
        "SAP header"
    );

    if header.version != 1 {
        return Err(SapError::unsupported(UnsupportedKind::Version(
            header.version,
        )));
    }
    if header.compressed {
        return Err(SapError::unsupported(UnsupportedKind::Compressed));
    }
    if header.encrypted {
        return Err(SapError::unsupported(UnsupportedKind::Encrypted));
    }
    if header.is_deletion() {
        tracing::debug!(msg_hash = header.msg_id_hash, "deletion message");
    }

    if data.len() <= offset {
        return Err(SapError::parse(ParseErrorKind::MissingPayload {
            len: data.len(),
            offset,
        }));
    }

    let payload = &data[offset..];
    let (mime_type, sdp) = split_payload_type(payload);

    tracing::debug!(offset, mime_type = %mime_type, sdp_len = sdp.len(), "SAP payload");

    if mime_type != SDP_MIME_TYPE && !mime_type.is_empty() {
        return Err(SapError::unsupported(UnsupportedKind::MimeType(mime_type)));
    }

    parse_session(sdp).ok_or(SapError::IncompleteSession)
}

/// Separate the optional payload type token from the payload body.
///
/// The token is ASCII; non-ASCII bytes are replaced rather than rejected.
/// Without a NUL terminator the whole payload is the body.
fn split_payload_type(payload: &[u8]) -> (String, &[u8]) {
    match payload.iter().position(|&b| b == 0) {
        Some(end) => {
            let mime: String = payload[..end]
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect();
            (mime, &payload[end + 1..])
        }
        None => {
            tracing::debug!("no MIME type separator found, trying direct SDP parse");
            (SDP_MIME_TYPE.to_string(), payload)
        }
    }
}

/// Stateful front end over [`parse_packet`] for a receive loop.
///
/// Counts every datagram it sees and logs why a packet was skipped.
/// Nothing here is fatal: every failure becomes `None`.
#[derive(Debug, Default)]
pub struct SapPacketParser {
    packet_count: u64,
}

impl SapPacketParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of datagrams passed to [`parse`](Self::parse) so far.
    pub fn packet_count(&self) -> u64 {
        self.packet_count
    }

    /// Parse one datagram, returning a session only for actionable
    /// announcements.
    pub fn parse(&mut self, data: &[u8]) -> Option<SessionDescription> {
        self.packet_count += 1;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let shown = &data[..data.len().min(HEXDUMP_BYTES)];
            tracing::debug!(
                packet = self.packet_count,
                len = data.len(),
                "received datagram\n{}",
                hexdump(shown)
            );
        }

        match parse_packet(data) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!(packet = self.packet_count, error = %e, "skipping packet");
                None
            }
        }
    }
}

/// Render bytes as a hex dump, 16 bytes per row.
///
/// ```text
///   0000: 20 00 12 34 0a 00 00 01 61 70 70 6c 69 63 61 74   ..4....applicat
/// ```
pub fn hexdump(data: &[u8]) -> String {
    const WIDTH: usize = 16;
    let mut out = String::new();

    for (row, chunk) in data.chunks(WIDTH).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if (32..=126).contains(&b) { b as char } else { '.' })
            .collect();
        let _ = writeln!(
            out,
            "  {:04x}: {:<width$} {}",
            row * WIDTH,
            hex.join(" "),
            ascii,
            width = WIDTH * 3
        );
    }
    out
}

//! Error types for the SAP discovery library.

use std::fmt;

/// Errors that can occur while discovering SAP announcements.
///
/// Variants map to specific failure modes across the stack:
///
/// - **Wire format**: [`Parse`](Self::Parse), [`Unsupported`](Self::Unsupported)
///   are per-packet and never abort a run.
/// - **Session**: [`IncompleteSession`](Self::IncompleteSession) means the SDP
///   carried no session name.
/// - **Interface**: [`InterfaceNotFound`](Self::InterfaceNotFound),
///   [`NoIpv4Address`](Self::NoIpv4Address) are recovered by falling back to
///   the default interface.
/// - **Setup**: [`SocketSetup`](Self::SocketSetup) is fatal.
/// - **Output**: [`Io`](Self::Io) covers playlist write failures.
#[derive(Debug, thiserror::Error)]
pub enum SapError {
    /// Underlying I/O error (playlist file, socket receive).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The datagram could not be framed as a SAP packet (RFC 2974 §3).
    #[error("malformed SAP packet: {kind}")]
    Parse { kind: ParseErrorKind },

    /// The datagram is a SAP variant this tool does not decode.
    #[error("unsupported SAP packet: {kind}")]
    Unsupported { kind: UnsupportedKind },

    /// The SDP payload had no `s=` line.
    #[error("session description has no name")]
    IncompleteSession,

    /// No network interface with the given name exists.
    #[error("interface not found: {0}")]
    InterfaceNotFound(String),

    /// The interface exists but has no IPv4 address assigned.
    #[error("no IPv4 address on interface: {0}")]
    NoIpv4Address(String),

    /// Creating, binding or joining the multicast socket failed.
    #[error("socket setup failed ({context}): {source}")]
    SocketSetup {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Specific kind of SAP framing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Fewer than the 4 fixed header bytes were received.
    TooShort(usize),
    /// The datagram ends at or before the computed payload offset.
    MissingPayload { len: usize, offset: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort(len) => write!(f, "packet too short ({len} bytes)"),
            Self::MissingPayload { len, offset } => {
                write!(f, "no payload (need more than {offset} bytes, got {len})")
            }
        }
    }
}

/// SAP variants that are detected and rejected rather than decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedKind {
    /// Header version other than 1.
    Version(u8),
    /// The E bit is set.
    Encrypted,
    /// The C bit is set (zlib payload).
    Compressed,
    /// Payload type other than `application/sdp`.
    MimeType(String),
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(v) => write!(f, "version {v}"),
            Self::Encrypted => write!(f, "encrypted payload"),
            Self::Compressed => write!(f, "compressed payload"),
            Self::MimeType(mime) => write!(f, "payload type '{mime}'"),
        }
    }
}

impl SapError {
    pub(crate) fn parse(kind: ParseErrorKind) -> Self {
        Self::Parse { kind }
    }

    pub(crate) fn unsupported(kind: UnsupportedKind) -> Self {
        Self::Unsupported { kind }
    }

    pub(crate) fn socket(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::SocketSetup { context, source }
    }
}

/// Convenience alias for `Result<T, SapError>`.
pub type Result<T> = std::result::Result<T, SapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = SapError::parse(ParseErrorKind::TooShort(2));
        assert_eq!(err.to_string(), "malformed SAP packet: packet too short (2 bytes)");

        let err = SapError::unsupported(UnsupportedKind::MimeType("text/plain".into()));
        assert_eq!(
            err.to_string(),
            "unsupported SAP packet: payload type 'text/plain'"
        );
    }

    #[test]
    fn socket_error_keeps_context() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy");
        let err = SapError::socket("bind")(io);
        assert!(err.to_string().starts_with("socket setup failed (bind)"));
    }
}

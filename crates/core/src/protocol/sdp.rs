//! SDP (Session Description Protocol) parsing (RFC 4566 / RFC 8866).
//!
//! Reads the SDP body carried in a SAP announcement. The format is one
//! `<type>=<value>` field per line:
//!
//! ```text
//! v=0                                          ← protocol version
//! o=- 3912 3913 IN IP4 10.0.0.1                ← origin
//! s=BBC One                                    ← session name
//! i=Live feed                                  ← session information
//! c=IN IP4 239.1.1.1/32                        ← connection address
//! t=0 0                                        ← timing
//! a=x-plgroup:News                             ← channel group (vendor)
//! m=video 5004 RTP/AVP 33                      ← media description
//! ```
//!
//! Only the lines that feed a playlist entry are interpreted; every other
//! line, including all other `a=` attributes, is skipped. Each line
//! updates at most one field, and a later line of the same type replaces
//! an earlier one.

use crate::session::{SessionDescription, derive_stream_uri};

/// Vendor attribute carrying the channel group.
pub const GROUP_ATTRIBUTE: &str = "a=x-plgroup:";

/// Maximum number of SDP characters echoed to the debug log.
const LOG_PREVIEW_CHARS: usize = 500;

/// Parse an SDP body into a [`SessionDescription`].
///
/// Invalid UTF-8 is replaced rather than rejected. Returns `None` when the
/// body has no non-empty `s=` line, since a nameless session cannot be
/// listed.
pub fn parse_session(body: &[u8]) -> Option<SessionDescription> {
    let text = String::from_utf8_lossy(body);
    tracing::debug!(sdp = %preview(&text), "SDP content");

    let mut session = SessionDescription::new("");

    for line in text.lines().map(str::trim) {
        if let Some(value) = line.strip_prefix(GROUP_ATTRIBUTE) {
            tracing::debug!(group = value, "found group");
            session.group = non_empty(value);
        } else if let Some(value) = line.strip_prefix("s=") {
            session.name = value.to_string();
        } else if let Some(value) = line.strip_prefix("i=") {
            session.description = non_empty(value);
        } else if let Some(value) = line.strip_prefix("u=") {
            session.url = non_empty(value);
        } else if let Some(value) = line.strip_prefix("c=") {
            session.connection = non_empty(value);
        } else if let Some(value) = line.strip_prefix("m=") {
            let parts: Vec<&str> = value.split_whitespace().collect();
            if parts.len() >= 3 {
                session.media_type = Some(parts[0].to_string());
                session.media_port = Some(parts[1].to_string());
            }
        }
    }

    if let (Some(connection), Some(port)) = (&session.connection, &session.media_port) {
        session.stream_uri = derive_stream_uri(connection, port);
    }

    if session.name.is_empty() {
        tracing::debug!(stream_uri = ?session.stream_uri, "SDP has no session name");
        return None;
    }

    Some(session)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

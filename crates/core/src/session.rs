//! Announced session records.
//!
//! A [`SessionDescription`] is built from the SDP body of one SAP
//! announcement. Only the fields needed to list a stream in a playlist are
//! kept:
//!
//! | SDP line | Field |
//! |----------|-------|
//! | `s=` | [`name`](SessionDescription::name) |
//! | `i=` | [`description`](SessionDescription::description) |
//! | `u=` | [`url`](SessionDescription::url) |
//! | `c=` | [`connection`](SessionDescription::connection) |
//! | `m=` | [`media_type`](SessionDescription::media_type), [`media_port`](SessionDescription::media_port) |
//! | `a=x-plgroup:` | [`group`](SessionDescription::group) |
//!
//! The stream identity (`rtp://<ip>:<port>`) is derived from the connection
//! and media lines and is what [`StreamRegistry`](crate::StreamRegistry)
//! deduplicates on.

use chrono::{DateTime, Local};

/// URI scheme used for derived stream identities.
pub const STREAM_SCHEME: &str = "rtp://";

const UNKNOWN_NAME: &str = "Unknown Stream";

/// Session fields extracted from one announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDescription {
    /// Session name (`s=`). Never empty.
    pub name: String,
    /// Session information (`i=`).
    pub description: Option<String>,
    /// URI of further description (`u=`).
    pub url: Option<String>,
    /// Raw connection data (`c=`), e.g. `IN IP4 239.1.1.1/32`.
    pub connection: Option<String>,
    /// Transport port from the `m=` line, kept as text.
    pub media_port: Option<String>,
    /// Media type from the `m=` line (`video`, `audio`, ...).
    pub media_type: Option<String>,
    /// Channel group from the `a=x-plgroup:` attribute.
    pub group: Option<String>,
    /// When the announcement was parsed.
    pub observed_at: DateTime<Local>,
    /// Derived `rtp://<ip>:<port>`, present only when both `c=` and `m=`
    /// yielded usable values.
    pub stream_uri: Option<String>,
}

impl SessionDescription {
    /// Create a session with only a name set, observed now.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            url: None,
            connection: None,
            media_port: None,
            media_type: None,
            group: None,
            observed_at: Local::now(),
            stream_uri: None,
        }
    }

    /// Name for display, `Unknown Stream` if the name is empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNKNOWN_NAME
        } else {
            &self.name
        }
    }

    /// Title shown after the comma of an `#EXTINF` line:
    /// `name`, or `name - description` when a description is present.
    pub fn display_title(&self) -> String {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => format!("{} - {}", self.display_name(), desc),
            _ => self.display_name().to_string(),
        }
    }
}

/// Build `rtp://<ip>:<port>` from a `c=` value and an `m=` port.
///
/// The connection value is `<nettype> <addrtype> <address>`; the address
/// may carry a `/<ttl>` or `/<ttl>/<count>` suffix, which is dropped.
/// Returns `None` when the connection has fewer than three fields.
///
/// ```
/// use sap::session::derive_stream_uri;
///
/// assert_eq!(
///     derive_stream_uri("IN IP4 239.1.1.1/32", "5004").as_deref(),
///     Some("rtp://239.1.1.1:5004")
/// );
/// assert_eq!(derive_stream_uri("IN IP4", "5004"), None);
/// ```
pub fn derive_stream_uri(connection: &str, port: &str) -> Option<String> {
    let address = connection.split_whitespace().nth(2)?;
    let ip = address.split('/').next().unwrap_or(address);
    Some(format!("{STREAM_SCHEME}{ip}:{port}"))
}

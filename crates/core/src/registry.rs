use std::collections::HashSet;

use crate::session::SessionDescription;

/// Discovered streams, keyed by stream URI, in first-seen order.
///
/// Announcers repeat every few seconds, so the same stream arrives many
/// times per run. The first announcement for a URI is kept and later ones
/// are ignored, even if their SDP differs. Sessions without a stream URI
/// cannot be played and are never registered.
#[derive(Debug, Default)]
pub struct StreamRegistry {
    entries: Vec<SessionDescription>,
    seen: HashSet<String>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. Returns `true` if it was newly inserted.
    pub fn register(&mut self, session: SessionDescription) -> bool {
        let Some(uri) = session.stream_uri.as_deref() else {
            tracing::debug!(name = %session.name, "session has no stream URI, not registered");
            return false;
        };
        if !self.seen.insert(uri.to_string()) {
            tracing::trace!(uri, "stream already registered");
            return false;
        }

        tracing::debug!(uri, name = %session.name, total = self.entries.len() + 1, "stream registered");
        self.entries.push(session);
        true
    }

    /// Look up a stream by URI.
    pub fn get(&self, uri: &str) -> Option<&SessionDescription> {
        if !self.seen.contains(uri) {
            return None;
        }
        self.entries
            .iter()
            .find(|s| s.stream_uri.as_deref() == Some(uri))
    }

    /// All registered sessions in insertion order.
    pub fn all(&self) -> &[SessionDescription] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

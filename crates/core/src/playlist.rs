//! Extended M3U playlist output.
//!
//! ```text
//! #EXTM3U
//! #EXTGRP:News
//! #EXTINF:-1 tvg-id="239.1.1.1_5004" tvg-name="BBC One" group-title="News",BBC One - Live feed
//! rtp://239.1.1.1:5004
//! ```
//!
//! Attribute values are written verbatim. A name containing `"` or `,`
//! produces a line players may misread.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::registry::StreamRegistry;
use crate::session::{STREAM_SCHEME, SessionDescription};

/// First line of every extended M3U file.
pub const PLAYLIST_HEADER: &str = "#EXTM3U";

/// Group title used when an announcement carries no group.
pub const DEFAULT_GROUP: &str = "General";

/// Outcome of [`write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The playlist was written with this many entries.
    Written(usize),
    /// The registry was empty and no file was touched.
    NothingToWrite,
}

/// `tvg-id` for a stream URI: scheme removed, `:` and `/` turned into `_`.
///
/// ```
/// assert_eq!(sap::playlist::tvg_id("rtp://239.1.1.1:5004"), "239.1.1.1_5004");
/// ```
pub fn tvg_id(stream_uri: &str) -> String {
    stream_uri
        .replacen(STREAM_SCHEME, "", 1)
        .replace([':', '/'], "_")
}

/// Render the registry as playlist text. Every line ends in `\n`.
pub fn render(registry: &StreamRegistry) -> String {
    let mut out = String::new();
    out.push_str(PLAYLIST_HEADER);
    out.push('\n');

    for session in registry.all() {
        render_entry(&mut out, session);
    }
    out
}

fn render_entry(out: &mut String, session: &SessionDescription) {
    // Only registered sessions reach here, and those always have a URI.
    let Some(uri) = session.stream_uri.as_deref() else {
        return;
    };
    let group = session.group.as_deref().filter(|g| !g.is_empty());

    if let Some(group) = group {
        out.push_str(&format!("#EXTGRP:{}\n", group));
    }

    out.push_str(&format!(
        "#EXTINF:-1 tvg-id=\"{}\" tvg-name=\"{}\" group-title=\"{}\",{}\n",
        tvg_id(uri),
        session.display_name(),
        group.unwrap_or(DEFAULT_GROUP),
        session.display_title()
    ));
    out.push_str(uri);
    out.push('\n');
}

/// Write the playlist to `path`.
///
/// An empty registry is not an error: nothing is written and
/// [`WriteOutcome::NothingToWrite`] is returned.
pub fn write(registry: &StreamRegistry, path: impl AsRef<Path>) -> Result<WriteOutcome> {
    let path = path.as_ref();
    if registry.is_empty() {
        tracing::info!("no streams found to generate playlist");
        return Ok(WriteOutcome::NothingToWrite);
    }

    fs::write(path, render(registry))?;
    tracing::info!(path = %path.display(), streams = registry.len(), "M3U playlist generated");
    Ok(WriteOutcome::Written(registry.len()))
}

//! Test clip references
//!
//! A clip is identified by the URL (or derived filename) it was listed under in
//! the clip source. The reference is opaque to the orchestrator except for the
//! `recording` query parameter, which names the downloaded asset served from
//! `/audio.wav`.

use std::fmt;

use serde::Serialize;
use url::Url;

/// Query parameter carrying the recording identifier in a clip URL
pub const RECORDING_PARAM: &str = "recording";

/// Immutable reference to a single test audio asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ClipRef(String);

impl ClipRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Placeholder used when a call cannot be matched to any clip.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extract the recording identifier from the clip URL's query string.
    ///
    /// Returns `None` when the reference is not a URL or carries no
    /// non-empty `recording` parameter.
    pub fn recording_id(&self) -> Option<String> {
        let url = Url::parse(&self.0).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == RECORDING_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    /// Identifier recorded in the event log for the asset actually served.
    ///
    /// Falls back to the full reference when no recording id is embedded.
    pub fn served_asset(&self) -> String {
        self.recording_id().unwrap_or_else(|| self.0.clone())
    }
}

impl fmt::Display for ClipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClipRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClipRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

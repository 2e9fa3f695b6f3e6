use std::fmt;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};

pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Opaque locator (relative path, absolute path or URL) for one audio resource,
/// kept exactly as the caller supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackRef(String);

impl TrackRef {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TrackRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A decoded embedded picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub mime_type: String,
    pub data: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

impl Artwork {
    /// Render the picture as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// Cover art of a track: either a decoded embedded picture or the default cover.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cover {
    Embedded(Artwork),
    #[default]
    Default,
}

impl Cover {
    pub fn is_default(&self) -> bool {
        matches!(self, Cover::Default)
    }

    /// Short human-readable description, e.g. `image/png 300x300`.
    pub fn summary(&self) -> String {
        match self {
            Cover::Embedded(art) => format!("{} {}x{}", art.mime_type, art.width, art.height),
            Cover::Default => "default cover".to_string(),
        }
    }
}

/// Normalized record describing one playable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub album: String,
    pub artist: String,
    pub track_number: Option<u32>,
    pub source: TrackRef,
    pub cover: Cover,
    /// Position in the input list before sorting. Diagnostics only.
    pub original_index: usize,
}

use std::time::Duration;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/allegro/config.toml` or `~/.config/allegro/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ALLEGRO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playlist: PlaylistSettings,
    pub extract: ExtractSettings,
    pub fetch: FetchSettings,
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Track locators used when none are passed on the command line.
    ///
    /// Example: ["audio/1 - Intro.mp3", "https://example.org/2 - Outro.mp3"]
    pub tracks: Vec<String>,
    /// Directory or http(s) URL that relative locators are resolved against.
    /// Defaults to the current working directory.
    pub base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Upper bound for reading the tags of a single track (milliseconds).
    /// A read that takes longer yields a track with default fields.
    pub timeout_ms: u64,
    /// Embedded pictures larger than this are ignored (bytes).
    pub max_cover_bytes: usize,
}

impl ExtractSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_cover_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Connect timeout for remote locators (milliseconds).
    pub connect_timeout_ms: u64,
    /// Read timeout for remote locators (milliseconds).
    pub read_timeout_ms: u64,
    /// Deadline for a whole remote request, body included (milliseconds).
    pub total_timeout_ms: u64,
    /// Largest remote body accepted (bytes).
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            read_timeout_ms: 15_000,
            total_timeout_ms: 120_000,
            max_bytes: 256 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while expanding directories.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start playing right away after next/previous (otherwise the track is
    /// only loaded).
    pub autoplay_on_skip: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay_on_skip: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ allegro ~ ".to_string(),
        }
    }
}

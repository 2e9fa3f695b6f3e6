//! Commands accepted by the audio thread and the playback info it publishes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Location;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current track with the one at `location`, remembered as
    /// playlist position `index`. Starts paused unless `autoplay`.
    Load {
        index: usize,
        location: Location,
        autoplay: bool,
    },
    /// Toggle pause/resume.
    TogglePause,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Seek to an absolute position.
    SeekTo(Duration),
    /// Stop playback and drop the current track.
    Stop,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackInfo {
    /// Playlist position of the loaded track (if any).
    pub index: Option<usize>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Total duration, when the decoder knows it.
    pub total: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Set when the loaded track played to its end. Cleared by the consumer.
    pub finished: bool,
    /// Last load/decode failure, for display.
    pub error: Option<String>,
}

impl PlaybackInfo {
    /// Fraction of the track played so far, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        match self.total {
            Some(total) if !total.is_zero() => {
                (self.elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

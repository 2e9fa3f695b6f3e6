use tracing::{debug, warn};

use crate::app::{App, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::library::Base;

/// Hand the track at `index` to the audio thread.
pub fn load_track(app: &mut App, audio_player: &AudioPlayer, base: &Base, index: usize, autoplay: bool) {
    let Some(track) = app.playlist().get(index) else {
        return;
    };
    match base.resolve(&track.source) {
        Ok(location) => {
            debug!(index, source = %track.source, autoplay, "loading track");
            let _ = audio_player.send(AudioCmd::Load {
                index,
                location,
                autoplay,
            });
            app.playback = if autoplay {
                PlaybackState::Playing
            } else {
                PlaybackState::Paused
            };
        }
        Err(e) => {
            warn!(index, source = %track.source, error = %e, "cannot play track");
            app.playback = PlaybackState::Stopped;
        }
    }
}

/// Cue the track under the cursor, paused, so the first keypress plays it.
pub fn cue_first_track(app: &mut App, audio_player: &AudioPlayer, base: &Base) {
    if let Some(index) = app.cursor() {
        load_track(app, audio_player, base, index, false);
    }
}

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use crate::library::Location;

use super::error::AudioError;
use super::sink::create_sink;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Where a relative seek of `delta_secs` from `elapsed` lands, clamped to
/// the start of the track and, when known, to its end.
pub(super) fn seek_target(elapsed: Duration, delta_secs: i32, total: Option<Duration>) -> Duration {
    let magnitude = Duration::from_secs(delta_secs.unsigned_abs() as u64);
    let target = if delta_secs < 0 {
        elapsed.saturating_sub(magnitude)
    } else {
        elapsed.saturating_add(magnitude)
    };
    match total {
        Some(t) => target.min(t),
        None => target,
    }
}

fn open_output() -> Result<OutputStream, AudioError> {
    let mut stream = OutputStreamBuilder::open_default_stream()?;
    // rodio logs to stderr when OutputStream is dropped, which corrupts the TUI.
    stream.log_on_drop(false);
    Ok(stream)
}

fn update(playback_info: &PlaybackHandle, f: impl FnOnce(&mut PlaybackInfo)) {
    if let Ok(mut info) = playback_info.lock() {
        f(&mut info);
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

struct Engine {
    stream: Option<OutputStream>,
    agent: ureq::Agent,
    max_bytes: u64,
    playback_info: PlaybackHandle,
    sink: Option<Sink>,
    total: Option<Duration>,
    paused: bool,
}

impl Engine {
    fn load(&mut self, index: usize, location: &Location, autoplay: bool) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.total = None;
        self.paused = true;

        let result = match self.stream.as_ref() {
            Some(stream) => create_sink(stream, location, &self.agent, self.max_bytes),
            None => Err(AudioError::NoOutput),
        };

        match result {
            Ok((sink, total)) => {
                if autoplay {
                    sink.play();
                }
                self.paused = !autoplay;
                self.total = total;
                self.sink = Some(sink);
                info!(index, location = %location, autoplay, "track loaded");
                update(&self.playback_info, |info| {
                    *info = PlaybackInfo {
                        index: Some(index),
                        total,
                        playing: autoplay,
                        ..PlaybackInfo::default()
                    };
                });
            }
            Err(e) => {
                warn!(index, location = %location, error = %e, "failed to load track");
                update(&self.playback_info, |info| {
                    *info = PlaybackInfo {
                        index: Some(index),
                        error: Some(e.to_string()),
                        ..PlaybackInfo::default()
                    };
                });
            }
        }
    }

    fn toggle_pause(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if self.paused {
            sink.play();
        } else {
            sink.pause();
        }
        self.paused = !self.paused;
        let playing = !self.paused;
        update(&self.playback_info, |info| info.playing = playing);
    }

    fn seek_to(&mut self, target: Duration) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        let target = match self.total {
            Some(t) => target.min(t),
            None => target,
        };
        match sink.try_seek(target) {
            Ok(()) => update(&self.playback_info, |info| info.elapsed = target),
            Err(e) => debug!(error = %e, "seek not supported for current source"),
        }
    }

    fn seek_by(&mut self, delta_secs: i32) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        let target = seek_target(sink.get_pos(), delta_secs, self.total);
        self.seek_to(target);
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.paused = true;
        self.total = None;
        update(&self.playback_info, |info| *info = PlaybackInfo::default());
    }

    /// Refresh elapsed time and detect the end of the current track.
    fn tick(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if !self.paused && sink.empty() {
            self.sink = None;
            self.paused = true;
            update(&self.playback_info, |info| {
                info.playing = false;
                info.finished = true;
                if let Some(t) = info.total {
                    info.elapsed = t;
                }
            });
            return;
        }
        let pos = sink.get_pos();
        update(&self.playback_info, |info| info.elapsed = pos);
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(sink) = self.sink.take() {
            if !self.paused {
                fade_out_sink(&sink, fade_out_ms);
            }
            sink.stop();
        }
        update(&self.playback_info, |info| info.playing = false);
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    agent: ureq::Agent,
    max_bytes: u64,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match open_output() {
            Ok(s) => Some(s),
            Err(e) => {
                error!(error = %e, "audio output unavailable, playback disabled");
                update(&playback_info, |info| info.error = Some(e.to_string()));
                None
            }
        };

        let mut engine = Engine {
            stream,
            agent,
            max_bytes,
            playback_info,
            sink: None,
            total: None,
            paused: true,
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AudioCmd::Load {
                    index,
                    location,
                    autoplay,
                }) => engine.load(index, &location, autoplay),
                Ok(AudioCmd::TogglePause) => engine.toggle_pause(),
                Ok(AudioCmd::SeekBy(secs)) => engine.seek_by(secs),
                Ok(AudioCmd::SeekTo(pos)) => engine.seek_to(pos),
                Ok(AudioCmd::Stop) => engine.stop(),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    engine.quit(fade_out_ms);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => engine.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("audio thread exiting");
    })
}

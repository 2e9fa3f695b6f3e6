use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer, PlaybackInfo};
use crate::config;
use crate::library::Base;
use crate::prefs::Prefs;
use crate::ui;

use super::startup::load_track;

/// Everything the loop reads but never mutates.
pub struct Context<'a> {
    pub settings: &'a config::Settings,
    pub base: &'a Base,
    pub audio_player: &'a AudioPlayer,
    pub prefs_path: Option<&'a Path>,
}

/// UI-level playback state derived from what the audio thread published.
fn playback_state(info: &PlaybackInfo) -> PlaybackState {
    if info.playing {
        PlaybackState::Playing
    } else if info.index.is_some() && info.error.is_none() {
        PlaybackState::Paused
    } else {
        PlaybackState::Stopped
    }
}

/// Position for the `0`-`9` keys: `digit` tenths into the track.
fn seek_fraction(total: Option<Duration>, digit: u32) -> Option<Duration> {
    total.map(|t| t.mul_f64(f64::from(digit.min(9)) / 10.0))
}

/// Main terminal event loop: handles input, UI drawing and sync with the
/// audio thread. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ctx: &Context<'_>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        if ctx.audio_player.take_finished() {
            if let Some(next) = app.next_track() {
                load_track(app, ctx.audio_player, ctx.base, next, true);
            }
        }

        if let Some(handle) = app.playback_handle.as_ref().cloned() {
            if let Ok(info) = handle.lock() {
                app.playback = playback_state(&info);
            }
        }

        terminal.draw(|f| ui::draw(f, app, &ctx.settings.ui, &ctx.settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, ctx, app) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn play(ctx: &Context<'_>, app: &mut App, index: Option<usize>, autoplay: bool) {
    if let Some(i) = index {
        load_track(app, ctx.audio_player, ctx.base, i, autoplay);
    }
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(key: KeyEvent, ctx: &Context<'_>, app: &mut App) -> bool {
    let settings = ctx.settings;
    let audio_player = ctx.audio_player;

    match key.code {
        KeyCode::Char('q') => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        KeyCode::Char('j') | KeyCode::Down => app.select_down(),
        KeyCode::Char('k') | KeyCode::Up => app.select_up(),
        KeyCode::Enter => {
            let index = app.select_track(app.selected);
            play(ctx, app, index, true);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => match app.playback {
            PlaybackState::Stopped => {
                let index = app.cursor();
                play(ctx, app, index, true);
            }
            PlaybackState::Playing | PlaybackState::Paused => {
                let _ = audio_player.send(AudioCmd::TogglePause);
            }
        },
        KeyCode::Char('s') => {
            let _ = audio_player.send(AudioCmd::Stop);
            app.playback = PlaybackState::Stopped;
        }
        KeyCode::Char('l') | KeyCode::Char('n') => {
            let index = app.next_track();
            let autoplay = app.autoplay_on_skip;
            play(ctx, app, index, autoplay);
        }
        KeyCode::Char('h') | KeyCode::Char('b') => {
            let index = app.previous_track();
            let autoplay = app.autoplay_on_skip;
            play(ctx, app, index, autoplay);
        }
        KeyCode::Char('L') => {
            let secs = settings.controls.scrub_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(secs));
        }
        KeyCode::Char('H') => {
            let secs = settings.controls.scrub_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(-secs));
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let total = app
                .playback_handle
                .as_ref()
                .and_then(|h| h.lock().ok().and_then(|info| info.total));
            if let Some(pos) = c.to_digit(10).and_then(|d| seek_fraction(total, d)) {
                let _ = audio_player.send(AudioCmd::SeekTo(pos));
            }
        }
        KeyCode::Char('t') => {
            let theme = app.toggle_theme();
            info!(?theme, "theme changed");
            if let Some(path) = ctx.prefs_path {
                if let Err(e) = (Prefs { theme }).save_to(path) {
                    warn!(error = %e, "failed to save preferences");
                }
            }
        }
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_state_reflects_published_info() {
        let mut info = PlaybackInfo::default();
        assert_eq!(playback_state(&info), PlaybackState::Stopped);

        info.index = Some(2);
        assert_eq!(playback_state(&info), PlaybackState::Paused);

        info.playing = true;
        assert_eq!(playback_state(&info), PlaybackState::Playing);

        info.playing = false;
        info.error = Some("cannot decode".into());
        assert_eq!(playback_state(&info), PlaybackState::Stopped);
    }

    #[test]
    fn digit_seeks_to_tenths_of_known_total() {
        let total = Some(Duration::from_secs(200));
        assert_eq!(seek_fraction(total, 0), Some(Duration::ZERO));
        assert_eq!(seek_fraction(total, 5), Some(Duration::from_secs(100)));
        assert_eq!(seek_fraction(total, 9), Some(Duration::from_secs(180)));
        assert_eq!(seek_fraction(None, 5), None);
    }
}

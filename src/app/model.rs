//! Application model types: `App` and `PlaybackState`.

use crate::audio::PlaybackHandle;
use crate::library::{Playlist, Track};
use crate::prefs::Theme;

use super::cursor::{select_at, select_next, select_previous};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The player state for one loaded playlist.
pub struct App {
    playlist: Playlist,
    /// Track loaded for playback.
    cursor: Option<usize>,
    /// Highlighted row in the playlist panel.
    pub selected: usize,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,
    pub theme: Theme,
    pub autoplay_on_skip: bool,
}

impl App {
    /// Create a new `App` for `playlist`, with the cursor on the first track
    /// when there is one.
    pub fn new(playlist: Playlist) -> Self {
        let cursor = if playlist.is_empty() { None } else { Some(0) };
        Self {
            playlist,
            cursor,
            selected: 0,
            playback: PlaybackState::Stopped,
            playback_handle: None,
            theme: Theme::default(),
            autoplay_on_skip: true,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn tracks(&self) -> &[Track] {
        self.playlist.tracks()
    }

    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The track under the cursor.
    pub fn current_track(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.playlist.get(i))
    }

    /// Advance the cursor (wrapping) and return the new position.
    pub fn next_track(&mut self) -> Option<usize> {
        self.cursor = select_next(self.cursor, self.playlist.len());
        self.follow_cursor();
        self.cursor
    }

    /// Move the cursor back (wrapping) and return the new position.
    pub fn previous_track(&mut self) -> Option<usize> {
        self.cursor = select_previous(self.cursor, self.playlist.len());
        self.follow_cursor();
        self.cursor
    }

    /// Point the cursor at `index`. Out-of-range indices are ignored.
    pub fn select_track(&mut self, index: usize) -> Option<usize> {
        self.cursor = select_at(self.cursor, index, self.playlist.len());
        self.follow_cursor();
        self.cursor
    }

    fn follow_cursor(&mut self) {
        if let Some(i) = self.cursor {
            self.selected = i;
        }
    }

    /// Move the highlighted row down, wrapping at the end.
    pub fn select_down(&mut self) {
        if let Some(i) = select_next(Some(self.selected), self.playlist.len()) {
            self.selected = i;
        }
    }

    /// Move the highlighted row up, wrapping at the start.
    pub fn select_up(&mut self) {
        if let Some(i) = select_previous(Some(self.selected), self.playlist.len()) {
            self.selected = i;
        }
    }

    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }
}

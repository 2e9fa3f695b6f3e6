//! Playlist assembly: concurrent extraction followed by a single sort.

use std::cmp::Ordering;

use futures::future::join_all;
use tracing::info;

use super::extract::Extractor;
use super::model::{Track, TrackRef};
use super::tags::TagReader;

/// Total order over tracks:
/// tracks with a number come first, ordered by number; everything else
/// (both unnumbered, or equal numbers) is ordered by case-insensitive title,
/// then by source.
pub fn compare_tracks(a: &Track, b: &Track) -> Ordering {
    match (a.track_number, b.track_number) {
        (Some(x), Some(y)) if x != y => return x.cmp(&y),
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        _ => {}
    }

    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.source.cmp(&b.source))
}

/// Sorted, immutable sequence of tracks for one load cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Sort `tracks` once and freeze them.
    pub fn from_tracks(mut tracks: Vec<Track>) -> Self {
        tracks.sort_by(compare_tracks);
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Extract every locator concurrently, wait for all of them, then sort.
pub async fn build_playlist<R: TagReader>(extractor: &Extractor<R>, refs: Vec<TrackRef>) -> Playlist {
    let total = refs.len();
    let extractions = refs
        .into_iter()
        .enumerate()
        .map(|(index, source)| extractor.extract(source, index));

    let tracks = join_all(extractions).await;
    let defaulted = tracks.iter().filter(|t| t.cover.is_default()).count();
    info!(total, default_covers = defaulted, "playlist loaded");

    Playlist::from_tracks(tracks)
}

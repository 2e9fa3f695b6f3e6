//! Tag extraction: one locator in, one fully-populated `Track` out.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::ExtractSettings;

use super::cover::cover_from;
use super::error::ExtractError;
use super::locator::{Base, title_from_ref};
use super::model::{Cover, Track, TrackRef, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
use super::tags::{RawTags, TagReader};

/// Parse the leading run of ASCII digits of a track field (`"3"`, `"3/12"`).
///
/// Returns `None` when there are no leading digits or the value does not fit
/// a `u32`.
pub fn parse_track_number(field: &str) -> Option<u32> {
    let field = field.trim_start();
    let end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    if end == 0 {
        return None;
    }
    field[..end].parse().ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Track {
    /// Normalize raw tag values, applying the defaults for absent fields.
    pub fn from_tags(source: TrackRef, index: usize, tags: RawTags, max_cover_bytes: usize) -> Self {
        let cover = cover_from(tags.picture.as_ref(), max_cover_bytes);
        let title = non_blank(tags.title).unwrap_or_else(|| title_from_ref(&source));

        Self {
            title,
            album: non_blank(tags.album).unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
            artist: non_blank(tags.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            track_number: tags.track.as_deref().and_then(parse_track_number),
            source,
            cover,
            original_index: index,
        }
    }

    /// Track for a locator whose tags could not be read at all.
    pub fn fallback(source: TrackRef, index: usize) -> Self {
        Self {
            title: title_from_ref(&source),
            album: UNKNOWN_ALBUM.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            track_number: None,
            source,
            cover: Cover::Default,
            original_index: index,
        }
    }
}

/// Resolves locators and reads their tags through a `TagReader`.
pub struct Extractor<R: TagReader> {
    reader: Arc<R>,
    base: Base,
    settings: ExtractSettings,
}

impl<R: TagReader> Extractor<R> {
    pub fn new(reader: R, base: Base, settings: ExtractSettings) -> Self {
        Self {
            reader: Arc::new(reader),
            base,
            settings,
        }
    }

    /// Extract the track for `source`. Never fails: any error along the way
    /// yields `Track::fallback`.
    pub async fn extract(&self, source: TrackRef, index: usize) -> Track {
        match self.try_extract(&source, index).await {
            Ok(track) => track,
            Err(e) => {
                match &e {
                    ExtractError::Panicked => error!(source = %source, index, "tag reader panicked"),
                    _ => warn!(source = %source, index, error = %e, "tag read failed, using defaults"),
                }
                Track::fallback(source, index)
            }
        }
    }

    async fn try_extract(&self, source: &TrackRef, index: usize) -> Result<Track, ExtractError> {
        let location = self.base.resolve(source)?;
        debug!(source = %source, location = %location, "reading tags");

        let reader = Arc::clone(&self.reader);
        let owned_source = source.clone();
        let max_cover_bytes = self.settings.max_cover_bytes;
        let task = tokio::task::spawn_blocking(move || {
            reader
                .read(&location)
                .map(|tags| Track::from_tags(owned_source, index, tags, max_cover_bytes))
        });

        let timeout = self.settings.timeout();
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) if join_error.is_panic() => Err(ExtractError::Panicked),
            Ok(Err(join_error)) => Err(ExtractError::Io(std::io::Error::other(join_error))),
            Err(_) => Err(ExtractError::Timeout(timeout)),
        }
    }
}

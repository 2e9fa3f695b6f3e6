//! Tag reading backed by `lofty`.
//!
//! `TagReader` is the seam between the extractor and the binary tag formats:
//! it turns a resolved `Location` into the raw, unnormalized field values.
//! Normalization (defaults, track-number parsing, cover decoding) happens in
//! the extractor.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use lofty::config::{ParseOptions, ParsingMode};
use lofty::file::{TaggedFile, TaggedFileExt};
use lofty::picture::PictureType;
use lofty::prelude::Accessor;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use tracing::debug;

use crate::config::FetchSettings;

use super::error::ExtractError;
use super::fetch;
use super::locator::Location;

/// Embedded picture as stored in the tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPicture {
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

/// Field values as found in the tag block. `None` means absent or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTags {
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub track: Option<String>,
    pub picture: Option<RawPicture>,
}

/// Reads the embedded tag block of one resource. Implementations block; the
/// extractor runs them on the blocking pool.
pub trait TagReader: Send + Sync + 'static {
    fn read(&self, location: &Location) -> Result<RawTags, ExtractError>;
}

/// Production reader: local files through `lofty` directly, remote ones
/// downloaded first and probed from memory.
pub struct LoftyReader {
    agent: ureq::Agent,
    max_fetch_bytes: u64,
}

impl LoftyReader {
    pub fn new(settings: &FetchSettings) -> Self {
        Self {
            agent: fetch::agent(settings),
            max_fetch_bytes: settings.max_bytes,
        }
    }
}

impl TagReader for LoftyReader {
    fn read(&self, location: &Location) -> Result<RawTags, ExtractError> {
        let tagged = match location {
            Location::File(path) => read_tagged_path(path)?,
            Location::Remote(url) => {
                let bytes = fetch::fetch_bytes(&self.agent, url, self.max_fetch_bytes)?;
                read_tagged_bytes(&bytes)?
            }
        };
        Ok(raw_tags(&tagged))
    }
}

fn parse_options(parsing_mode: ParsingMode, max_junk_bytes: usize) -> ParseOptions {
    ParseOptions::new()
        .read_properties(false)
        .read_cover_art(true)
        .parsing_mode(parsing_mode)
        .max_junk_bytes(max_junk_bytes)
}

fn strict_options() -> ParseOptions {
    parse_options(ParsingMode::BestAttempt, 1024)
}

fn relaxed_options() -> ParseOptions {
    parse_options(ParsingMode::Relaxed, 64 * 1024)
}

/// Probe by extension first, then by content with relaxed parsing.
fn read_tagged_path(path: &Path) -> Result<TaggedFile, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::FileNotFound(path.to_path_buf()));
    }

    match Probe::open(path)?.options(strict_options()).read() {
        Ok(tagged) => return Ok(tagged),
        Err(error) => {
            debug!(path = %path.display(), %error, "extension-based probe failed, guessing from content");
        }
    }

    let file = File::open(path)?;
    let tagged = Probe::new(BufReader::new(file))
        .options(relaxed_options())
        .guess_file_type()?
        .read()?;
    Ok(tagged)
}

fn read_tagged_bytes(bytes: &[u8]) -> Result<TaggedFile, ExtractError> {
    match Probe::new(Cursor::new(bytes))
        .options(strict_options())
        .guess_file_type()?
        .read()
    {
        Ok(tagged) => return Ok(tagged),
        Err(error) => {
            debug!(%error, "in-memory probe failed, retrying relaxed");
        }
    }

    let tagged = Probe::new(Cursor::new(bytes))
        .options(relaxed_options())
        .guess_file_type()?
        .read()?;
    Ok(tagged)
}

/// First non-blank value, looking at the primary tag before the others.
fn first_non_empty<F>(tagged: &TaggedFile, mut extractor: F) -> Option<String>
where
    F: FnMut(&Tag) -> Option<String>,
{
    tagged
        .primary_tag()
        .into_iter()
        .chain(tagged.tags().iter())
        .filter_map(|tag| extractor(tag))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn raw_tags(tagged: &TaggedFile) -> RawTags {
    let title = first_non_empty(tagged, |tag| tag.title().map(|v| v.into_owned()));
    let album = first_non_empty(tagged, |tag| tag.album().map(|v| v.into_owned()));
    let artist = first_non_empty(tagged, |tag| tag.artist().map(|v| v.into_owned()));
    let track = first_non_empty(tagged, |tag| {
        tag.get_string(ItemKey::TrackNumber)
            .map(str::to_string)
            .or_else(|| tag.track().map(|n| n.to_string()))
    });

    RawTags {
        title,
        album,
        artist,
        track,
        picture: first_picture(tagged),
    }
}

/// Front cover when there is one, otherwise the first picture of any kind.
fn first_picture(tagged: &TaggedFile) -> Option<RawPicture> {
    let tags: Vec<&Tag> = tagged
        .primary_tag()
        .into_iter()
        .chain(tagged.tags().iter())
        .collect();

    let picture = tags
        .iter()
        .flat_map(|tag| tag.pictures())
        .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
        .or_else(|| tags.iter().flat_map(|tag| tag.pictures()).next())?;

    Some(RawPicture {
        mime_type: picture.mime_type().map(|m| m.as_str().to_string()),
        data: picture.data().to_vec(),
    })
}

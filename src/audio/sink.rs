//! Opening decoders and sinks for resolved track locations.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::debug;

use crate::library::{Location, fetch_bytes};

use super::error::AudioError;

/// Byte source for the decoder: a local file or a fully downloaded body.
pub(super) enum MediaReader {
    File(BufReader<File>),
    Memory(Cursor<Vec<u8>>),
}

impl Read for MediaReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            MediaReader::File(r) => r.read(buf),
            MediaReader::Memory(r) => r.read(buf),
        }
    }
}

impl Seek for MediaReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            MediaReader::File(r) => r.seek(pos),
            MediaReader::Memory(r) => r.seek(pos),
        }
    }
}

/// Open the bytes behind `location`, downloading remote tracks in full.
pub(super) fn open_media(
    location: &Location,
    agent: &ureq::Agent,
    max_bytes: u64,
) -> Result<MediaReader, AudioError> {
    match location {
        Location::File(path) => File::open(path)
            .map(|f| MediaReader::File(BufReader::new(f)))
            .map_err(|source| AudioError::Open {
                path: path.clone(),
                source,
            }),
        Location::Remote(url) => {
            let bytes = fetch_bytes(agent, url, max_bytes)?;
            debug!(url = %url, bytes = bytes.len(), "downloaded remote track");
            Ok(MediaReader::Memory(Cursor::new(bytes)))
        }
    }
}

/// Decode `location` into a paused `Sink`, returning it with the track's
/// total duration when known.
pub(super) fn create_sink(
    stream: &OutputStream,
    location: &Location,
    agent: &ureq::Agent,
    max_bytes: u64,
) -> Result<(Sink, Option<Duration>), AudioError> {
    let reader = open_media(location, agent, max_bytes)?;
    let source = Decoder::new(reader).map_err(|source| AudioError::Decode {
        location: location.to_string(),
        source,
    })?;
    let total = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

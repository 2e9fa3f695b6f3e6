use std::path::PathBuf;

use thiserror::Error;

/// Reasons a track's tags could not be read. Never leaves the extractor:
/// every variant degrades to a track with default fields.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot resolve locator {locator:?}: {reason}")]
    Resolve { locator: String, reason: String },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata error: {0}")]
    Lofty(#[from] lofty::error::LoftyError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("tag read timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("tag reader panicked")]
    Panicked,
}

/// Errors from downloading a remote locator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("body of {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: u64 },

    #[error("I/O error reading {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors turning an embedded picture into displayable artwork.
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("picture payload is empty")]
    Empty,

    #[error("picture too large: {0} bytes (max {1} bytes)")]
    TooLarge(usize, usize),

    #[error("picture format could not be determined")]
    UnknownFormat,

    #[error("picture could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

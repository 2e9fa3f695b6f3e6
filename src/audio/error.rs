use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::library::FetchError;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Output(#[from] rodio::StreamError),
    #[error("audio output is unavailable")]
    NoOutput,
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("cannot decode {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

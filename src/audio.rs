//! Audio playback: a dedicated thread owning the `rodio` output stream,
//! driven through `AudioCmd` messages and reporting back via `PlaybackInfo`.

mod error;
mod player;
mod sink;
mod thread;
mod types;

pub use error::AudioError;
pub use player::AudioPlayer;
pub use types::{AudioCmd, PlaybackHandle, PlaybackInfo};

#[cfg(test)]
mod tests;

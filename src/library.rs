//! Metadata ingestion and playlist ordering.
//!
//! Locators are resolved (`locator`), optionally expanded from directories
//! (`expand`), read through a `TagReader` (`tags`, `fetch`), normalized into
//! `Track`s (`extract`, `cover`) and sorted into a `Playlist` (`playlist`).

mod cover;
mod display;
mod error;
mod expand;
mod extract;
mod fetch;
mod locator;
mod model;
mod playlist;
mod tags;

pub use display::playlist_line;
pub use error::FetchError;
pub use expand::expand_refs;
pub use extract::Extractor;
pub use fetch::{agent, fetch_bytes};
pub use locator::{Base, Location};
pub use model::{Cover, Track, TrackRef};
pub use playlist::{Playlist, build_playlist};
pub use tags::LoftyReader;

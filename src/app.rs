//! Application module: the player state shared by the TUI and runtime.
//!
//! `App` (in `app::model`) owns the sorted playlist, the playback cursor
//! and UI-facing flags. Cursor arithmetic lives in `app::cursor`.

mod cursor;
mod model;

pub use cursor::{select_at, select_next, select_previous};
pub use model::*;

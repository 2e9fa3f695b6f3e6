//! Playback cursor arithmetic over a playlist of `len` entries.
//!
//! All three functions are pure: they take the current cursor and return the
//! new one, leaving it unchanged whenever the move is not possible.

/// Move to the following entry, wrapping to the first one after the last.
pub fn select_next(cursor: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return cursor;
    }
    match cursor {
        Some(i) => Some((i + 1) % len),
        None => Some(0),
    }
}

/// Move to the preceding entry, wrapping to the last one before the first.
pub fn select_previous(cursor: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return cursor;
    }
    match cursor {
        Some(i) => Some((i % len + len - 1) % len),
        None => Some(len - 1),
    }
}

/// Jump to `index` if it is in range; otherwise a no-op.
pub fn select_at(cursor: Option<usize>, index: usize, len: usize) -> Option<usize> {
    if index < len { Some(index) } else { cursor }
}

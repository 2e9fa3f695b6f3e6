use super::model::Track;

/// Playlist row text: `N. Title - Album`, without the number prefix when the
/// track has none.
pub fn playlist_line(track: &Track) -> String {
    let number = track
        .track_number
        .map(|n| format!("{n}. "))
        .unwrap_or_default();
    format!("{}{} - {}", number, track.title.trim(), track.album.trim())
}

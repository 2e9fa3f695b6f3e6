use std::sync::Arc;

use tracing::debug;

use super::error::CoverError;
use super::model::{Artwork, Cover};
use super::tags::RawPicture;

/// Decode an embedded picture into displayable artwork.
///
/// The declared MIME type wins; when the tag does not carry one the format is
/// detected from the bytes.
pub fn decode_artwork(picture: &RawPicture, max_bytes: usize) -> Result<Artwork, CoverError> {
    let data = picture.data.as_slice();
    if data.is_empty() {
        return Err(CoverError::Empty);
    }
    if data.len() > max_bytes {
        return Err(CoverError::TooLarge(data.len(), max_bytes));
    }

    let detected = image::guess_format(data).ok();
    let mime_type = picture
        .mime_type
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .or_else(|| detected.map(|f| f.to_mime_type().to_string()))
        .ok_or(CoverError::UnknownFormat)?;

    let format = detected.ok_or(CoverError::UnknownFormat)?;
    let decoded = image::load_from_memory_with_format(data, format)?;

    Ok(Artwork {
        mime_type,
        data: Arc::from(data),
        width: decoded.width(),
        height: decoded.height(),
    })
}

/// Cover for a track: the decoded picture, or the default cover when there
/// is no picture or it cannot be decoded.
pub fn cover_from(picture: Option<&RawPicture>, max_bytes: usize) -> Cover {
    let Some(picture) = picture else {
        return Cover::Default;
    };

    match decode_artwork(picture, max_bytes) {
        Ok(art) => Cover::Embedded(art),
        Err(error) => {
            debug!(%error, "embedded picture unusable, using default cover");
            Cover::Default
        }
    }
}

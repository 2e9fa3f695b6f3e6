//! Locator resolution.
//!
//! A `TrackRef` is opaque to the rest of the player. Before its tags can be
//! read (or its audio decoded) it is resolved against a `Base` into a
//! `Location`: an absolute file path or an absolute http(s) URL. The
//! resolved form is never written back into a `Track`.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use super::error::ExtractError;
use super::model::TrackRef;

/// Fetchable form of a `TrackRef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Remote(Url),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(p) => write!(f, "{}", p.display()),
            Location::Remote(u) => f.write_str(u.as_str()),
        }
    }
}

/// What relative locators are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base {
    Dir(PathBuf),
    Url(Url),
}

impl Base {
    /// Interpret `s` as an http(s) URL when it parses as one, otherwise as a
    /// directory path.
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if is_http(&url) => Base::Url(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Base::Dir)
                .unwrap_or_else(|_| Base::Dir(PathBuf::from(s))),
            _ => Base::Dir(PathBuf::from(s)),
        }
    }

    /// The process working directory (falls back to `.`).
    pub fn current_dir() -> Self {
        Base::Dir(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Resolve `track_ref` into a fetchable location.
    pub fn resolve(&self, track_ref: &TrackRef) -> Result<Location, ExtractError> {
        let raw = track_ref.as_str();
        let fail = |reason: String| ExtractError::Resolve {
            locator: raw.to_string(),
            reason,
        };

        if raw.trim().is_empty() {
            return Err(fail("empty locator".into()));
        }

        if let Ok(url) = Url::parse(raw) {
            if is_http(&url) {
                return Ok(Location::Remote(url));
            }
            if url.scheme() == "file" {
                return url
                    .to_file_path()
                    .map(Location::File)
                    .map_err(|_| fail("file URL has no local path".into()));
            }
            // Single-letter schemes are Windows drive letters, not URLs.
            if url.scheme().len() > 1 {
                // A bare file name containing a colon ("Intro: Live.mp3").
                if let Base::Dir(dir) = self {
                    let local = dir.join(raw);
                    if local.exists() {
                        return Ok(Location::File(local));
                    }
                }
                return Err(fail(format!("unsupported scheme {:?}", url.scheme())));
            }
        }

        match self {
            Base::Dir(dir) => {
                let path = Path::new(raw);
                if path.is_absolute() {
                    Ok(Location::File(path.to_path_buf()))
                } else {
                    Ok(Location::File(dir.join(path)))
                }
            }
            Base::Url(base) => base
                .join(raw)
                .map(Location::Remote)
                .map_err(|e| fail(e.to_string())),
        }
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Derive a display title from a locator: its last path segment without the
/// trailing extension. URL locators lose their query/fragment and are
/// percent-decoded.
pub fn title_from_ref(track_ref: &TrackRef) -> String {
    let raw = track_ref.as_str();

    let segment: String = match Url::parse(raw) {
        Ok(url) if is_http(&url) || url.scheme() == "file" => {
            let last = url.path().rsplit('/').next().unwrap_or_default();
            urlencoding::decode(last)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| last.to_string())
        }
        _ => raw
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let stem = match segment.rfind('.') {
        Some(i) if i + 1 < segment.len() => &segment[..i],
        _ => segment.as_str(),
    };

    if !stem.is_empty() {
        stem.to_string()
    } else if !segment.is_empty() {
        segment
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str) -> TrackRef {
        TrackRef::new(s)
    }

    #[test]
    fn relative_path_joins_base_dir() {
        let base = Base::Dir(PathBuf::from("/srv/player"));
        assert_eq!(
            base.resolve(&r("audio/1 - Intro.mp3")).unwrap(),
            Location::File(PathBuf::from("/srv/player/audio/1 - Intro.mp3"))
        );
    }

    #[test]
    fn absolute_path_ignores_base_dir() {
        let base = Base::Dir(PathBuf::from("/srv/player"));
        assert_eq!(
            base.resolve(&r("/music/a.mp3")).unwrap(),
            Location::File(PathBuf::from("/music/a.mp3"))
        );
    }

    #[test]
    fn relative_path_joins_base_url_and_encodes_spaces() {
        let base = Base::parse("https://example.org/player/");
        let loc = base.resolve(&r("audio/5 - L'imbianchino.mp3")).unwrap();
        match loc {
            Location::Remote(u) => assert_eq!(
                u.as_str(),
                "https://example.org/player/audio/5%20-%20L'imbianchino.mp3"
            ),
            other => panic!("expected remote, got {other:?}"),
        }
    }

    #[test]
    fn http_locator_resolves_to_itself() {
        let base = Base::Dir(PathBuf::from("/srv"));
        let loc = base.resolve(&r("http://host/x.mp3")).unwrap();
        assert_eq!(loc, Location::Remote(Url::parse("http://host/x.mp3").unwrap()));
    }

    #[test]
    fn file_url_resolves_to_path() {
        let base = Base::Dir(PathBuf::from("/srv"));
        assert_eq!(
            base.resolve(&r("file:///music/a.mp3")).unwrap(),
            Location::File(PathBuf::from("/music/a.mp3"))
        );
    }

    #[test]
    fn unsupported_scheme_and_empty_locator_fail() {
        let base = Base::Dir(PathBuf::from("/srv"));
        assert!(base.resolve(&r("ftp://host/x.mp3")).is_err());
        assert!(base.resolve(&r("   ")).is_err());
    }

    #[test]
    fn colon_in_existing_file_name_is_not_a_scheme() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Intro: Live.mp3"), b"x").unwrap();
        let base = Base::Dir(dir.path().to_path_buf());

        assert_eq!(
            base.resolve(&r("Intro: Live.mp3")).unwrap(),
            Location::File(dir.path().join("Intro: Live.mp3"))
        );
        assert!(base.resolve(&r("Part2:Reprise.flac")).is_err());
    }

    #[test]
    fn dot_slash_prefix_keeps_colon_names_relative() {
        let base = Base::Dir(PathBuf::from("/srv"));
        assert_eq!(
            base.resolve(&r("./Part2:Reprise.flac")).unwrap(),
            Location::File(PathBuf::from("/srv/./Part2:Reprise.flac"))
        );
    }

    #[test]
    fn base_parse_distinguishes_urls_from_dirs() {
        assert!(matches!(Base::parse("https://a.b/c/"), Base::Url(_)));
        assert_eq!(Base::parse("music"), Base::Dir(PathBuf::from("music")));
    }

    #[test]
    fn title_from_ref_strips_directory_and_extension() {
        assert_eq!(title_from_ref(&r("audio/1 - Intro.mp3")), "1 - Intro");
        assert_eq!(title_from_ref(&r("c.mp3")), "c");
        assert_eq!(title_from_ref(&r("a.tar.gz")), "a.tar");
        assert_eq!(title_from_ref(&r("noext")), "noext");
        assert_eq!(title_from_ref(&r("dir/trailingdot.")), "trailingdot.");
    }

    #[test]
    fn title_from_ref_decodes_urls_and_drops_query() {
        assert_eq!(
            title_from_ref(&r("https://host/music/My%20Song.mp3?token=abc#t=3")),
            "My Song"
        );
    }

    #[test]
    fn title_from_ref_keeps_hidden_file_name() {
        assert_eq!(title_from_ref(&r("audio/.mp3")), ".mp3");
    }
}

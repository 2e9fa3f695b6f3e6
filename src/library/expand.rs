use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::locator::{Base, Location};
use super::model::TrackRef;

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// `exts` must already be lowercase and dot-free.
fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Audio files under `dir`, relative to it, ordered by path.
pub fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let exts = normalized_extensions(settings);
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), &exts))
        .filter_map(|e| e.path().strip_prefix(dir).ok().map(Path::to_path_buf))
        .collect();

    files.sort();
    files
}

fn join_ref(dir_ref: &str, relative: &Path) -> TrackRef {
    let rel: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let prefix = dir_ref.trim_end_matches(['/', '\\']);
    // "./" keeps names like "Intro: Live.mp3" from parsing as a URL scheme.
    if prefix.is_empty() || prefix == "." {
        TrackRef::new(format!("./{}", rel.join("/")))
    } else {
        TrackRef::new(format!("{}/{}", prefix, rel.join("/")))
    }
}

/// Replace every locator naming a local directory with the audio files inside
/// it. Other locators pass through untouched.
pub fn expand_refs(refs: Vec<TrackRef>, base: &Base, settings: &LibrarySettings) -> Vec<TrackRef> {
    let mut out = Vec::with_capacity(refs.len());
    for r in refs {
        match base.resolve(&r) {
            Ok(Location::File(path)) if path.is_dir() => {
                let files = scan_dir(&path, settings);
                debug!(dir = %path.display(), found = files.len(), "expanded directory locator");
                out.extend(files.iter().map(|f| join_ref(r.as_str(), f)));
            }
            _ => out.push(r),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let exts = normalized_extensions(&LibrarySettings::default());
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a"), &exts));
    }

    #[test]
    fn configured_extensions_are_normalized() {
        let settings = LibrarySettings {
            extensions: vec![" .OGG".into(), "".into(), ".".into()],
            ..LibrarySettings::default()
        };
        assert_eq!(normalized_extensions(&settings), vec!["ogg".to_string()]);
    }

    #[test]
    fn expand_replaces_directory_with_sorted_files() {
        let dir = tempdir().unwrap();
        let audio = dir.path().join("audio");
        fs::create_dir_all(&audio).unwrap();
        fs::write(audio.join("b.MP3"), b"x").unwrap();
        fs::write(audio.join("a.ogg"), b"x").unwrap();
        fs::write(audio.join("notes.txt"), b"x").unwrap();

        let base = Base::Dir(dir.path().to_path_buf());
        let refs = vec![TrackRef::new("audio/"), TrackRef::new("https://host/x.mp3")];
        let out = expand_refs(refs, &base, &LibrarySettings::default());

        assert_eq!(
            out,
            vec![
                TrackRef::new("audio/a.ogg"),
                TrackRef::new("audio/b.MP3"),
                TrackRef::new("https://host/x.mp3"),
            ]
        );
    }

    #[test]
    fn expand_keeps_file_and_missing_refs_verbatim() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.mp3"), b"x").unwrap();

        let base = Base::Dir(dir.path().to_path_buf());
        let refs = vec![TrackRef::new("one.mp3"), TrackRef::new("missing/two.mp3")];
        let out = expand_refs(refs.clone(), &base, &LibrarySettings::default());
        assert_eq!(out, refs);
    }

    #[test]
    fn scan_skips_hidden_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"x").unwrap();

        let files = scan_dir(dir.path(), &LibrarySettings::default());
        assert_eq!(files, vec![PathBuf::from("visible.mp3")]);
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"x").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        assert_eq!(scan_dir(dir.path(), &settings), vec![PathBuf::from("root.mp3")]);
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"x").unwrap();
        fs::write(d1.join("one.mp3"), b"x").unwrap();
        fs::write(d2.join("two.mp3"), b"x").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let files = scan_dir(dir.path(), &settings);
        assert!(files.contains(&PathBuf::from("root.mp3")));
        assert!(files.contains(&Path::new("d1").join("one.mp3")));
        assert!(!files.iter().any(|f| f.ends_with("two.mp3")));
    }

    #[test]
    fn dot_directory_ref_expands_to_dot_slash_paths() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("song.flac"), b"x").unwrap();

        let base = Base::Dir(dir.path().to_path_buf());
        let out = expand_refs(vec![TrackRef::new(".")], &base, &LibrarySettings::default());
        assert_eq!(out, vec![TrackRef::new("./song.flac")]);
    }

    #[test]
    fn expanded_colon_names_resolve_to_their_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Intro: Live.mp3"), b"x").unwrap();
        fs::write(dir.path().join("Part2:Reprise.flac"), b"x").unwrap();

        let base = Base::Dir(dir.path().to_path_buf());
        let out = expand_refs(vec![TrackRef::new(".")], &base, &LibrarySettings::default());
        assert_eq!(
            out,
            vec![
                TrackRef::new("./Intro: Live.mp3"),
                TrackRef::new("./Part2:Reprise.flac"),
            ]
        );
        for r in &out {
            match base.resolve(r).unwrap() {
                Location::File(path) => assert!(path.is_file(), "{} did not resolve", r.as_str()),
                other => panic!("expected a file, got {other:?}"),
            }
        }
    }
}

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::time::Duration;

use super::error::AudioError;
use super::sink::open_media;
use super::thread::seek_target;
use super::types::PlaybackInfo;
use crate::config::FetchSettings;
use crate::library::{Location, agent};

#[test]
fn seek_target_clamps_at_start() {
    let t = seek_target(Duration::from_secs(3), -5, Some(Duration::from_secs(60)));
    assert_eq!(t, Duration::ZERO);
}

#[test]
fn seek_target_clamps_at_known_end() {
    let t = seek_target(Duration::from_secs(58), 5, Some(Duration::from_secs(60)));
    assert_eq!(t, Duration::from_secs(60));
}

#[test]
fn seek_target_unbounded_without_total() {
    let t = seek_target(Duration::from_millis(1500), 10, None);
    assert_eq!(t, Duration::from_millis(11_500));
}

#[test]
fn progress_is_fraction_of_total() {
    let info = PlaybackInfo {
        elapsed: Duration::from_secs(30),
        total: Some(Duration::from_secs(120)),
        ..PlaybackInfo::default()
    };
    assert!((info.progress() - 0.25).abs() < 1e-9);
    assert_eq!(PlaybackInfo::default().progress(), 0.0);
}

#[test]
fn open_media_reports_missing_file() {
    let http = agent(&FetchSettings::default());
    let loc = Location::File(PathBuf::from("/definitely/not/here.mp3"));
    let err = open_media(&loc, &http, 1024).err().unwrap();
    assert!(matches!(err, AudioError::Open { .. }));
}

#[test]
fn open_media_reads_local_file_seekably() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"0123456789").unwrap();

    let http = agent(&FetchSettings::default());
    let loc = Location::File(f.path().to_path_buf());
    let mut reader = open_media(&loc, &http, 1024).unwrap();

    reader.seek(SeekFrom::Start(4)).unwrap();
    let mut rest = String::new();
    reader.read_to_string(&mut rest).unwrap();
    assert_eq!(rest, "456789");
}

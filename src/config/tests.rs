use super::load::{default_config_path, resolve_config_path, state_dir};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_allegro_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", "/tmp/allegro-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/allegro-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("allegro")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("allegro")
            .join("config.toml")
    );
}

#[test]
fn state_dir_falls_back_to_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/allegro")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playlist]
tracks = ["audio/1 - Intro.mp3", "https://example.org/b.mp3"]
base = "https://example.org/player/"

[extract]
timeout_ms = 1500
max_cover_bytes = 1024

[fetch]
connect_timeout_ms = 100
read_timeout_ms = 200
total_timeout_ms = 900
max_bytes = 4096

[playback]
autoplay_on_skip = false

[audio]
quit_fade_out_ms = 0

[controls]
scrub_seconds = 9

[ui]
header_text = "hello"

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::remove("ALLEGRO__EXTRACT__TIMEOUT_MS");

    let s = Settings::load(Some(cfg_path)).unwrap();
    assert_eq!(s.playlist.tracks.len(), 2);
    assert_eq!(s.playlist.tracks[0], "audio/1 - Intro.mp3");
    assert_eq!(
        s.playlist.base.as_deref(),
        Some("https://example.org/player/")
    );
    assert_eq!(s.extract.timeout_ms, 1500);
    assert_eq!(s.extract.max_cover_bytes, 1024);
    assert_eq!(s.fetch.connect_timeout_ms, 100);
    assert_eq!(s.fetch.read_timeout_ms, 200);
    assert_eq!(s.fetch.total_timeout_ms, 900);
    assert_eq!(s.fetch.max_bytes, 4096);
    assert!(!s.playback.autoplay_on_skip);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[extract]
timeout_ms = 2500
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ALLEGRO__EXTRACT__TIMEOUT_MS", "40");

    let s = Settings::load(Some(cfg_path)).unwrap();
    assert_eq!(s.extract.timeout_ms, 40);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("ALLEGRO__EXTRACT__TIMEOUT_MS");

    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load(Some(dir.path().join("absent.toml"))).unwrap();
    assert_eq!(s.extract.timeout_ms, ExtractSettings::default().timeout_ms);
    assert!(s.playback.autoplay_on_skip);
    assert!(s.playlist.tracks.is_empty());
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_timeout_and_empty_extensions() {
    let mut s = Settings::default();
    s.extract.timeout_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.fetch.total_timeout_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![" . ".into(), String::new()];
    assert!(s.validate().is_err());
}

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config::Settings;
use crate::library::{
    Base, Cover, Extractor, LoftyReader, Playlist, Track, TrackRef, build_playlist, expand_refs,
    playlist_line,
};
use crate::prefs::Prefs;
use crate::{logging, ui};

mod event_loop;
mod settings;
mod startup;

/// Terminal audio player that orders its playlist by embedded tags.
#[derive(Debug, Parser)]
#[command(name = "allegro", version, about)]
pub struct Args {
    /// Audio files, directories or http(s) URLs. Defaults to
    /// `playlist.tracks` from the config, then the current directory.
    pub locators: Vec<String>,

    /// Directory or URL that relative locators are resolved against.
    #[arg(long)]
    pub base: Option<String>,

    /// Config file path.
    #[arg(long, env = "ALLEGRO_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Print the ordered playlist (row, source, cover) and exit.
    #[arg(long)]
    pub list: bool,
}

/// Tab-separated listing row; the cover column is a `data:` URL or `default`.
fn list_row(track: &Track) -> String {
    let cover = match &track.cover {
        Cover::Embedded(art) => art.data_url(),
        Cover::Default => "default".to_string(),
    };
    format!("{}\t{}\t{}", playlist_line(track), track.source, cover)
}

fn initial_refs(args: &Args, settings: &Settings) -> Vec<TrackRef> {
    let list = if !args.locators.is_empty() {
        args.locators.clone()
    } else if !settings.playlist.tracks.is_empty() {
        settings.playlist.tracks.clone()
    } else {
        vec![".".to_string()]
    };
    list.into_iter().map(TrackRef::from).collect()
}

fn resolve_base(args: &Args, settings: &Settings) -> Base {
    args.base
        .as_deref()
        .or(settings.playlist.base.as_deref())
        .map(Base::parse)
        .unwrap_or_else(Base::current_dir)
}

fn load_playlist(settings: &Settings, base: &Base, refs: Vec<TrackRef>) -> anyhow::Result<Playlist> {
    let refs = expand_refs(refs, base, &settings.library);
    let extractor = Extractor::new(
        LoftyReader::new(&settings.fetch),
        base.clone(),
        settings.extract.clone(),
    );

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .context("failed to start async runtime")?;
    let playlist = rt.block_on(build_playlist(&extractor, refs));
    // Reads abandoned by their timeout may still be parked on the blocking pool.
    rt.shutdown_background();
    Ok(playlist)
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_path = logging::init();
    let settings = settings::load_settings(args.config.clone());
    info!(log = ?log_path, "starting allegro");

    let prefs_path = Prefs::default_path();
    let prefs = Prefs::load_or_default(prefs_path.as_deref());
    let base = resolve_base(&args, &settings);
    let refs = initial_refs(&args, &settings);

    if args.list {
        let playlist = load_playlist(&settings, &base, refs)?;
        for track in playlist.tracks() {
            println!("{}", list_row(track));
        }
        return Ok(());
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let run_result: anyhow::Result<()> = (|| {
        terminal.draw(|f| ui::draw_loading(f, prefs.theme, &settings.ui))?;
        let playlist = load_playlist(&settings, &base, refs)?;

        let audio_player = AudioPlayer::new(&settings.fetch);
        let mut app = App::new(playlist);
        app.theme = prefs.theme;
        app.autoplay_on_skip = settings.playback.autoplay_on_skip;
        app.set_playback_handle(audio_player.playback_handle());

        startup::cue_first_track(&mut app, &audio_player, &base);

        let ctx = event_loop::Context {
            settings: &settings,
            base: &base,
            audio_player: &audio_player,
            prefs_path: prefs_path.as_deref(),
        };
        event_loop::run(&mut terminal, &ctx, &mut app)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_locators_win_over_config_tracks() {
        let args = Args::parse_from(["allegro", "a.mp3", "b.mp3"]);
        let mut settings = Settings::default();
        settings.playlist.tracks = vec!["config.mp3".into()];
        assert_eq!(
            initial_refs(&args, &settings),
            vec![TrackRef::new("a.mp3"), TrackRef::new("b.mp3")]
        );
    }

    #[test]
    fn config_tracks_then_current_directory() {
        let args = Args::parse_from(["allegro"]);
        let mut settings = Settings::default();
        assert_eq!(initial_refs(&args, &settings), vec![TrackRef::new(".")]);

        settings.playlist.tracks = vec!["audio/".into()];
        assert_eq!(initial_refs(&args, &settings), vec![TrackRef::new("audio/")]);
    }

    #[test]
    fn list_row_shows_line_source_and_cover() {
        let track = Track {
            title: "Intro".into(),
            album: "Gustanti".into(),
            artist: "Band".into(),
            track_number: Some(1),
            source: TrackRef::new("audio/1 - Intro.mp3"),
            cover: Cover::Default,
            original_index: 0,
        };
        assert_eq!(
            list_row(&track),
            "1. Intro - Gustanti\taudio/1 - Intro.mp3\tdefault"
        );
    }

    #[test]
    fn base_flag_overrides_config_base() {
        let args = Args::parse_from(["allegro", "--base", "https://host/music/"]);
        let mut settings = Settings::default();
        settings.playlist.base = Some("/srv/music".into());
        assert!(matches!(resolve_base(&args, &settings), Base::Url(_)));

        let args = Args::parse_from(["allegro"]);
        assert_eq!(
            resolve_base(&args, &settings),
            Base::Dir(PathBuf::from("/srv/music"))
        );
    }
}

//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::audio::PlaybackInfo;
use crate::config::{ControlsSettings, UiSettings};
use crate::library::playlist_line;
use crate::prefs::Theme;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "down/up");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("l/n", "next");
    map.insert("h/b", "previous");
    map.insert("s", "stop");
    // H/L is filled dynamically from config.
    map.insert("0-9", "seek to 0-90%");
    map.insert("t", "theme");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "enter", "space/p", "s", "l/n", "h/b", "H/L", "0-9", "t", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `M:SS`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn time_label(info: &PlaybackInfo) -> String {
    let total = info
        .total
        .map(format_time)
        .unwrap_or_else(|| "-:--".to_string());
    format!("{} / {}", format_time(info.elapsed), total)
}

struct Palette {
    base: Style,
    accent: Color,
    dim: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            base: Style::default().fg(Color::Gray).bg(Color::Black),
            accent: Color::Cyan,
            dim: Color::DarkGray,
        },
        Theme::Light => Palette {
            base: Style::default().fg(Color::Black).bg(Color::White),
            accent: Color::Blue,
            dim: Color::Gray,
        },
    }
}

fn bordered<'a>(title: &'a str, p: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.dim))
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn draw_header(frame: &mut Frame, area: Rect, ui: &UiSettings, p: &Palette) {
    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .style(p.base.fg(p.accent).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.dim)),
        );
    frame.render_widget(header, area);
}

/// Full-screen message used before the playlist exists or when it is empty.
fn draw_message(frame: &mut Frame, message: &str, theme: Theme, ui: &UiSettings) {
    let p = palette(theme);
    frame.render_widget(Block::default().style(p.base), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(frame.area());
    draw_header(frame, chunks[0], ui, &p);

    let body = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(p.base)
        .block(bordered("", &p));
    frame.render_widget(body, chunks[1]);
}

/// Frame shown while tags are being read.
pub fn draw_loading(frame: &mut Frame, theme: Theme, ui: &UiSettings) {
    draw_message(frame, "Loading playlist...", theme, ui);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    if !app.has_tracks() {
        draw_message(frame, "No tracks found", app.theme, ui_settings);
        return;
    }

    let p = palette(app.theme);
    frame.render_widget(Block::default().style(p.base), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], ui_settings, &p);

    let info = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|i| i.clone()))
        .unwrap_or_default();

    // Now playing
    {
        let track = info
            .index
            .and_then(|i| app.playlist().get(i))
            .or_else(|| app.current_track());
        let mut lines: Vec<Line> = Vec::new();
        if let Some(track) = track {
            lines.push(Line::styled(
                track.title.clone(),
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::from(format!("Album: {}", track.album)));
            lines.push(Line::from(format!("Artist: {}", track.artist)));
            lines.push(Line::styled(
                format!("Cover: {}", track.cover.summary()),
                Style::default().fg(p.dim),
            ));
        }
        if let Some(err) = &info.error {
            lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
        }

        let state = if info.playing {
            " now playing "
        } else if info.index.is_some() {
            " paused "
        } else {
            " stopped "
        };
        let now_playing = Paragraph::new(lines)
            .style(p.base)
            .block(bordered(state, &p))
            .wrap(Wrap { trim: true });
        frame.render_widget(now_playing, chunks[1]);
    }

    // Playlist
    {
        let items: Vec<ListItem> = app
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let line = playlist_line(t);
                if Some(i) == info.index {
                    ListItem::new(line).style(Style::default().fg(p.accent))
                } else {
                    ListItem::new(line)
                }
            })
            .collect();

        let list = List::new(items)
            .style(p.base)
            .block(bordered(" playlist ", &p))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(app.selected));
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    let gauge = Gauge::default()
        .block(bordered(" seek ", &p))
        .gauge_style(Style::default().fg(p.accent).bg(p.dim))
        .ratio(info.progress())
        .label(time_label(&info));
    frame.render_widget(gauge, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .style(p.base)
        .block(bordered(" controls ", &p))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

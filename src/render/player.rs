// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Render the music player interface.
//!
//! This module renders the visual representation of the current song, the
//! playback flags, the volume and the progress bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    model::UNKNOWN_ALBUM,
    player::PlayerState,
    render::icons::{
        ICON_LOADING, ICON_MUTED, ICON_PAUSE, ICON_PLAY, ICON_REPEAT, ICON_SHUFFLE, ICON_STOP,
        ICON_VOLUME_HIGH, ICON_VOLUME_LOW,
    },
    util::format::format_position,
};

/// Renders the player bar, returning the area of the progress gauge.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) -> Rect {
    let theme = &app.theme;
    let playback = app.controller.playback();

    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(chunks[0]);

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let icon = match playback.state {
        PlayerState::Playing => ICON_PLAY,
        PlayerState::Paused => ICON_PAUSE,
        PlayerState::Loading => ICON_LOADING,
        PlayerState::Stopped | PlayerState::Ended => ICON_STOP,
    };

    if let Some(song) = app.controller.now_playing() {
        let track_line = Line::from(vec![
            Span::styled(format!(" {} ", icon), bold).fg(Color::White),
            Span::styled(song.title.as_str(), bold).fg(theme.accent_colour),
            Span::raw(" from "),
            Span::styled(song.album_title().unwrap_or(UNKNOWN_ALBUM), bold)
                .fg(theme.accent_colour),
            Span::raw(" by "),
            Span::styled(song.artist_name(), bold).fg(theme.accent_colour),
        ]);
        f.render_widget(Paragraph::new(track_line), info_chunks[0]);

        let plays = Line::from(vec![
            Span::raw("   Played "),
            Span::styled(song.play_count.to_string(), bold).fg(theme.accent_colour),
            Span::raw(if song.play_count == 1 { " time" } else { " times" }),
        ]);
        f.render_widget(Paragraph::new(plays).fg(theme.table_time_fg), chunks[1]);

        let time_line = Line::from(vec![
            Span::styled(format_position(playback.position), bold).fg(theme.accent_colour),
            Span::styled(" / ", bold).fg(Color::White),
            Span::styled(format_position(playback.duration), bold).fg(theme.accent_colour),
        ]);
        f.render_widget(
            Paragraph::new(time_line).alignment(Alignment::Right),
            info_chunks[1],
        );
    } else {
        let idle = Line::from(vec![
            Span::styled(format!(" {} ", icon), bold).fg(Color::White),
            Span::raw("No song playing"),
        ]);
        f.render_widget(Paragraph::new(idle).fg(theme.table_time_fg), info_chunks[0]);
    }

    let control_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(chunks[2]);

    let flag = |on: bool, icon: &'static str, label: &'static str| {
        let colour = if on {
            theme.accent_colour
        } else {
            theme.border_colour
        };
        Span::styled(format!("{} {}  ", icon, label), Style::default().fg(colour))
    };
    let flags = Line::from(vec![
        Span::raw("   "),
        flag(playback.shuffle, ICON_SHUFFLE, "shuffle"),
        flag(playback.repeat, ICON_REPEAT, "repeat"),
    ]);
    f.render_widget(Paragraph::new(flags), control_chunks[0]);

    let volume_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(5),
        ])
        .split(control_chunks[1]);

    let volume_icon = match playback.volume {
        0 => ICON_MUTED,
        1..50 => ICON_VOLUME_LOW,
        _ => ICON_VOLUME_HIGH,
    };
    f.render_widget(Paragraph::new(volume_icon), volume_layout[0]);

    let volume_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.accent_colour)
                .bg(theme.gauge_track_colour),
        )
        .ratio(f64::from(playback.volume) / 100.0)
        .label("")
        .use_unicode(true);
    f.render_widget(volume_gauge, volume_layout[1]);

    let volume_label = Paragraph::new(format!(" {}%", playback.volume))
        .alignment(Alignment::Right)
        .fg(Color::White);
    f.render_widget(volume_label, volume_layout[2]);

    let position_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.accent_colour)
                .bg(theme.gauge_track_colour),
        )
        .ratio(playback.progress())
        .label("")
        .use_unicode(true);
    f.render_widget(position_gauge, chunks[4]);

    chunks[4]
}

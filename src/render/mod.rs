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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every event to provide a reactive user interface.

mod icons;
mod player;
mod status;

pub(crate) use icons::{ICON_PAUSE, ICON_PLAY};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{
    App, Focus,
    model::ViewTarget,
    render::{player::draw_player, status::draw_status},
    theme::Theme,
};

const SIDEBAR_WIDTH: u16 = 34;

pub(crate) trait Render {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme);
}

/// Renders the user interface to the terminal frame.
///
/// The screen is split into the sidebar and the song table, with the player
/// bar and the status line underneath. The area of the progress gauge is
/// recorded on the [`App`] so that mouse clicks can be mapped to seeks.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let theme = app.theme;

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(outer[0]);

    let controller = &app.controller;
    app.sidebar
        .as_widget(controller.playlists(), controller.library().len())
        .active(controller.view().target())
        .stats(controller.stats())
        .focused(app.focus == Focus::Sidebar)
        .draw(f, main[0], &theme);

    draw_songs(f, main[1], app);

    app.progress_area = Some(draw_player(f, outer[1], app));

    draw_status(f, outer[2], app);
}

fn draw_songs(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let controller = &app.controller;
    let view = controller.view();

    let title_style = if app.focus == Focus::Songs {
        Style::default().fg(app.theme.accent_colour)
    } else {
        Style::default().fg(app.theme.table_track_fg)
    };

    let title = match view.target() {
        ViewTarget::All => "All Songs".to_string(),
        ViewTarget::Search(query) => format!("Search \"{}\"", query),
        ViewTarget::Playlist(id) => controller.playlist_name(*id).unwrap_or("Playlist").to_string(),
    };

    let header = Line::from(vec![
        Span::styled(title, title_style),
        Span::styled(
            format!(" | {} songs | sorted by {}", view.len(), controller.sort().as_param()),
            Style::default().fg(app.theme.table_time_fg),
        ),
    ]);

    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    f.render_widget(Paragraph::new(header).block(header_block), chunks[0]);

    let now_playing = controller.now_playing().map(|song| song.id);
    app.song_table
        .as_widget(view.songs(), view.target())
        .loaded(view.is_loaded() || !view.is_empty())
        .now_playing(now_playing, controller.playback().state)
        .draw(f, chunks[1], &app.theme);
}

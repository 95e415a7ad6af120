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

//! UI rendering logic for the song table.
//!
//! This module handles the visual representation of song data, including
//! column layout, the now-playing marker, selection highlighting, and theme
//! application using the Ratatui widget system.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table, Wrap},
};

use crate::{
    components::SongTable,
    model::ViewTarget,
    player::PlayerState,
    render::{ICON_PAUSE, ICON_PLAY, Render},
    theme::Theme,
    util::format::format_time,
};

const EMPTY_LIBRARY: &str = "No songs in library. Upload some music to get started!";
const EMPTY_PLAYLIST: &str = "No songs in this playlist. Add some songs to get started!";
const EMPTY_SEARCH: &str = "No songs match your search.";

impl Render for SongTable<'_> {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        if self.songs.is_empty() {
            self.draw_placeholder(f, area, theme);
        } else {
            self.draw_table(f, area, theme);
        }
    }
}

impl SongTable<'_> {
    fn draw_placeholder(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let text = if !self.loaded {
            "Loading..."
        } else {
            match self.target {
                ViewTarget::All => EMPTY_LIBRARY,
                ViewTarget::Playlist(_) => EMPTY_PLAYLIST,
                ViewTarget::Search(_) => EMPTY_SEARCH,
            }
        };

        let placeholder = Paragraph::new(text)
            .style(Style::default().fg(theme.table_time_fg))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default());
        f.render_widget(placeholder, area);
    }

    fn draw_table(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let rows = self.songs.iter().enumerate().map(|(idx, song)| {
            let is_current = self.now_playing == Some(song.id);
            let marker = match (is_current, self.player_state) {
                (true, PlayerState::Playing | PlayerState::Loading) => ICON_PLAY,
                (true, PlayerState::Paused) => ICON_PAUSE,
                _ => "",
            };

            let mut title = vec![Span::styled(
                song.title.as_str(),
                Style::default().fg(theme.table_track_fg),
            )];
            if let Some(size) = song.file_size_display.as_deref() {
                title.push(Span::styled(
                    format!("  {}", size),
                    Style::default().fg(theme.table_time_fg),
                ));
            }

            let time = song.duration.map(format_time).unwrap_or_else(|| "-".into());

            let row = Row::new(vec![
                Cell::from(Line::from(marker).style(Style::default().fg(theme.accent_colour))),
                Cell::from(
                    Line::from(format!("{}", idx + 1))
                        .style(Style::default().fg(theme.table_track_number_fg))
                        .alignment(Alignment::Right),
                ),
                Cell::from(Line::from(title)),
                Cell::from(
                    Line::from(song.artist_name())
                        .style(Style::default().fg(theme.table_artist_fg)),
                ),
                Cell::from(
                    Line::from(song.album_title().unwrap_or("-"))
                        .style(Style::default().fg(theme.table_album_fg)),
                ),
                Cell::from(
                    Line::from(time)
                        .style(Style::default().fg(theme.table_time_fg))
                        .alignment(Alignment::Right),
                ),
                Cell::from(
                    Line::from(song.play_count.to_string())
                        .style(Style::default().fg(theme.table_time_fg))
                        .alignment(Alignment::Right),
                ),
            ]);

            if is_current {
                row.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                row
            }
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Percentage(40),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Length(6),
                Constraint::Length(6),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from(Line::from("#").alignment(Alignment::Right)),
                Cell::from("Title"),
                Cell::from("Artist"),
                Cell::from("Album"),
                Cell::from(Line::from("Time").alignment(Alignment::Right)),
                Cell::from(Line::from("Plays").alignment(Alignment::Right)),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .fg(theme.selection_fg),
        )
        .block(Block::default());

        f.render_stateful_widget(table, area, self.table_state);
    }
}

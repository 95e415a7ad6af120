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

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
};

use crate::{
    components::Sidebar,
    model::{LibraryStats, UNKNOWN_ARTIST, ViewTarget},
    render::Render,
    theme::Theme,
    util::format::format_storage,
};

const MOST_PLAYED_SHOWN: usize = 5;

impl Render for Sidebar<'_> {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(11)])
            .split(area);

        self.draw_list(f, chunks[0], theme);
        if let Some(stats) = self.stats {
            draw_stats(f, chunks[1], stats, theme);
        }
    }
}

impl Sidebar<'_> {
    fn draw_list(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let entry = |label: String, target: ViewTarget| {
            let style = if self.active == Some(&target) {
                Style::default()
                    .fg(theme.accent_colour)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.table_track_fg)
            };
            ListItem::new(Line::from(label).style(style))
        };

        let mut items = vec![entry(
            format!("All Songs ({})", self.library_count),
            ViewTarget::All,
        )];
        items.extend(self.playlists.iter().map(|p| {
            entry(
                format!("{} ({})", p.name, p.song_count),
                ViewTarget::Playlist(p.id),
            )
        }));

        let title_style = if self.focused {
            Style::default().fg(theme.accent_colour)
        } else {
            Style::default().fg(theme.border_colour)
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(Line::styled(" Library ", title_style))
                    .borders(Borders::RIGHT)
                    .border_style(Style::default().fg(theme.border_colour))
                    .padding(Padding::horizontal(1)),
            )
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg)
                    .fg(theme.selection_fg),
            );

        f.render_stateful_widget(list, area, self.list_state);
    }
}

fn draw_stats(f: &mut Frame, area: Rect, stats: &LibraryStats, theme: &Theme) {
    let label = Style::default().fg(theme.table_time_fg);
    let value = Style::default().fg(theme.accent_colour);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Songs     ", label),
            Span::styled(stats.total_songs.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Playlists ", label),
            Span::styled(stats.total_playlists.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Storage   ", label),
            Span::styled(format_storage(stats.total_storage), value),
        ]),
    ];

    if !stats.most_played.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Most played", label)));
        for entry in stats.most_played.iter().take(MOST_PLAYED_SHOWN) {
            let artist = entry.1.as_deref().unwrap_or(UNKNOWN_ARTIST);
            lines.push(Line::from(vec![
                Span::styled(entry.0.as_str(), Style::default().fg(theme.table_track_fg)),
                Span::styled(format!(" - {} ", artist), label),
                Span::styled(format!("({})", entry.2), value),
            ]));
        }
    }

    let block = Block::default()
        .borders(Borders::TOP | Borders::RIGHT)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

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

//! Render the status line.
//!
//! The line shows, by priority, the command line being typed, a confirmation
//! prompt, or the current notification. Upload progress sits on the right.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

const HINT: &str = "Press : for commands, / to search, Tab to switch pane, q to quit";

pub(crate) fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let commander = &app.commander;

    let container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(20)])
        .horizontal_margin(1)
        .split(area);

    let base = Style::default().bg(theme.gauge_track_colour);

    let line = if commander.active() {
        Line::from(vec![
            Span::styled(":", base.fg(theme.accent_colour)),
            Span::styled(commander.input.value(), base.fg(theme.commander_colour)),
        ])
    } else if let Some(pending) = app.controller.pending() {
        Line::from(vec![
            Span::styled(
                pending.prompt(),
                base.fg(theme.warning_colour).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" [y/n]", base.fg(theme.commander_colour)),
        ])
    } else if let Some(notification) = app.controller.notification() {
        Line::from(Span::styled(
            notification.message.as_str(),
            base.fg(theme.notification_colour(notification.level)),
        ))
    } else {
        Line::from(Span::styled(HINT, base.fg(theme.table_time_fg)))
    };

    f.render_widget(Paragraph::new(line).style(base), container[0]);

    if let Some((completed, total)) = app.controller.upload_progress() {
        f.render_widget(
            Paragraph::new(format!("Uploading {}/{}", completed, total))
                .style(base.fg(theme.accent_colour))
                .alignment(Alignment::Right),
            container[1],
        );
    }

    if commander.active() {
        // Past the ':' prompt.
        let cursor_x = container[0].x + 1 + commander.input.visual_cursor() as u16;
        let cursor_y = container[0].y;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

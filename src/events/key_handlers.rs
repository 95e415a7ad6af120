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

//! Maps keyboard and mouse input to application actions.
//!
//! Input is offered, in order, to the command line, to a pending
//! confirmation, to the focused component and finally to the global key map.

use anyhow::Result;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::{App, Focus, actions::Action, events::AppEvent};

use super::handlers::handle_action;

const VOLUME_DELTA: i16 = 5;

/// Routes one key press.
///
/// # Errors
///
/// Returns an error only if the task worker has gone away.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = Event::Key(key);
    if app.commander.handle_event(&event, &app.event_tx) {
        return Ok(());
    }

    // Nothing else is accepted until the prompt is answered.
    if app.controller.pending().is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => handle_action(app, Action::Confirm)?,
            KeyCode::Char('n') | KeyCode::Esc => handle_action(app, Action::Cancel)?,
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') => {
            app.event_tx.send(AppEvent::ExitApplication)?;
            return Ok(());
        }
        KeyCode::Char('/') => {
            app.commander.open_with("find ");
            return Ok(());
        }
        KeyCode::Char('a') => {
            app.commander.open_with("add ");
            return Ok(());
        }
        KeyCode::Tab => {
            app.focus = app.focus.toggle();
            return Ok(());
        }
        _ => {}
    }

    let action = match app.focus {
        Focus::Songs => {
            let view = app.controller.view();
            app.song_table
                .as_widget(view.songs(), view.target())
                .process_event(&event)
        }
        Focus::Sidebar => app
            .sidebar
            .as_widget(app.controller.playlists(), app.controller.library().len())
            .process_event(&event),
    };

    if let Some(action) = action.or_else(|| global_action(key)) {
        handle_action(app, action)?;
    }

    Ok(())
}

/// Clicks on the progress gauge seek; the wheel scrolls the song table.
pub(super) fn process_mouse_event(app: &mut App, mouse: MouseEvent) -> Result<()> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let fraction = app
                .progress_area
                .and_then(|area| seek_fraction(area, mouse.column, mouse.row));
            if let Some(fraction) = fraction {
                handle_action(app, Action::Seek(fraction))?;
            }
        }
        MouseEventKind::ScrollDown => scroll_songs(app, KeyCode::Down),
        MouseEventKind::ScrollUp => scroll_songs(app, KeyCode::Up),
        _ => {}
    }

    Ok(())
}

fn scroll_songs(app: &mut App, code: KeyCode) {
    let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
    let view = app.controller.view();
    app.song_table
        .as_widget(view.songs(), view.target())
        .process_event(&event);
}

/// Keys that work whichever component has focus.
fn global_action(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char(' ') => Action::TogglePlayPause,
        KeyCode::Char('n') => Action::Next,
        KeyCode::Char('p') => Action::Previous,
        KeyCode::Char('s') => Action::ToggleShuffle,
        KeyCode::Char('r') => Action::ToggleRepeat,
        KeyCode::Char('R') => Action::Refresh,
        KeyCode::Char('o') => Action::CycleSort,
        KeyCode::Char('-') => Action::AdjustVolume(-VOLUME_DELTA),
        KeyCode::Char('=') | KeyCode::Char('+') => Action::AdjustVolume(VOLUME_DELTA),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let tenths = c.to_digit(10)?;
            Action::Seek(f64::from(tenths) / 10.0)
        }
        _ => return None,
    };
    Some(action)
}

/// Where a click at `(column, row)` lands along the gauge, `0.0..1.0`.
fn seek_fraction(area: Rect, column: u16, row: u16) -> Option<f64> {
    if area.width == 0 || !area.contains(Position::new(column, row)) {
        return None;
    }
    Some(f64::from(column - area.x) / f64::from(area.width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_seek_in_tenths() {
        assert_eq!(global_action(key(KeyCode::Char('0'))), Some(Action::Seek(0.0)));
        assert_eq!(global_action(key(KeyCode::Char('5'))), Some(Action::Seek(0.5)));
        assert_eq!(global_action(key(KeyCode::Char('9'))), Some(Action::Seek(0.9)));
    }

    #[test]
    fn volume_keys_step_by_five() {
        assert_eq!(
            global_action(key(KeyCode::Char('-'))),
            Some(Action::AdjustVolume(-5))
        );
        assert_eq!(
            global_action(key(KeyCode::Char('+'))),
            Some(Action::AdjustVolume(5))
        );
        assert_eq!(global_action(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn clicks_outside_gauge_are_ignored() {
        let gauge = Rect::new(10, 20, 50, 1);

        assert_eq!(seek_fraction(gauge, 10, 20), Some(0.0));
        assert_eq!(seek_fraction(gauge, 35, 20), Some(0.5));
        assert_eq!(seek_fraction(gauge, 9, 20), None);
        assert_eq!(seek_fraction(gauge, 60, 20), None);
        assert_eq!(seek_fraction(gauge, 30, 21), None);
    }
}

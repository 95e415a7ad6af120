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

//! Navigation sidebar: "All Songs", the playlists, and library statistics.
//!
//! Row 0 is always "All Songs"; row `n` is playlist `n - 1`.

mod render;

use crossterm::event::{Event, KeyCode};
use ratatui::widgets::ListState;

use crate::{
    actions::Action,
    model::{LibraryStats, Playlist, ViewTarget},
};

pub(crate) struct SidebarState {
    pub(crate) list_state: ListState,
}

impl SidebarState {
    pub(crate) fn new() -> Self {
        Self {
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    pub(crate) fn as_widget<'a>(
        &'a mut self,
        playlists: &'a [Playlist],
        library_count: usize,
    ) -> Sidebar<'a> {
        Sidebar {
            playlists,
            library_count,
            active: None,
            stats: None,
            focused: false,
            list_state: &mut self.list_state,
        }
    }
}

pub(crate) struct Sidebar<'a> {
    playlists: &'a [Playlist],
    library_count: usize,
    active: Option<&'a ViewTarget>,
    stats: Option<&'a LibraryStats>,
    focused: bool,
    list_state: &'a mut ListState,
}

impl<'a> Sidebar<'a> {
    pub(crate) fn active(mut self, target: &'a ViewTarget) -> Self {
        self.active = Some(target);
        self
    }

    pub(crate) fn stats(mut self, stats: &'a LibraryStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub(crate) fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn len(&self) -> usize {
        self.playlists.len() + 1
    }

    fn target_at(&self, index: usize) -> Option<ViewTarget> {
        match index {
            0 => Some(ViewTarget::All),
            n => self.playlists.get(n - 1).map(|p| ViewTarget::Playlist(p.id)),
        }
    }

    fn goto_next(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let i = match self.list_state.selected() {
            Some(0) | None => self.len() - 1,
            Some(i) => (i - 1).min(self.len() - 1),
        };
        self.list_state.select(Some(i));
    }

    pub(crate) fn process_event(&mut self, event: &Event) -> Option<Action> {
        let Event::Key(key_event) = event else {
            return None;
        };

        match key_event.code {
            KeyCode::Char('j') | KeyCode::Down => self.goto_next(),
            KeyCode::Char('k') | KeyCode::Up => self.goto_previous(),
            _ => {}
        }

        let selected = self.list_state.selected().unwrap_or(0).min(self.len() - 1);
        let target = self.target_at(selected)?;

        match (key_event.code, target) {
            (KeyCode::Enter, target) => Some(Action::SwitchView(target)),
            (KeyCode::Char('d') | KeyCode::Delete, ViewTarget::Playlist(id)) => {
                Some(Action::DeletePlaylist(id))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;
    use crate::model::PlaylistId;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn playlists() -> Vec<Playlist> {
        vec![
            Playlist {
                id: PlaylistId(10),
                name: "Road Trip".into(),
                description: None,
                song_count: 3,
            },
            Playlist {
                id: PlaylistId(11),
                name: "Focus".into(),
                description: None,
                song_count: 0,
            },
        ]
    }

    #[test]
    fn enter_switches_to_selected_entry() {
        let playlists = playlists();
        let mut state = SidebarState::new();
        let mut sidebar = state.as_widget(&playlists, 5);

        assert_eq!(
            sidebar.process_event(&key(KeyCode::Enter)),
            Some(Action::SwitchView(ViewTarget::All))
        );

        sidebar.process_event(&key(KeyCode::Char('k')));
        assert_eq!(
            sidebar.process_event(&key(KeyCode::Enter)),
            Some(Action::SwitchView(ViewTarget::Playlist(PlaylistId(11))))
        );
    }

    #[test]
    fn all_songs_cannot_be_deleted() {
        let playlists = playlists();
        let mut state = SidebarState::new();
        let mut sidebar = state.as_widget(&playlists, 5);

        assert_eq!(sidebar.process_event(&key(KeyCode::Char('d'))), None);

        sidebar.process_event(&key(KeyCode::Char('j')));
        assert_eq!(
            sidebar.process_event(&key(KeyCode::Char('d'))),
            Some(Action::DeletePlaylist(PlaylistId(10)))
        );
    }

    #[test]
    fn selection_survives_shrinking_playlists() {
        let playlists = playlists();
        let mut state = SidebarState::new();
        state.list_state.select(Some(2));

        let mut sidebar = state.as_widget(&playlists[..1], 5);
        assert_eq!(
            sidebar.process_event(&key(KeyCode::Enter)),
            Some(Action::SwitchView(ViewTarget::Playlist(PlaylistId(10))))
        );
    }
}

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

//! Interactive song table widget and state management.
//!
//! This module provides the table listing the songs of the active view. It
//! separates persistent state (`SongTableState`) from the transient widget
//! view (`SongTable`), which borrows the songs from the library controller
//! for the duration of one draw or one key press.

mod event;
mod render;

use ratatui::widgets::TableState;

use crate::{
    model::{Song, SongId, ViewTarget},
    player::PlayerState,
};

pub(crate) struct SongTableState {
    pub(crate) table_state: TableState,
}

impl SongTableState {
    pub(crate) fn new() -> Self {
        Self {
            table_state: TableState::new(),
        }
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Returns to the top of the table, for a freshly switched view.
    pub(crate) fn reset_selection(&mut self) {
        self.table_state.select(None);
        *self.table_state.offset_mut() = 0;
    }

    /// Keeps the selection inside a list of `len` songs, selecting the first
    /// song when there was no selection.
    pub(crate) fn sync(&mut self, len: usize) {
        let selected = match (len, self.table_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
        self.table_state.select(selected);
    }

    pub(crate) fn as_widget<'a>(
        &'a mut self,
        songs: &'a [Song],
        target: &'a ViewTarget,
    ) -> SongTable<'a> {
        SongTable {
            songs,
            target,
            loaded: true,
            now_playing: None,
            player_state: PlayerState::Stopped,
            table_state: &mut self.table_state,
        }
    }
}

pub(crate) struct SongTable<'a> {
    songs: &'a [Song],
    target: &'a ViewTarget,
    loaded: bool,
    now_playing: Option<SongId>,
    player_state: PlayerState,
    table_state: &'a mut TableState,
}

impl<'a> SongTable<'a> {
    pub(crate) fn loaded(mut self, loaded: bool) -> Self {
        self.loaded = loaded;
        self
    }

    /// Marks the row of the song the transport is working on.
    pub(crate) fn now_playing(mut self, id: Option<SongId>, state: PlayerState) -> Self {
        self.now_playing = id;
        self.player_state = state;
        self
    }

    fn selected_song(&self) -> Option<(usize, &'a Song)> {
        let index = self.table_state.selected()?;
        self.songs.get(index).map(|song| (index, song))
    }

    fn goto_next(&mut self) {
        let len = self.songs.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let len = self.songs.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => (i - 1).min(len - 1),
        };
        self.table_state.select(Some(i));
    }

    fn goto_first(&mut self) {
        if !self.songs.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn goto_last(&mut self) {
        if !self.songs.is_empty() {
            self.table_state.select(Some(self.songs.len() - 1));
        }
    }
}

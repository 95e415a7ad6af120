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

//! The active view: the ordered songs on screen, which are also the songs
//! next and previous move through.

use crate::model::{Song, SongId, ViewTarget};

#[derive(Debug, Clone)]
pub(crate) struct ActiveView {
    target: ViewTarget,
    songs: Vec<Song>,
    /// Bumped on every switch; responses carry the value they were requested
    /// under and are dropped if it has moved on since.
    generation: u64,
    loaded: bool,
}

impl ActiveView {
    pub(crate) fn new() -> Self {
        Self {
            target: ViewTarget::All,
            songs: Vec::new(),
            generation: 0,
            loaded: false,
        }
    }

    pub(crate) fn target(&self) -> &ViewTarget {
        &self.target
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.songs.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// False from a switch until the new songs arrive.
    pub(crate) fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn position_of(&self, id: SongId) -> Option<usize> {
        self.songs.iter().position(|s| s.id == id)
    }

    /// Starts a switch to `target`, returning the generation to request it
    /// under. The previous songs stay in place until the new ones arrive.
    pub(crate) fn begin_switch(&mut self, target: ViewTarget) -> u64 {
        self.generation += 1;
        self.target = target;
        self.loaded = false;
        self.generation
    }

    /// Installs `songs` if they were requested under the current generation.
    pub(crate) fn accept(&mut self, generation: u64, songs: Vec<Song>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.songs = songs;
        self.loaded = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::PlaylistId, tasks::tests::song};

    #[test]
    fn stale_generation_is_rejected() {
        let mut view = ActiveView::new();
        let first = view.begin_switch(ViewTarget::Playlist(PlaylistId(1)));
        let second = view.begin_switch(ViewTarget::All);

        assert!(!view.accept(first, vec![song(1, "Old")]));
        assert!(view.is_empty());
        assert!(!view.is_loaded());

        assert!(view.accept(second, vec![song(2, "New")]));
        assert_eq!(view.target(), &ViewTarget::All);
        assert_eq!(view.position_of(SongId(2)), Some(0));
        assert!(view.is_loaded());
    }

    #[test]
    fn refresh_under_same_generation_is_accepted() {
        let mut view = ActiveView::new();
        let generation = view.generation();

        assert!(view.accept(generation, vec![song(1, "A")]));
        assert!(view.accept(generation, vec![song(1, "A"), song(2, "B")]));
        assert_eq!(view.len(), 2);
    }
}

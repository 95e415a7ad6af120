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

//! User intents.
//!
//! Key bindings, mouse clicks and the command line all translate their input
//! into an [`Action`]; the library controller is the only thing that knows
//! what an action does.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{PlaylistId, SongId, SortField, ViewTarget};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    Play(usize),
    TogglePlayPause,
    Next,
    Previous,

    ToggleShuffle,
    ToggleRepeat,

    /// Seek to a fraction `0.0..=1.0` of the current song.
    Seek(f64),
    SetVolume(u8),
    AdjustVolume(i16),

    SwitchView(ViewTarget),
    Search(String),
    Refresh,
    CycleSort,
    SetSort(SortField),

    Upload {
        files: Vec<PathBuf>,
        playlist: Option<PlaylistId>,
    },
    CreatePlaylist {
        name: String,
        description: String,
    },
    AddSongToPlaylist {
        playlist: Option<PlaylistId>,
        song: SongId,
    },
    RemoveSongFromPlaylist {
        playlist: PlaylistId,
        song: SongId,
    },
    DeleteSong(SongId),
    DeletePlaylist(PlaylistId),

    Confirm,
    Cancel,
}

/// Reasons an action could not be carried out.
///
/// The display text of every variant is written for the user; it is what ends
/// up in the notification area.
#[derive(Error, Debug, PartialEq)]
pub(crate) enum ControllerError {
    #[error("Please enter a playlist name")]
    EmptyPlaylistName,

    #[error("Please select at least one file")]
    NoFilesSelected,

    #[error("Please select a playlist")]
    NoPlaylistSelected,

    #[error("No song at position {index}, the list has {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No songs to play")]
    EmptyView,

    #[error("Failed to play song: {0}")]
    Transport(String),

    /// The task worker has gone away; nothing further can reach the service.
    #[error("Task worker is no longer running")]
    WorkerStopped,
}

impl ControllerError {
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(self, ControllerError::WorkerStopped)
    }
}

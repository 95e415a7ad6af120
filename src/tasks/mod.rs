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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to offload requests to the
//! library service from the main UI thread. It provides a dedicated worker
//! loop that translates [`AppTask`] requests into service calls and
//! broadcasts the results back to the application via [`AppEvent`]s.
//!
//! There is exactly one worker and it handles tasks strictly in the order they
//! were sent, so at most one request is ever in flight and the files of an
//! upload batch go up one after another.
//!
//! Only actions that may block, or may take more than a trivial amount of time
//! to process, should be implemented as tasks. Other actions are likely more
//! suited to by events.

mod handlers;
mod upload;

use handlers::*;
pub(crate) use upload::UploadSummary;

use std::{
    path::PathBuf,
    sync::mpsc::{Receiver, Sender},
    thread,
};

use anyhow::Result;
use tracing::{debug, error};

use crate::{
    events::AppEvent,
    model::{PlaylistId, SongId, SortField, ViewTarget},
    service::{LibraryService, ServiceError},
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AppTask {
    /// Reload statistics, playlists, the full song list and the active view.
    Refresh {
        target: ViewTarget,
        generation: u64,
        sort: SortField,
    },
    LoadView {
        target: ViewTarget,
        generation: u64,
        sort: SortField,
    },

    IncrementPlayCount(SongId),

    CreatePlaylist {
        name: String,
        description: String,
    },
    AddSongToPlaylist(PlaylistId, SongId),
    RemoveSongFromPlaylist(PlaylistId, SongId),
    DeleteSong(SongId),
    DeletePlaylist(PlaylistId),

    Upload {
        files: Vec<PathBuf>,
        playlist: Option<PlaylistId>,
    },
}

/// The service request a failure event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    LoadStats,
    LoadPlaylists,
    LoadSongs,
    LoadView,
    CreatePlaylist,
    AddToPlaylist,
    RemoveFromPlaylist,
    DeleteSong,
    DeletePlaylist,
}

impl Operation {
    /// Shown when the service gave no message of its own.
    pub(crate) fn fallback_message(self) -> &'static str {
        match self {
            Operation::LoadStats => "Failed to load library statistics",
            Operation::LoadPlaylists => "Failed to load playlists",
            Operation::LoadSongs | Operation::LoadView => "Failed to load songs",
            Operation::CreatePlaylist => "Failed to create playlist",
            Operation::AddToPlaylist => "Failed to add song to playlist",
            Operation::RemoveFromPlaylist => "Failed to remove song from playlist",
            Operation::DeleteSong => "Failed to delete song",
            Operation::DeletePlaylist => "Failed to delete playlist",
        }
    }

    /// Background loads whose failure is only logged.
    pub(crate) fn is_quiet(self) -> bool {
        matches!(self, Operation::LoadStats)
    }

    /// The user-facing message for a failed request.
    pub(crate) fn failure_message(self, err: &ServiceError) -> String {
        match err {
            ServiceError::Service { message, .. } if !message.is_empty() => message.clone(),
            _ => self.fallback_message().to_string(),
        }
    }
}

/// Spawns a background thread to process application tasks.
///
/// The worker owns the library service client and enters a blocking loop,
/// listening for incoming [`AppTask`]s until the sending side is dropped.
///
/// # Arguments
///
/// * `service` - The library service client.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    service: Box<dyn LibraryService>,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            debug!(?task, "Task");

            let mut ctx = TaskContext {
                service: service.as_ref(),
                event_tx: &event_tx,
            };

            if let Err(e) = handle_task(task, &mut ctx) {
                error!(error = %e, "Task failed");
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
        }

        debug!("Task worker finished");
    });
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
struct TaskContext<'a> {
    service: &'a dyn LibraryService,
    event_tx: &'a Sender<AppEvent>,
}

/// Orchestrates the execution of a single task.
///
/// Service failures are reported as events by the handlers themselves; an
/// error returned from here means the event channel has closed.
fn handle_task(task: AppTask, ctx: &mut TaskContext) -> Result<()> {
    match task {
        AppTask::Refresh {
            target,
            generation,
            sort,
        } => refresh(ctx, target, generation, sort),
        AppTask::LoadView {
            target,
            generation,
            sort,
        } => load_view(ctx, target, generation, sort),

        AppTask::IncrementPlayCount(id) => increment_play_count(ctx, id),

        AppTask::CreatePlaylist { name, description } => {
            create_playlist(ctx, name, description)
        }
        AppTask::AddSongToPlaylist(playlist_id, song_id) => {
            add_song_to_playlist(ctx, playlist_id, song_id)
        }
        AppTask::RemoveSongFromPlaylist(playlist_id, song_id) => {
            remove_song_from_playlist(ctx, playlist_id, song_id)
        }
        AppTask::DeleteSong(id) => delete_song(ctx, id),
        AppTask::DeletePlaylist(id) => delete_playlist(ctx, id),

        AppTask::Upload { files, playlist } => upload_files(ctx, files, playlist),
    }
}

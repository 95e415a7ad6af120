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

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::{
    events::{AppEvent, LibraryEvent},
    model::{PlaylistId, SongId, SortField, SortOrder, ViewTarget},
    service::ServiceError,
    tasks::{Operation, TaskContext, upload},
};

fn send(ctx: &TaskContext, event: LibraryEvent) -> Result<()> {
    ctx.event_tx.send(AppEvent::Library(event))?;

    Ok(())
}

fn send_failure(ctx: &TaskContext, operation: Operation, err: ServiceError) -> Result<()> {
    warn!(?operation, error = %err, "Library service request failed");
    send(
        ctx,
        LibraryEvent::Failed {
            operation,
            message: operation.failure_message(&err),
        },
    )
}

/// Each part of a refresh stands on its own; one failing does not stop the
/// others.
pub(super) fn refresh(
    ctx: &mut TaskContext,
    target: ViewTarget,
    generation: u64,
    sort: SortField,
) -> Result<()> {
    match ctx.service.library_stats() {
        Ok(stats) => send(ctx, LibraryEvent::StatsLoaded(stats))?,
        Err(e) => send_failure(ctx, Operation::LoadStats, e)?,
    }

    match ctx.service.list_playlists() {
        Ok(playlists) => send(ctx, LibraryEvent::PlaylistsLoaded(playlists))?,
        Err(e) => send_failure(ctx, Operation::LoadPlaylists, e)?,
    }

    // The full song list doubles as the All Songs view.
    match ctx.service.list_songs(sort, SortOrder::Ascending) {
        Ok(songs) if target == ViewTarget::All => {
            send(ctx, LibraryEvent::SongsLoaded(songs.clone()))?;
            send(
                ctx,
                LibraryEvent::ViewLoaded {
                    target,
                    generation,
                    songs,
                },
            )
        }
        Ok(songs) => {
            send(ctx, LibraryEvent::SongsLoaded(songs))?;
            load_view(ctx, target, generation, sort)
        }
        Err(e) => {
            send_failure(ctx, Operation::LoadSongs, e)?;
            if target == ViewTarget::All {
                return Ok(());
            }
            load_view(ctx, target, generation, sort)
        }
    }
}

pub(super) fn load_view(
    ctx: &mut TaskContext,
    target: ViewTarget,
    generation: u64,
    sort: SortField,
) -> Result<()> {
    let songs = match &target {
        ViewTarget::All => ctx.service.list_songs(sort, SortOrder::Ascending),
        ViewTarget::Search(query) => ctx.service.search_songs(query),
        ViewTarget::Playlist(id) => ctx.service.get_playlist(*id).map(|detail| detail.songs),
    };

    match songs {
        Ok(songs) => send(
            ctx,
            LibraryEvent::ViewLoaded {
                target,
                generation,
                songs,
            },
        ),
        Err(e) => send_failure(ctx, Operation::LoadView, e),
    }
}

/// Fire-and-forget; a failure is logged only.
pub(super) fn increment_play_count(ctx: &mut TaskContext, id: SongId) -> Result<()> {
    if let Err(e) = ctx.service.increment_play_count(id) {
        warn!(song_id = %id, error = %e, "Failed to update play count");
    }

    Ok(())
}

pub(super) fn create_playlist(
    ctx: &mut TaskContext,
    name: String,
    description: String,
) -> Result<()> {
    match ctx.service.create_playlist(&name, &description) {
        Ok(id) => {
            info!(playlist_id = %id, %name, "Playlist created");
            send(ctx, LibraryEvent::PlaylistCreated { id, name })
        }
        Err(e) => send_failure(ctx, Operation::CreatePlaylist, e),
    }
}

pub(super) fn add_song_to_playlist(
    ctx: &mut TaskContext,
    playlist_id: PlaylistId,
    song_id: SongId,
) -> Result<()> {
    match ctx.service.add_song_to_playlist(playlist_id, song_id) {
        Ok(()) => {
            info!(%playlist_id, %song_id, "Song added to playlist");
            send(
                ctx,
                LibraryEvent::SongAddedToPlaylist {
                    playlist_id,
                    song_id,
                },
            )
        }
        Err(e) => send_failure(ctx, Operation::AddToPlaylist, e),
    }
}

pub(super) fn remove_song_from_playlist(
    ctx: &mut TaskContext,
    playlist_id: PlaylistId,
    song_id: SongId,
) -> Result<()> {
    match ctx.service.remove_song_from_playlist(playlist_id, song_id) {
        Ok(()) => {
            info!(%playlist_id, %song_id, "Song removed from playlist");
            send(
                ctx,
                LibraryEvent::SongRemovedFromPlaylist {
                    playlist_id,
                    song_id,
                },
            )
        }
        Err(e) => send_failure(ctx, Operation::RemoveFromPlaylist, e),
    }
}

pub(super) fn delete_song(ctx: &mut TaskContext, id: SongId) -> Result<()> {
    match ctx.service.delete_song(id) {
        Ok(()) => {
            info!(song_id = %id, "Song deleted");
            send(ctx, LibraryEvent::SongDeleted(id))
        }
        Err(e) => send_failure(ctx, Operation::DeleteSong, e),
    }
}

pub(super) fn delete_playlist(ctx: &mut TaskContext, id: PlaylistId) -> Result<()> {
    match ctx.service.delete_playlist(id) {
        Ok(()) => {
            info!(playlist_id = %id, "Playlist deleted");
            send(ctx, LibraryEvent::PlaylistDeleted(id))
        }
        Err(e) => send_failure(ctx, Operation::DeletePlaylist, e),
    }
}

pub(super) fn upload_files(
    ctx: &mut TaskContext,
    paths: Vec<PathBuf>,
    playlist: Option<PlaylistId>,
) -> Result<()> {
    let files = upload::collect_upload_files(&paths);
    send(
        ctx,
        LibraryEvent::UploadProgress {
            completed: 0,
            total: files.len(),
        },
    )?;

    let event_tx = ctx.event_tx;
    let summary = upload::upload_batch(ctx.service, &files, playlist, |completed, total| {
        let _ = event_tx.send(AppEvent::Library(LibraryEvent::UploadProgress {
            completed,
            total,
        }));
    });

    info!(
        uploaded = summary.uploaded,
        total = summary.total,
        failed = summary.errors.len(),
        "Upload batch finished"
    );
    send(ctx, LibraryEvent::UploadFinished(summary))
}

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

//! Applies non-input events to the application state.

use anyhow::Result;
use tracing::warn;

use crate::{
    App,
    actions::Action,
    commander::Command,
    controller::Level,
    events::{AppEvent, LibraryEvent},
    model::{PlaylistId, SongId, ViewTarget},
};

pub(super) fn handle_action(app: &mut App, action: Action) -> Result<()> {
    let switching = app.controller.pending().is_none()
        && matches!(action, Action::SwitchView(_) | Action::Search(_));

    app.controller.dispatch(action)?;

    if switching {
        app.song_table.reset_selection();
    }
    sync_selection(app);

    Ok(())
}

/// Turns a parsed command line into the action it stands for, resolving
/// playlist names against the loaded playlists.
pub(super) fn handle_command(app: &mut App, command: Command) -> Result<()> {
    let action = match command {
        Command::Quit => {
            app.event_tx.send(AppEvent::ExitApplication)?;
            return Ok(());
        }
        Command::Find(query) => Action::Search(query),
        Command::All => Action::SwitchView(ViewTarget::All),
        Command::OpenPlaylist(name) => match resolve_playlist(app, &name) {
            Some(id) => Action::SwitchView(ViewTarget::Playlist(id)),
            None => return Ok(()),
        },
        Command::New { name, description } => Action::CreatePlaylist { name, description },
        Command::Add(name) => {
            let Some(song) = selected_song(app) else {
                app.controller.notify(Level::Error, "No song selected");
                return Ok(());
            };
            Action::AddSongToPlaylist {
                playlist: app.controller.find_playlist(&name),
                song,
            }
        }
        Command::Upload(files) => Action::Upload {
            files,
            playlist: None,
        },
        Command::UploadTo { playlist, files } => match resolve_playlist(app, &playlist) {
            Some(id) => Action::Upload {
                files,
                playlist: Some(id),
            },
            None => return Ok(()),
        },
        Command::Sort(Some(field)) => Action::SetSort(field),
        Command::Sort(None) => Action::CycleSort,
        Command::Volume(level) => Action::SetVolume(level),
        Command::Refresh => Action::Refresh,
        Command::DeletePlaylist(name) => match resolve_playlist(app, &name) {
            Some(id) => Action::DeletePlaylist(id),
            None => return Ok(()),
        },
    };

    handle_action(app, action)
}

pub(super) fn handle_library_event(app: &mut App, event: LibraryEvent) -> Result<()> {
    app.controller.on_library_event(event)?;
    sync_selection(app);

    Ok(())
}

pub(super) fn handle_track_finished(app: &mut App) -> Result<()> {
    app.controller.on_track_finished()?;
    sync_selection(app);

    Ok(())
}

pub(super) fn handle_error(app: &mut App, message: String) {
    warn!(%message, "Error reported");
    app.controller.notify(Level::Error, message);
}

fn sync_selection(app: &mut App) {
    app.song_table.sync(app.controller.view().len());
}

fn selected_song(app: &App) -> Option<SongId> {
    let index = app.song_table.selected()?;
    app.controller.view().get(index).map(|song| song.id)
}

fn resolve_playlist(app: &mut App, name: &str) -> Option<PlaylistId> {
    let id = app.controller.find_playlist(name);
    if id.is_none() {
        app.controller
            .notify(Level::Error, format!("Playlist not found: {}", name.trim()));
    }
    id
}

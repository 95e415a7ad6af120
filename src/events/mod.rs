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

//! Application events and the main event loop.
//!
//! Everything that happens to the application arrives on one channel as an
//! [`AppEvent`]: terminal input, parsed command lines, results from the task
//! worker and reports from the audio engine. The loop in [`process_events`]
//! applies each event to the application state and redraws.
//!
//! # Organization
//!
//! * `handlers`: Applies non-input events to the application state.
//! * `key_handlers`: Maps keyboard and mouse input to [`Action`](crate::actions::Action)s.

mod handlers;
mod key_handlers;

use handlers::*;
use key_handlers::*;

use std::{io::Stdout, time::Instant};

use anyhow::{Result, bail};
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::info;

use crate::{
    App,
    commander::Command,
    model::{LibraryStats, Playlist, PlaylistId, Song, SongId, ViewTarget},
    player::PlayerState,
    render::draw,
    tasks::{Operation, UploadSummary},
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),

    Command(Command),

    Library(LibraryEvent),

    PlayerStateChanged(PlayerState),
    DurationChanged(f64),
    TimeChanged(f64),
    TrackFinished,
    TransportError(String),

    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Results of library service requests, sent by the task worker.
#[derive(Debug)]
pub(crate) enum LibraryEvent {
    StatsLoaded(LibraryStats),
    PlaylistsLoaded(Vec<Playlist>),
    SongsLoaded(Vec<Song>),
    ViewLoaded {
        target: ViewTarget,
        generation: u64,
        songs: Vec<Song>,
    },

    PlaylistCreated {
        id: PlaylistId,
        name: String,
    },
    SongAddedToPlaylist {
        playlist_id: PlaylistId,
        song_id: SongId,
    },
    SongRemovedFromPlaylist {
        playlist_id: PlaylistId,
        song_id: SongId,
    },
    SongDeleted(SongId),
    PlaylistDeleted(PlaylistId),

    UploadProgress {
        completed: usize,
        total: usize,
    },
    UploadFinished(UploadSummary),

    Failed {
        operation: Operation,
        message: String,
    },
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
///
/// # Errors
///
/// Returns an error on a fatal event (the audio engine or the task worker has
/// gone) or if the terminal cannot be drawn.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => {
                info!("Exit requested");
                break;
            }
            AppEvent::FatalError(message) => bail!(message),

            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::Mouse(mouse) => process_mouse_event(app, mouse)?,
            AppEvent::Command(command) => handle_command(app, command)?,
            AppEvent::Library(event) => handle_library_event(app, event)?,

            AppEvent::PlayerStateChanged(state) => app.controller.on_player_state(state),
            AppEvent::DurationChanged(seconds) => app.controller.on_duration(seconds),
            AppEvent::TimeChanged(seconds) => app.controller.on_time(seconds),
            AppEvent::TrackFinished => handle_track_finished(app)?,
            AppEvent::TransportError(message) => app.controller.on_transport_error(&message),

            AppEvent::Tick => app.controller.on_tick(Instant::now()),
            AppEvent::Error(message) => handle_error(app, message),
        }

        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

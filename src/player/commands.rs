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

//! MPV-backed audio playback engine and event processing.
//!
//! This module provides the core audio playback logic, leveraging `libmpv` for
//! decoding and network streaming. It manages a background worker thread that
//! bridges the gap between the application's command-based interface and the
//! low-level MPV property observation system.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s from the
//!    controller (load, pause, seek, etc.).
//! 2. **Event Channel**: Broadcasts [`AppEvent`]s to notify the controller of
//!    state changes, such as track progress, end of track and playback
//!    failures.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};
use tracing::{debug, warn};

use crate::{
    events::AppEvent,
    player::{AudioPlayer, PlayerState},
};

#[derive(Debug)]
pub(crate) enum AudioPlayerCommand {
    Load(String),
    Pause,
    Resume,
    Restart,
    SeekTo(f64),
    Stop,
    SetVolume(u8),
}

/// State owned by the worker thread between commands.
struct WorkerState {
    is_paused: bool,
    is_idle: bool,
    player_state: PlayerState,
    /// The URL most recently loaded, replayed by [`AudioPlayerCommand::Restart`].
    current_url: Option<String>,
}

/// Spawns the audio worker thread to process playback commands.
///
/// This function takes ownership of the command receiver and the event sender,
/// moving them into a dedicated background thread.
///
/// If the internal worker returns an error, it is caught here and broadcast as
/// a fatal application event.
///
/// # Arguments
///
/// * `command_rx` - The receiving end of the player command channel.
/// * `event_tx` - The channel used to broadcast playback updates and errors.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the audio player backend.
///
/// This function initializes a local `libmpv` context and alternates between
/// draining incoming commands and polling for outgoing events.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the event
/// channel is closed.
fn audio_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .context("Failed to observe idle-active")?;

    let mut state = WorkerState {
        is_paused: false,
        is_idle: true,
        player_state: PlayerState::Stopped,
        current_url: None,
    };

    loop {
        process_commands(&mut handler, &command_rx, &mut state, &event_tx)?;
        process_mpv_events(&mut handler, &mut state, &event_tx)?;
    }
}

/// Drains and executes all pending commands from the application channel.
///
/// A command MPV rejects is reported as a transport error and the worker
/// carries on.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &mpsc::Receiver<AudioPlayerCommand>,
    state: &mut WorkerState,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    while let Ok(command) = command_rx.try_recv() {
        debug!(?command, "Audio command");

        if let Err(e) = execute_command(handler, command, state) {
            warn!(error = %format!("{:#}", e), "Audio command failed");
            event_tx
                .send(AppEvent::TransportError(format!("{:#}", e)))
                .context("Failed to send transport error")?;
        }
    }

    Ok(())
}

fn execute_command(
    handler: &mut mpv::MpvHandler,
    command: AudioPlayerCommand,
    state: &mut WorkerState,
) -> Result<()> {
    match command {
        AudioPlayerCommand::Load(url) => {
            load(handler, &url)?;
            state.current_url = Some(url);
        }
        AudioPlayerCommand::Pause => {
            handler
                .set_property("pause", true)
                .context("Failed to pause")?;
        }
        AudioPlayerCommand::Resume => {
            handler
                .set_property("pause", false)
                .context("Failed to resume")?;
        }
        AudioPlayerCommand::Restart => {
            // At end of file MPV has already unloaded the stream, so a restart
            // is a fresh load rather than a seek.
            if let Some(url) = state.current_url.clone() {
                load(handler, &url)?;
            }
        }
        AudioPlayerCommand::SeekTo(seconds) => {
            handler
                .command(&["seek", &format!("{:.3}", seconds), "absolute"])
                .context("Failed to seek")?;
        }
        AudioPlayerCommand::Stop => {
            handler.command(&["stop"]).context("Failed to stop")?;
        }
        AudioPlayerCommand::SetVolume(level) => {
            handler
                .set_property("volume", f64::from(level))
                .context("Failed to set volume")?;
        }
    }

    Ok(())
}

fn load(handler: &mut mpv::MpvHandler, url: &str) -> Result<()> {
    handler
        .command(&["loadfile", url, "replace"])
        .context(format!("Failed to load: {}", url))?;
    handler
        .set_property("pause", false)
        .context("Failed to start playback")?;

    Ok(())
}

/// Polls for MPV events and synchronizes the application state.
///
/// This function waits for up to 50ms for an event from the MPV context.
/// If an event occurs, it updates internal flags and broadcasts any necessary
/// [`AppEvent`]s to the controller.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    state: &mut WorkerState,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    if let Some(mpv_event) = handler.wait_event(0.05) {
        let app_event = match mpv_event {
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("duration", Format::Double(duration)) => Some(AppEvent::DurationChanged(duration)),
                ("pause", Format::Flag(pause)) => {
                    state.is_paused = pause;
                    None
                }
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                    Some(AppEvent::TimeChanged(seconds))
                }
                ("idle-active", Format::Flag(idle_active)) => {
                    state.is_idle = idle_active;
                    None
                }
                _ => None,
            },
            mpv::Event::EndFile(result) => match result {
                Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => Some(AppEvent::TrackFinished),
                Ok(_) => None,
                Err(e) => Some(AppEvent::TransportError(format!("{:?}", e))),
            },
            _ => None,
        };

        let new_player_state = AudioPlayer::player_state(state.is_paused, state.is_idle);

        if new_player_state != state.player_state {
            state.player_state = new_player_state;
            event_tx
                .send(AppEvent::PlayerStateChanged(new_player_state))
                .context("Failed to send player state event")?;
        }

        if let Some(event) = app_event {
            event_tx.send(event).context("Failed to send event")?;
        }
    }

    Ok(())
}

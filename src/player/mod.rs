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

//! Audio playback control and state management.
//!
//! This module provides the [`Transport`] abstraction the library controller
//! drives, and [`AudioPlayer`], the implementation backed by a background
//! worker thread that interfaces with the underlying audio library (MPV). MPV
//! streams directly from the library service, so the transport only ever
//! deals in URLs.

mod commands;

use std::sync::mpsc;

use anyhow::Result;

use crate::{events::AppEvent, player::commands::AudioPlayerCommand};

/// Represents the current playback status.
///
/// The audio engine itself only ever reports `Playing`, `Paused` and
/// `Stopped`; `Loading` and `Ended` are tracked by the controller around
/// those reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum PlayerState {
    #[default]
    Stopped,
    Loading,
    Playing,
    Paused,
    Ended,
}

/// The media playback engine as seen by the controller.
///
/// Calls are requests; outcomes (state changes, duration, errors) are
/// reported asynchronously as [`AppEvent`]s.
pub(crate) trait Transport {
    /// Replaces whatever is playing with the audio at `url` and starts it.
    fn load(&self, url: &str) -> Result<()>;

    fn pause(&self) -> Result<()>;

    fn resume(&self) -> Result<()>;

    /// Plays the most recently loaded audio again from position 0.
    fn restart(&self) -> Result<()>;

    fn stop(&self) -> Result<()>;

    /// Moves the playback position to an absolute offset in seconds.
    fn seek_to(&self, seconds: f64) -> Result<()>;

    /// Sets the output volume, `0..=100`.
    fn set_volume(&self, level: u8) -> Result<()>;
}

/// A handle to the audio playback engine.
///
/// This struct acts as a command proxy; it does not perform audio processing
/// itself but instead sends instructions to a background worker thread.
pub(crate) struct AudioPlayer {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<AudioPlayerCommand>,
}

impl AudioPlayer {
    /// Spawns the audio worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send application-level events (like progress
    ///   updates or errors) back to the main event loop.
    pub(crate) fn new(event_tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();

        commands::spawn_player_worker(command_rx, event_tx);

        Ok(Self { command_tx })
    }

    // Maps internal audio backend flags to a simplified [`PlayerState`].
    fn player_state(is_paused: bool, is_idle: bool) -> PlayerState {
        if is_idle {
            PlayerState::Stopped
        } else if is_paused {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }

    fn send(&self, command: AudioPlayerCommand) -> Result<()> {
        self.command_tx.send(command)?;
        Ok(())
    }
}

impl Transport for AudioPlayer {
    fn load(&self, url: &str) -> Result<()> {
        self.send(AudioPlayerCommand::Load(url.to_string()))
    }

    fn pause(&self) -> Result<()> {
        self.send(AudioPlayerCommand::Pause)
    }

    fn resume(&self) -> Result<()> {
        self.send(AudioPlayerCommand::Resume)
    }

    fn restart(&self) -> Result<()> {
        self.send(AudioPlayerCommand::Restart)
    }

    fn stop(&self) -> Result<()> {
        self.send(AudioPlayerCommand::Stop)
    }

    fn seek_to(&self, seconds: f64) -> Result<()> {
        self.send(AudioPlayerCommand::SeekTo(seconds))
    }

    fn set_volume(&self, level: u8) -> Result<()> {
        self.send(AudioPlayerCommand::SetVolume(level.min(100)))
    }
}

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

//! Playback state and cursor arithmetic.

use rand::seq::IteratorRandom;

use crate::player::PlayerState;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlaybackState {
    /// Index into the active view of the song being played.
    pub(crate) cursor: Option<usize>,
    pub(crate) state: PlayerState,
    pub(crate) shuffle: bool,
    pub(crate) repeat: bool,
    pub(crate) volume: u8,
    /// Seconds, as reported by the transport.
    pub(crate) duration: Option<f64>,
    pub(crate) position: Option<f64>,
}

impl PlaybackState {
    pub(crate) fn new(volume: u8) -> Self {
        Self {
            cursor: None,
            state: PlayerState::Stopped,
            shuffle: false,
            repeat: false,
            volume: volume.min(100),
            duration: None,
            position: None,
        }
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// Progress through the current song, `0.0..=1.0`.
    pub(crate) fn progress(&self) -> f64 {
        match (self.position, self.duration) {
            (Some(position), Some(duration)) if duration > 0.0 => {
                (position / duration).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub(crate) fn clear_timing(&mut self) {
        self.duration = None;
        self.position = None;
    }
}

/// The index after `current`, wrapping to the start.
pub(crate) fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) if i + 1 < len => i + 1,
        Some(_) => 0,
        None => 0,
    })
}

/// The index before `current`, wrapping to the end.
pub(crate) fn previous_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) if i > 0 && i < len => i - 1,
        _ => len - 1,
    })
}

/// A uniformly random index; the current one may come up again.
pub(crate) fn shuffle_index(len: usize) -> Option<usize> {
    (0..len).choose(&mut rand::rng())
}

/// Converts a fraction of the song into an absolute position in seconds.
pub(crate) fn seek_position(fraction: f64, duration: Option<f64>) -> Option<f64> {
    let duration = duration.filter(|d| d.is_finite() && *d > 0.0)?;
    if !fraction.is_finite() {
        return None;
    }
    Some(fraction.clamp(0.0, 1.0) * duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_to_start() {
        assert_eq!(next_index(Some(2), 3), Some(0));
        assert_eq!(next_index(Some(0), 3), Some(1));
        assert_eq!(next_index(None, 3), Some(0));
        assert_eq!(next_index(Some(0), 0), None);
    }

    #[test]
    fn previous_wraps_to_end() {
        assert_eq!(previous_index(Some(0), 3), Some(2));
        assert_eq!(previous_index(Some(2), 3), Some(1));
        assert_eq!(previous_index(None, 3), Some(2));
        assert_eq!(previous_index(None, 0), None);
    }

    #[test]
    fn shuffle_stays_in_range() {
        for _ in 0..200 {
            let idx = shuffle_index(4).unwrap();
            assert!(idx < 4);
        }
        assert_eq!(shuffle_index(0), None);
        assert_eq!(shuffle_index(1), Some(0));
    }

    #[test]
    fn seek_needs_known_duration() {
        assert_eq!(seek_position(0.5, Some(200.0)), Some(100.0));
        assert_eq!(seek_position(1.7, Some(200.0)), Some(200.0));
        assert_eq!(seek_position(-0.2, Some(200.0)), Some(0.0));
        assert_eq!(seek_position(0.5, None), None);
        assert_eq!(seek_position(0.5, Some(0.0)), None);
        assert_eq!(seek_position(f64::NAN, Some(10.0)), None);
    }

    #[test]
    fn progress_is_clamped() {
        let mut playback = PlaybackState::new(80);
        assert_eq!(playback.progress(), 0.0);

        playback.duration = Some(100.0);
        playback.position = Some(25.0);
        assert_eq!(playback.progress(), 0.25);

        playback.position = Some(130.0);
        assert_eq!(playback.progress(), 1.0);
    }

    #[test]
    fn volume_is_capped() {
        assert_eq!(PlaybackState::new(250).volume, 100);
    }
}

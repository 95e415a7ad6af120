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

//! Formatting of durations and sizes for display.

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Formats a duration in seconds into a human-readable `MM:SS` string.
///
/// This is used primarily for displaying song positions and total durations
/// in the player interface and the song table.
///
/// # Arguments
///
/// * `total_seconds` - The duration to format, represented as a 64-bit integer.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_time(65), "01:05");
/// assert_eq!(format_time(3600), "60:00");
/// ```
pub(crate) fn format_time(total_seconds: u64) -> String {
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// As [`format_time`], for the fractional positions reported by the player.
/// Negative and non-finite values show as zero.
pub(crate) fn format_position(seconds: Option<f64>) -> String {
    let seconds = seconds
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(|s| s.floor() as u64)
        .unwrap_or(0);
    format_time(seconds)
}

/// Formats a byte count as megabytes, switching to gigabytes from 1024 MB.
pub(crate) fn format_storage(bytes: u64) -> String {
    let mb = bytes as f64 / BYTES_PER_MB;
    if mb < 1024.0 {
        format!("{:.2} MB", mb)
    } else {
        format!("{:.2} GB", mb / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_is_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn position_truncates_fractions() {
        assert_eq!(format_position(Some(61.9)), "01:01");
        assert_eq!(format_position(Some(-3.0)), "00:00");
        assert_eq!(format_position(None), "00:00");
    }

    #[test]
    fn storage_switches_unit_at_one_gigabyte() {
        assert_eq!(format_storage(0), "0.00 MB");
        assert_eq!(format_storage(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
        assert_eq!(format_storage(1023 * 1024 * 1024), "1023.00 MB");
        assert_eq!(format_storage(1024 * 1024 * 1024), "1.00 GB");
        assert_eq!(format_storage(3 * 1024 * 1024 * 1024 / 2), "1.50 GB");
    }
}

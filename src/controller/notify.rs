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

//! Transient user notifications.

use std::time::{Duration, Instant};

use crate::tasks::UploadSummary;

/// How long a notification stays on screen.
pub(crate) const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(3);

/// At most this many upload failures are spelled out.
const MAX_LISTED_ERRORS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Notification {
    pub(crate) level: Level,
    pub(crate) message: String,
    deadline: Instant,
}

/// Holds the single notification currently on screen; a newer one replaces
/// it.
#[derive(Debug, Default)]
pub(crate) struct Notifications {
    current: Option<Notification>,
}

impl Notifications {
    pub(crate) fn push(&mut self, level: Level, message: impl Into<String>) {
        self.current = Some(Notification {
            level,
            message: message.into(),
            deadline: Instant::now() + NOTIFICATION_LIFETIME,
        });
    }

    pub(crate) fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Drops the notification once its deadline has passed.
    pub(crate) fn expire(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|n| now >= n.deadline) {
            self.current = None;
        }
    }
}

/// The notification closing an upload batch.
pub(crate) fn upload_outcome(summary: &UploadSummary) -> (Level, String) {
    if summary.total == 0 {
        return (Level::Error, "No audio files found to upload".to_string());
    }

    if summary.is_complete() {
        return (
            Level::Success,
            format!("Successfully uploaded {} file(s)", summary.uploaded),
        );
    }

    let mut listed = summary
        .errors
        .iter()
        .take(MAX_LISTED_ERRORS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if summary.errors.len() > MAX_LISTED_ERRORS {
        listed.push_str(&format!(
            " and {} more",
            summary.errors.len() - MAX_LISTED_ERRORS
        ));
    }

    (
        Level::Warning,
        format!(
            "Uploaded {}/{} files. Errors: {}",
            summary.uploaded, summary.total, listed
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(uploaded: usize, total: usize, errors: &[&str]) -> UploadSummary {
        UploadSummary {
            uploaded,
            total,
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn clean_batch_is_a_success() {
        assert_eq!(
            upload_outcome(&summary(3, 3, &[])),
            (Level::Success, "Successfully uploaded 3 file(s)".to_string())
        );
    }

    #[test]
    fn partial_batch_lists_errors() {
        assert_eq!(
            upload_outcome(&summary(2, 3, &["b.mp3: Invalid file type"])),
            (
                Level::Warning,
                "Uploaded 2/3 files. Errors: b.mp3: Invalid file type".to_string()
            )
        );
    }

    #[test]
    fn long_error_lists_are_truncated() {
        let (level, message) = upload_outcome(&summary(0, 5, &["a", "b", "c", "d", "e"]));
        assert_eq!(level, Level::Warning);
        assert_eq!(message, "Uploaded 0/5 files. Errors: a, b, c and 2 more");
    }

    #[test]
    fn notifications_expire_after_deadline() {
        let mut notifications = Notifications::default();
        notifications.push(Level::Success, "Shuffle enabled");

        notifications.expire(Instant::now());
        assert!(notifications.current().is_some());

        notifications.expire(Instant::now() + NOTIFICATION_LIFETIME + Duration::from_millis(1));
        assert!(notifications.current().is_none());
    }
}

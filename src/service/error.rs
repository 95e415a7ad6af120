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

//! Error types for the library service client.

use thiserror::Error;

/// Errors that can occur when talking to the library service.
#[derive(Error, Debug)]
pub(crate) enum ServiceError {
    /// The configured server URL is unusable.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// No response was received (connection refused, timed out).
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a non-success status. The message is the
    /// service's own wording and is shown to the user as-is.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// A success response whose body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A local file could not be read for upload.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Classifies a transport level failure from the HTTP client.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ServiceError::Unreachable(err.to_string())
        } else {
            ServiceError::Request(err)
        }
    }

    /// True when no response was received at all.
    pub(crate) fn is_network(&self) -> bool {
        matches!(self, ServiceError::Unreachable(_) | ServiceError::Request(_))
    }
}

/// Result type for library service operations.
pub(crate) type Result<T> = std::result::Result<T, ServiceError>;

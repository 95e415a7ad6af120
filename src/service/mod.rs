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

//! Library service access.
//!
//! The library service is the REST backend that owns songs, playlists and the
//! audio files themselves. This module describes it as the [`LibraryService`]
//! trait, one method per endpoint, so that the task worker can be exercised
//! against a scripted implementation, and provides [`HttpLibraryService`], the
//! real client.
//!
//! All calls are blocking; they are only ever made from the task worker
//! thread, never from the UI thread.

mod error;
mod http;

use std::path::Path;

pub(crate) use error::{Result, ServiceError};
pub(crate) use http::HttpLibraryService;

use crate::model::{
    LibraryStats, Playlist, PlaylistDetail, PlaylistId, Song, SongId, SortField, SortOrder,
    UploadedSong,
};

/// The operations offered by the library service.
pub(crate) trait LibraryService: Send {
    fn library_stats(&self) -> Result<LibraryStats>;

    fn list_playlists(&self) -> Result<Vec<Playlist>>;

    /// Creates a playlist, returning its new identifier.
    fn create_playlist(&self, name: &str, description: &str) -> Result<PlaylistId>;

    fn get_playlist(&self, id: PlaylistId) -> Result<PlaylistDetail>;

    fn delete_playlist(&self, id: PlaylistId) -> Result<()>;

    fn add_song_to_playlist(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<()>;

    fn remove_song_from_playlist(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<()>;

    fn list_songs(&self, sort: SortField, order: SortOrder) -> Result<Vec<Song>>;

    fn search_songs(&self, query: &str) -> Result<Vec<Song>>;

    /// Uploads one audio file.
    fn upload_song(&self, path: &Path) -> Result<UploadedSong>;

    fn increment_play_count(&self, id: SongId) -> Result<()>;

    fn delete_song(&self, id: SongId) -> Result<()>;
}

/// Builds the URLs of the library service endpoints.
///
/// Shared between the HTTP client and the controller, which needs the stream
/// URL of a song to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Validates and normalises a server URL.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidUrl`] if the URL is empty or is not an
    /// `http://` or `https://` URL.
    pub(crate) fn new(server_url: &str) -> Result<Self> {
        let trimmed = server_url.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::InvalidUrl("URL cannot be empty".into()));
        }

        let base = trimmed.trim_end_matches('/').to_string();
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ServiceError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        Ok(Self { base })
    }

    pub(crate) fn base(&self) -> &str {
        &self.base
    }

    pub(crate) fn library_stats(&self) -> String {
        format!("{}/api/library/stats", self.base)
    }

    pub(crate) fn playlists(&self) -> String {
        format!("{}/api/playlists", self.base)
    }

    pub(crate) fn playlist(&self, id: PlaylistId) -> String {
        format!("{}/api/playlists/{}", self.base, id)
    }

    pub(crate) fn playlist_song(&self, playlist_id: PlaylistId, song_id: SongId) -> String {
        format!("{}/api/playlists/{}/songs/{}", self.base, playlist_id, song_id)
    }

    pub(crate) fn songs(&self) -> String {
        format!("{}/api/songs", self.base)
    }

    pub(crate) fn search(&self) -> String {
        format!("{}/api/songs/search", self.base)
    }

    pub(crate) fn upload(&self) -> String {
        format!("{}/api/songs/upload", self.base)
    }

    pub(crate) fn song(&self, id: SongId) -> String {
        format!("{}/api/songs/{}", self.base, id)
    }

    /// GET streams the audio, POST increments the play count.
    pub(crate) fn song_play(&self, id: SongId) -> String {
        format!("{}/api/songs/{}/play", self.base, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_removed() {
        let endpoints = Endpoints::new("http://music.local:5000///").unwrap();
        assert_eq!(endpoints.base(), "http://music.local:5000");
        assert_eq!(
            endpoints.song_play(SongId(4)),
            "http://music.local:5000/api/songs/4/play"
        );
    }

    #[test]
    fn empty_url_rejected() {
        match Endpoints::new("   ") {
            Err(ServiceError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got {:?}", other),
        }
    }

    #[test]
    fn url_without_scheme_rejected() {
        assert!(matches!(
            Endpoints::new("music.local"),
            Err(ServiceError::InvalidUrl(_))
        ));
        assert!(matches!(
            Endpoints::new("ftp://music.local"),
            Err(ServiceError::InvalidUrl(_))
        ));
    }

    #[test]
    fn playlist_song_path() {
        let endpoints = Endpoints::new("https://example.com").unwrap();
        assert_eq!(
            endpoints.playlist_song(PlaylistId(2), SongId(11)),
            "https://example.com/api/playlists/2/songs/11"
        );
    }
}

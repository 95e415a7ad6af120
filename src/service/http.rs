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

//! Blocking HTTP implementation of [`LibraryService`].

use std::{path::Path, time::Duration};

use reqwest::blocking::{Client, RequestBuilder, Response, multipart::Form};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, info};

use crate::{
    model::{
        LibraryStats, Playlist, PlaylistDetail, PlaylistId, Song, SongId, SortField, SortOrder,
        UploadedSong,
    },
    service::{Endpoints, LibraryService, Result, ServiceError},
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct CreatedPlaylist {
    playlist_id: PlaylistId,
}

/// Library service client backed by a blocking `reqwest` client.
pub(crate) struct HttpLibraryService {
    http: Client,
    endpoints: Endpoints,
}

impl HttpLibraryService {
    /// Creates a client for the service at `endpoints`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub(crate) fn new(endpoints: Endpoints, request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(format!("tunedeck/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServiceError::Request)?;

        Ok(Self { http, endpoints })
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().map_err(ServiceError::from_transport)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are `{"error": "..."}`, anything else falls back to the
        // raw text or, failing that, the status reason.
        let text = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .ok()
            .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        Err(ServiceError::Service {
            status: status.as_u16(),
            message,
        })
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        self.send(request)?
            .json()
            .map_err(|e| ServiceError::Decode(format!("Failed to parse {}: {}", what, e)))
    }
}

impl LibraryService for HttpLibraryService {
    fn library_stats(&self) -> Result<LibraryStats> {
        let url = self.endpoints.library_stats();
        debug!(url = %url, "Fetching library stats");

        self.fetch(self.http.get(&url), "library stats")
    }

    fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let url = self.endpoints.playlists();
        debug!(url = %url, "Fetching playlists");

        self.fetch(self.http.get(&url), "playlists")
    }

    fn create_playlist(&self, name: &str, description: &str) -> Result<PlaylistId> {
        let url = self.endpoints.playlists();
        debug!(url = %url, name, "Creating playlist");

        let body = json!({ "name": name, "description": description });
        let created: CreatedPlaylist =
            self.fetch(self.http.post(&url).json(&body), "created playlist")?;

        info!(playlist_id = %created.playlist_id, name, "Playlist created");

        Ok(created.playlist_id)
    }

    fn get_playlist(&self, id: PlaylistId) -> Result<PlaylistDetail> {
        let url = self.endpoints.playlist(id);
        debug!(url = %url, "Fetching playlist");

        self.fetch(self.http.get(&url), "playlist")
    }

    fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        let url = self.endpoints.playlist(id);
        debug!(url = %url, "Deleting playlist");

        self.send(self.http.delete(&url))?;
        info!(playlist_id = %id, "Playlist deleted");

        Ok(())
    }

    fn add_song_to_playlist(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<()> {
        let url = self.endpoints.playlist_song(playlist_id, song_id);
        debug!(url = %url, "Adding song to playlist");

        self.send(self.http.post(&url))?;
        info!(playlist_id = %playlist_id, song_id = %song_id, "Song added to playlist");

        Ok(())
    }

    fn remove_song_from_playlist(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<()> {
        let url = self.endpoints.playlist_song(playlist_id, song_id);
        debug!(url = %url, "Removing song from playlist");

        self.send(self.http.delete(&url))?;
        info!(playlist_id = %playlist_id, song_id = %song_id, "Song removed from playlist");

        Ok(())
    }

    fn list_songs(&self, sort: SortField, order: SortOrder) -> Result<Vec<Song>> {
        let url = self.endpoints.songs();
        debug!(url = %url, sort_by = sort.as_param(), "Fetching songs");

        let request = self
            .http
            .get(&url)
            .query(&[("sort_by", sort.as_param()), ("order", order.as_param())]);

        self.fetch(request, "songs")
    }

    fn search_songs(&self, query: &str) -> Result<Vec<Song>> {
        let url = self.endpoints.search();
        debug!(url = %url, query, "Searching songs");

        self.fetch(self.http.get(&url).query(&[("q", query)]), "search results")
    }

    fn upload_song(&self, path: &Path) -> Result<UploadedSong> {
        let url = self.endpoints.upload();
        debug!(url = %url, file = %path.display(), "Uploading song");

        let form = Form::new().file("file", path)?;
        let uploaded: UploadedSong =
            self.fetch(self.http.post(&url).multipart(form), "upload response")?;

        info!(song_id = %uploaded.song_id, file = %path.display(), "Song uploaded");

        Ok(uploaded)
    }

    fn increment_play_count(&self, id: SongId) -> Result<()> {
        let url = self.endpoints.song_play(id);
        debug!(url = %url, "Incrementing play count");

        self.send(self.http.post(&url))?;

        Ok(())
    }

    fn delete_song(&self, id: SongId) -> Result<()> {
        let url = self.endpoints.song(id);
        debug!(url = %url, "Deleting song");

        self.send(self.http.delete(&url))?;
        info!(song_id = %id, "Song deleted");

        Ok(())
    }
}

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

//! Domain models and core data structures.
//!
//! This module defines the records exchanged with the library service (songs,
//! playlists and library statistics) along with the small value types used to
//! describe which songs are currently on screen.

use std::fmt;

use serde::{Deserialize, Serialize};

pub(crate) const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub(crate) const UNKNOWN_ALBUM: &str = "Unknown Album";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct SongId(pub(crate) i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct PlaylistId(pub(crate) i64);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A song as reported by the library service.
///
/// The service also returns storage details (file path, mime type, upload
/// time) which the client has no use for, those fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Song {
    pub(crate) id: SongId,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) artist: Option<String>,
    #[serde(default)]
    pub(crate) album: Option<String>,
    /// Length in seconds.
    #[serde(default)]
    pub(crate) duration: Option<u64>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub(crate) play_count: u64,
    #[serde(default)]
    pub(crate) file_size: Option<u64>,
    #[serde(default)]
    pub(crate) file_size_display: Option<String>,
}

impl Song {
    pub(crate) fn artist_name(&self) -> &str {
        self.artist
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(UNKNOWN_ARTIST)
    }

    pub(crate) fn album_title(&self) -> Option<&str> {
        self.album.as_deref().filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Playlist {
    pub(crate) id: PlaylistId,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub(crate) song_count: u64,
}

/// A playlist together with its member songs, in playlist order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct PlaylistDetail {
    #[serde(flatten)]
    pub(crate) playlist: Playlist,
    #[serde(default)]
    pub(crate) songs: Vec<Song>,
}

/// One row of the "most played" summary: title, artist, play count.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct MostPlayed(
    pub(crate) String,
    pub(crate) Option<String>,
    #[serde(deserialize_with = "null_as_zero")] pub(crate) u64,
);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct LibraryStats {
    #[serde(default)]
    pub(crate) total_songs: u64,
    #[serde(default)]
    pub(crate) total_playlists: u64,
    /// Bytes.
    #[serde(default)]
    pub(crate) total_storage: u64,
    #[serde(default)]
    pub(crate) most_played: Vec<MostPlayed>,
}

/// The song identifier assigned to a freshly uploaded file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct UploadedSong {
    pub(crate) song_id: SongId,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// Columns the service can sort the song list by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SortField {
    #[default]
    Title,
    Artist,
    Album,
    Duration,
    UploadedAt,
    PlayCount,
}

impl SortField {
    pub(crate) const ALL: [SortField; 6] = [
        SortField::Title,
        SortField::Artist,
        SortField::Album,
        SortField::Duration,
        SortField::UploadedAt,
        SortField::PlayCount,
    ];

    pub(crate) fn as_param(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Artist => "artist",
            SortField::Album => "album",
            SortField::Duration => "duration",
            SortField::UploadedAt => "uploaded_at",
            SortField::PlayCount => "play_count",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_param() == value)
    }

    /// The next sort column, wrapping back to the first.
    pub(crate) fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub(crate) fn as_param(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Which songs make up the active view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewTarget {
    All,
    Search(String),
    Playlist(PlaylistId),
}

impl ViewTarget {
    /// Search results are transient, every other target is something the user
    /// browsed to and can come back to.
    pub(crate) fn is_browse(&self) -> bool {
        !matches!(self, ViewTarget::Search(_))
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_ignores_storage_fields_and_null_counts() {
        let json = r#"{
            "id": 7,
            "title": "Blue Monday",
            "artist": "New Order",
            "album": null,
            "duration": 448,
            "file_path": "blue_monday_1700000000.mp3",
            "file_type": "audio/mpeg",
            "play_count": null,
            "file_size": 10485760,
            "file_size_display": "10.00 MB"
        }"#;

        let song: Song = serde_json::from_str(json).unwrap();

        assert_eq!(song.id, SongId(7));
        assert_eq!(song.play_count, 0);
        assert_eq!(song.album_title(), None);
        assert_eq!(song.file_size_display.as_deref(), Some("10.00 MB"));
    }

    #[test]
    fn song_without_artist_falls_back() {
        let json = r#"{"id": 1, "title": "Untitled", "artist": ""}"#;
        let song: Song = serde_json::from_str(json).unwrap();

        assert_eq!(song.artist_name(), UNKNOWN_ARTIST);
    }

    #[test]
    fn playlist_detail_flattens_playlist_fields() {
        let json = r#"{
            "id": 3,
            "name": "Road Trip",
            "description": "",
            "created_at": "2026-01-01 10:00:00",
            "song_count": 1,
            "songs": [{"id": 9, "title": "Drive", "position": 1}]
        }"#;

        let detail: PlaylistDetail = serde_json::from_str(json).unwrap();

        assert_eq!(detail.playlist.id, PlaylistId(3));
        assert_eq!(detail.playlist.song_count, 1);
        assert_eq!(detail.songs.len(), 1);
        assert_eq!(detail.songs[0].id, SongId(9));
    }

    #[test]
    fn stats_decode_most_played_rows() {
        let json = r#"{
            "total_songs": 2,
            "total_playlists": 1,
            "total_storage": 2048,
            "most_played": [["Drive", "Incubus", 12], ["Untitled", null, 0]]
        }"#;

        let stats: LibraryStats = serde_json::from_str(json).unwrap();

        assert_eq!(stats.most_played.len(), 2);
        assert_eq!(stats.most_played[0].2, 12);
        assert_eq!(stats.most_played[1].1, None);
    }

    #[test]
    fn sort_field_cycles_and_parses() {
        assert_eq!(SortField::Title.cycle(), SortField::Artist);
        assert_eq!(SortField::PlayCount.cycle(), SortField::Title);
        assert_eq!(SortField::parse("uploaded_at"), Some(SortField::UploadedAt));
        assert_eq!(SortField::parse("bitrate"), None);
    }
}

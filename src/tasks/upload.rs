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

//! Batch upload of local audio files.
//!
//! Paths given by the user may be files or directories. Directories are walked
//! recursively with `WalkDir` and only files with an extension the library
//! service accepts are kept. Files are then uploaded one at a time; a failed
//! file is recorded and the batch moves on to the next one.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    model::PlaylistId,
    service::{LibraryService, ServiceError},
};

/// File extensions the library service accepts.
pub(crate) const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "mp4", "m4a", "wav", "flac", "ogg"];

/// The outcome of an upload batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct UploadSummary {
    pub(crate) uploaded: usize,
    pub(crate) total: usize,
    /// One `"{file name}: {reason}"` entry per failed file, in upload order.
    pub(crate) errors: Vec<String>,
}

impl UploadSummary {
    pub(crate) fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

pub(crate) fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Expands the user's selection into the list of files to upload.
///
/// Plain files are kept as given, whatever their extension, so that the
/// service gets to reject what it does not accept. Directories contribute
/// their audio files, sorted by path.
pub(crate) fn collect_upload_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_audio_file(e.path()))
                .map(|e| e.into_path())
                .collect();
            found.sort();
            debug!(dir = %path.display(), count = found.len(), "Expanded upload directory");
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files
}

/// Uploads `files` sequentially.
///
/// `progress` is called after every file with the number of files processed
/// so far and the batch size. When `playlist` is given each uploaded song is
/// added to it; a failure there is logged and does not count against the
/// upload.
pub(crate) fn upload_batch(
    service: &dyn LibraryService,
    files: &[PathBuf],
    playlist: Option<PlaylistId>,
    mut progress: impl FnMut(usize, usize),
) -> UploadSummary {
    let mut summary = UploadSummary {
        total: files.len(),
        ..Default::default()
    };

    for (idx, path) in files.iter().enumerate() {
        match service.upload_song(path) {
            Ok(uploaded) => {
                summary.uploaded += 1;
                info!(file = %path.display(), song_id = %uploaded.song_id, "Uploaded");

                if let Some(playlist_id) = playlist {
                    if let Err(e) = service.add_song_to_playlist(playlist_id, uploaded.song_id) {
                        warn!(
                            song_id = %uploaded.song_id,
                            playlist_id = %playlist_id,
                            error = %e,
                            "Failed to add uploaded song to playlist"
                        );
                    }
                }
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Upload failed");
                summary
                    .errors
                    .push(format!("{}: {}", display_name(path), failure_reason(&e)));
            }
        }

        progress(idx + 1, files.len());
    }

    summary
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn failure_reason(err: &ServiceError) -> String {
    match err {
        ServiceError::Service { message, .. } => message.clone(),
        ServiceError::Io(e) => e.to_string(),
        e if e.is_network() => "Network error".to_string(),
        _ => "Upload failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::tasks::tests::ScriptedService;

    #[test]
    fn audio_extensions_match_case_insensitively() {
        assert!(is_audio_file(Path::new("a/b/song.MP3")));
        assert!(is_audio_file(Path::new("track.flac")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("README")));
    }

    #[test]
    fn directories_expand_to_sorted_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("disc2");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b.mp3"), b"x").unwrap();
        fs::write(dir.path().join("a.ogg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(nested.join("c.wav"), b"x").unwrap();

        let loose = PathBuf::from("/elsewhere/loose.txt");
        let files = collect_upload_files(&[dir.path().to_path_buf(), loose.clone()]);

        assert_eq!(
            files,
            vec![
                dir.path().join("a.ogg"),
                dir.path().join("b.mp3"),
                nested.join("c.wav"),
                loose,
            ]
        );
    }

    #[test]
    fn failed_file_does_not_abort_batch() {
        let service = ScriptedService::default();
        service.fail_upload("two.mp3", "Invalid file type");

        let files = vec![
            PathBuf::from("one.mp3"),
            PathBuf::from("two.mp3"),
            PathBuf::from("three.mp3"),
        ];
        let mut ticks = Vec::new();
        let summary = upload_batch(&service, &files, None, |done, total| ticks.push((done, total)));

        assert_eq!(summary.uploaded, 2);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.errors, vec!["two.mp3: Invalid file type".to_string()]);
        assert_eq!(ticks, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(service.uploads(), vec!["one.mp3", "two.mp3", "three.mp3"]);
    }

    #[test]
    fn uploaded_songs_are_added_to_playlist() {
        let service = ScriptedService::default();
        service.fail_upload("bad.mp3", "File too large");

        let files = vec![PathBuf::from("good.mp3"), PathBuf::from("bad.mp3")];
        let summary = upload_batch(&service, &files, Some(PlaylistId(7)), |_, _| {});

        assert_eq!(summary.uploaded, 1);
        assert!(!summary.is_complete());
        assert_eq!(service.playlist_adds().len(), 1);
        assert_eq!(service.playlist_adds()[0].0, PlaylistId(7));
    }
}

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

//! The library controller.
//!
//! [`LibraryController`] owns everything the user sees and acts on: the cached
//! library, playlists and statistics, the active view, the playback cursor and
//! flags, pending confirmations and notifications. It lives on the UI thread
//! and never blocks:
//!
//! * Service requests are sent to the task worker as [`AppTask`]s and their
//!   results come back through [`LibraryController::on_library_event`].
//! * Playback requests go to the [`Transport`]; what the engine actually did
//!   comes back through the `on_*` transport handlers.
//!
//! Every user intent enters through [`LibraryController::dispatch`].

mod notify;
mod playback;
mod view;

pub(crate) use notify::{Level, Notification};
pub(crate) use playback::PlaybackState;
pub(crate) use view::ActiveView;

use std::{path::PathBuf, sync::mpsc::Sender, time::Instant};

use tracing::{debug, error, info, warn};

use crate::{
    actions::{Action, ControllerError},
    events::LibraryEvent,
    model::{LibraryStats, Playlist, PlaylistId, Song, SongId, SortField, ViewTarget},
    player::{PlayerState, Transport},
    service::Endpoints,
    tasks::{AppTask, Operation, UploadSummary},
};

type ActionResult = Result<(), ControllerError>;

/// A destructive request waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingConfirmation {
    DeleteSong(SongId),
    DeletePlaylist { id: PlaylistId, name: String },
    RemoveFromPlaylist { playlist: PlaylistId, song: SongId },
}

impl PendingConfirmation {
    pub(crate) fn prompt(&self) -> String {
        match self {
            PendingConfirmation::DeleteSong(_) => {
                "Are you sure you want to delete this song? This action cannot be undone.".into()
            }
            PendingConfirmation::DeletePlaylist { name, .. } => format!(
                "Delete playlist \"{}\"? Songs will not be deleted from the library.",
                name
            ),
            PendingConfirmation::RemoveFromPlaylist { .. } => {
                "Remove this song from the playlist?".into()
            }
        }
    }

    fn into_task(self) -> AppTask {
        match self {
            PendingConfirmation::DeleteSong(id) => AppTask::DeleteSong(id),
            PendingConfirmation::DeletePlaylist { id, .. } => AppTask::DeletePlaylist(id),
            PendingConfirmation::RemoveFromPlaylist { playlist, song } => {
                AppTask::RemoveSongFromPlaylist(playlist, song)
            }
        }
    }
}

pub(crate) struct LibraryController<T: Transport> {
    transport: T,
    task_tx: Sender<AppTask>,
    endpoints: Endpoints,

    library: Vec<Song>,
    playlists: Vec<Playlist>,
    stats: LibraryStats,

    view: ActiveView,
    /// The last target that was not a search; a cleared search returns here.
    browse_target: ViewTarget,
    sort: SortField,

    playback: PlaybackState,
    now_playing: Option<Song>,

    pending: Option<PendingConfirmation>,
    notifications: notify::Notifications,
    upload_progress: Option<(usize, usize)>,
}

impl<T: Transport> LibraryController<T> {
    pub(crate) fn new(
        transport: T,
        task_tx: Sender<AppTask>,
        endpoints: Endpoints,
        volume: u8,
        sort: SortField,
    ) -> Self {
        Self {
            transport,
            task_tx,
            endpoints,
            library: Vec::new(),
            playlists: Vec::new(),
            stats: LibraryStats::default(),
            view: ActiveView::new(),
            browse_target: ViewTarget::All,
            sort,
            playback: PlaybackState::new(volume),
            now_playing: None,
            pending: None,
            notifications: notify::Notifications::default(),
            upload_progress: None,
        }
    }

    /// Applies the initial volume and requests the first load of the library.
    pub(crate) fn start(&mut self) -> anyhow::Result<()> {
        let volume = self.playback.volume;
        let result = self.set_volume(volume).and_then(|_| self.refresh());
        self.report(result)
    }

    pub(crate) fn library(&self) -> &[Song] {
        &self.library
    }

    pub(crate) fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub(crate) fn stats(&self) -> &LibraryStats {
        &self.stats
    }

    pub(crate) fn view(&self) -> &ActiveView {
        &self.view
    }

    pub(crate) fn sort(&self) -> SortField {
        self.sort
    }

    pub(crate) fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub(crate) fn now_playing(&self) -> Option<&Song> {
        self.now_playing.as_ref()
    }

    pub(crate) fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub(crate) fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    /// `(files done, files in batch)` while an upload is running.
    pub(crate) fn upload_progress(&self) -> Option<(usize, usize)> {
        self.upload_progress
    }

    pub(crate) fn playlist_name(&self, id: PlaylistId) -> Option<&str> {
        self.playlists
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    /// Finds a playlist by exact id or case-insensitive name.
    pub(crate) fn find_playlist(&self, needle: &str) -> Option<PlaylistId> {
        let needle = needle.trim();
        if let Ok(id) = needle.parse::<i64>() {
            if let Some(p) = self.playlists.iter().find(|p| p.id.0 == id) {
                return Some(p.id);
            }
        }
        self.playlists
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(needle))
            .map(|p| p.id)
    }

    /// Maps a user intent to the operation that carries it out.
    ///
    /// Validation and playback failures become notifications; only a lost
    /// task worker is returned as an error.
    pub(crate) fn dispatch(&mut self, action: Action) -> anyhow::Result<()> {
        if self.pending.is_some() && !matches!(action, Action::Confirm | Action::Cancel) {
            debug!(?action, "Ignored while a confirmation is pending");
            return Ok(());
        }

        let result = match action {
            Action::Play(index) => self.play(index),
            Action::TogglePlayPause => self.toggle_play_pause(),
            Action::Next => self.next(),
            Action::Previous => self.previous(),
            Action::ToggleShuffle => {
                self.toggle_shuffle();
                Ok(())
            }
            Action::ToggleRepeat => {
                self.toggle_repeat();
                Ok(())
            }
            Action::Seek(fraction) => self.seek(fraction),
            Action::SetVolume(level) => self.set_volume(level),
            Action::AdjustVolume(delta) => {
                let level = i16::from(self.playback.volume)
                    .saturating_add(delta)
                    .clamp(0, 100);
                self.set_volume(level as u8)
            }
            Action::SwitchView(target) => self.switch_view(target),
            Action::Search(query) => self.switch_view(ViewTarget::Search(query)),
            Action::Refresh => self.refresh(),
            Action::CycleSort => self.set_sort(self.sort.cycle()),
            Action::SetSort(field) => self.set_sort(field),
            Action::Upload { files, playlist } => self.upload(files, playlist),
            Action::CreatePlaylist { name, description } => {
                self.create_playlist(&name, &description)
            }
            Action::AddSongToPlaylist { playlist, song } => {
                self.add_song_to_playlist(playlist, song)
            }
            Action::RemoveSongFromPlaylist { playlist, song } => {
                self.remove_song_from_playlist(playlist, song);
                Ok(())
            }
            Action::DeleteSong(id) => {
                self.delete_song(id);
                Ok(())
            }
            Action::DeletePlaylist(id) => {
                self.delete_playlist(id);
                Ok(())
            }
            Action::Confirm => self.confirm(),
            Action::Cancel => {
                self.cancel();
                Ok(())
            }
        };

        self.report(result)
    }

    fn report(&mut self, result: ActionResult) -> anyhow::Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Action failed");
                self.notifications.push(Level::Error, e.to_string());
                Ok(())
            }
        }
    }

    fn send_task(&self, task: AppTask) -> ActionResult {
        self.task_tx
            .send(task)
            .map_err(|_| ControllerError::WorkerStopped)
    }

    fn transport_failed(&mut self, err: anyhow::Error) -> ControllerError {
        self.playback.state = PlayerState::Stopped;
        ControllerError::Transport(format!("{:#}", err))
    }

    // Library

    /// Reloads statistics, playlists, the library and the active view.
    pub(crate) fn refresh(&mut self) -> ActionResult {
        self.send_task(AppTask::Refresh {
            target: self.view.target().clone(),
            generation: self.view.generation(),
            sort: self.sort,
        })
    }

    pub(crate) fn switch_view(&mut self, target: ViewTarget) -> ActionResult {
        let target = match target {
            ViewTarget::Search(query) if query.trim().is_empty() => self.browse_target.clone(),
            ViewTarget::Search(query) => ViewTarget::Search(query.trim().to_string()),
            other => other,
        };

        if target.is_browse() {
            self.browse_target = target.clone();
        }

        let generation = self.view.begin_switch(target.clone());
        debug!(?target, generation, "Switching view");

        self.send_task(AppTask::LoadView {
            target,
            generation,
            sort: self.sort,
        })
    }

    fn set_sort(&mut self, field: SortField) -> ActionResult {
        info!(sort = field.as_param(), "Sort order changed");
        self.sort = field;
        self.refresh()
    }

    // Playback

    pub(crate) fn play(&mut self, index: usize) -> ActionResult {
        let len = self.view.len();
        if len == 0 {
            return Err(ControllerError::EmptyView);
        }
        let song = self
            .view
            .get(index)
            .cloned()
            .ok_or(ControllerError::IndexOutOfRange { index, len })?;

        info!(song_id = %song.id, title = %song.title, index, "Play");

        let url = self.endpoints.song_play(song.id);
        let id = song.id;

        self.playback.cursor = Some(index);
        self.playback.clear_timing();
        self.playback.state = PlayerState::Loading;
        self.now_playing = Some(song);

        if let Err(e) = self.transport.load(&url) {
            return Err(self.transport_failed(e));
        }

        self.send_task(AppTask::IncrementPlayCount(id))
    }

    pub(crate) fn toggle_play_pause(&mut self) -> ActionResult {
        if self.view.is_empty() {
            return Ok(());
        }
        if self.now_playing.is_none() {
            return self.play(0);
        }

        let result = match self.playback.state {
            PlayerState::Playing => self.transport.pause().map(|_| PlayerState::Paused),
            PlayerState::Paused => self.transport.resume().map(|_| PlayerState::Playing),
            PlayerState::Stopped | PlayerState::Ended => {
                self.transport.restart().map(|_| PlayerState::Loading)
            }
            PlayerState::Loading => return Ok(()),
        };

        match result {
            Ok(state) => {
                self.playback.state = state;
                Ok(())
            }
            Err(e) => Err(self.transport_failed(e)),
        }
    }

    pub(crate) fn next(&mut self) -> ActionResult {
        let len = self.view.len();
        let index = if self.playback.shuffle {
            playback::shuffle_index(len)
        } else {
            playback::next_index(self.playback.cursor, len)
        };

        match index {
            Some(index) => self.play(index),
            None => Ok(()),
        }
    }

    pub(crate) fn previous(&mut self) -> ActionResult {
        match playback::previous_index(self.playback.cursor, self.view.len()) {
            Some(index) => self.play(index),
            None => Ok(()),
        }
    }

    /// The transport finished the current song.
    pub(crate) fn on_transport_ended(&mut self) -> ActionResult {
        self.playback.state = PlayerState::Ended;

        if self.playback.repeat && self.now_playing.is_some() {
            debug!("Repeating song");
            self.playback.position = Some(0.0);
            self.playback.state = PlayerState::Loading;
            if let Err(e) = self.transport.restart() {
                return Err(self.transport_failed(e));
            }
            return Ok(());
        }

        self.next()
    }

    pub(crate) fn seek(&mut self, fraction: f64) -> ActionResult {
        let Some(position) = playback::seek_position(fraction, self.playback.duration) else {
            return Ok(());
        };

        if let Err(e) = self.transport.seek_to(position) {
            return Err(self.transport_failed(e));
        }
        self.playback.position = Some(position);

        Ok(())
    }

    pub(crate) fn set_volume(&mut self, level: u8) -> ActionResult {
        let level = level.min(100);
        self.playback.volume = level;
        self.transport
            .set_volume(level)
            .map_err(|e| ControllerError::Transport(format!("{:#}", e)))
    }

    pub(crate) fn toggle_shuffle(&mut self) {
        self.playback.shuffle = !self.playback.shuffle;
        let message = if self.playback.shuffle {
            "Shuffle enabled"
        } else {
            "Shuffle disabled"
        };
        self.notifications.push(Level::Success, message);
    }

    pub(crate) fn toggle_repeat(&mut self) {
        self.playback.repeat = !self.playback.repeat;
        let message = if self.playback.repeat {
            "Repeat enabled"
        } else {
            "Repeat disabled"
        };
        self.notifications.push(Level::Success, message);
    }

    // Mutations

    pub(crate) fn upload(
        &mut self,
        files: Vec<PathBuf>,
        playlist: Option<PlaylistId>,
    ) -> ActionResult {
        if files.is_empty() {
            return Err(ControllerError::NoFilesSelected);
        }

        info!(count = files.len(), ?playlist, "Starting upload");
        self.upload_progress = Some((0, files.len()));
        self.send_task(AppTask::Upload { files, playlist })
    }

    pub(crate) fn create_playlist(&mut self, name: &str, description: &str) -> ActionResult {
        let name = name.trim();
        if name.is_empty() {
            return Err(ControllerError::EmptyPlaylistName);
        }

        self.send_task(AppTask::CreatePlaylist {
            name: name.to_string(),
            description: description.trim().to_string(),
        })
    }

    pub(crate) fn add_song_to_playlist(
        &mut self,
        playlist: Option<PlaylistId>,
        song: SongId,
    ) -> ActionResult {
        let playlist = playlist.ok_or(ControllerError::NoPlaylistSelected)?;
        self.send_task(AppTask::AddSongToPlaylist(playlist, song))
    }

    pub(crate) fn remove_song_from_playlist(&mut self, playlist: PlaylistId, song: SongId) {
        self.pending = Some(PendingConfirmation::RemoveFromPlaylist { playlist, song });
    }

    pub(crate) fn delete_song(&mut self, id: SongId) {
        self.pending = Some(PendingConfirmation::DeleteSong(id));
    }

    pub(crate) fn delete_playlist(&mut self, id: PlaylistId) {
        let name = self
            .playlist_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string());
        self.pending = Some(PendingConfirmation::DeletePlaylist { id, name });
    }

    pub(crate) fn confirm(&mut self) -> ActionResult {
        match self.pending.take() {
            Some(pending) => {
                debug!(?pending, "Confirmed");
                self.send_task(pending.into_task())
            }
            None => Ok(()),
        }
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(?pending, "Cancelled");
        }
    }

    // Results from the task worker

    pub(crate) fn on_library_event(&mut self, event: LibraryEvent) -> anyhow::Result<()> {
        let result = match event {
            LibraryEvent::StatsLoaded(stats) => {
                self.stats = stats;
                Ok(())
            }
            LibraryEvent::PlaylistsLoaded(playlists) => {
                self.playlists = playlists;
                Ok(())
            }
            LibraryEvent::SongsLoaded(songs) => {
                self.library = songs;
                Ok(())
            }
            LibraryEvent::ViewLoaded {
                target,
                generation,
                songs,
            } => {
                self.on_view_loaded(target, generation, songs);
                Ok(())
            }
            LibraryEvent::PlaylistCreated { id, name } => {
                debug!(playlist_id = %id, "Playlist created");
                self.notifications.push(
                    Level::Success,
                    format!("Playlist \"{}\" created successfully", name),
                );
                self.refresh()
            }
            LibraryEvent::SongAddedToPlaylist {
                playlist_id,
                song_id,
            } => {
                debug!(%playlist_id, %song_id, "Song added to playlist");
                let name = self.playlist_name(playlist_id).unwrap_or("playlist");
                let message = format!("Song added to \"{}\"", name);
                self.notifications.push(Level::Success, message);
                self.refresh()
            }
            LibraryEvent::SongRemovedFromPlaylist {
                playlist_id,
                song_id,
            } => {
                debug!(%playlist_id, %song_id, "Song removed from playlist");
                self.notifications
                    .push(Level::Success, "Song removed from playlist");
                self.refresh()
            }
            LibraryEvent::SongDeleted(id) => self.on_song_deleted(id),
            LibraryEvent::PlaylistDeleted(id) => self.on_playlist_deleted(id),
            LibraryEvent::UploadProgress { completed, total } => {
                self.upload_progress = Some((completed, total));
                Ok(())
            }
            LibraryEvent::UploadFinished(summary) => self.on_upload_finished(&summary),
            LibraryEvent::Failed { operation, message } => {
                self.on_request_failed(operation, message);
                Ok(())
            }
        };

        self.report(result)
    }

    fn on_view_loaded(&mut self, target: ViewTarget, generation: u64, songs: Vec<Song>) {
        if !self.view.accept(generation, songs) {
            debug!(
                ?target,
                generation,
                current = self.view.generation(),
                "Discarding stale view"
            );
            return;
        }

        self.revalidate_cursor();
    }

    /// Re-points the cursor at the now-playing song in the replaced view, or
    /// clears it when the song is not part of the view.
    fn revalidate_cursor(&mut self) {
        let position = self
            .now_playing
            .as_ref()
            .and_then(|song| self.view.position_of(song.id));

        if let Some(index) = position {
            self.now_playing = self.view.get(index).cloned();
        }
        if position != self.playback.cursor {
            debug!(from = ?self.playback.cursor, to = ?position, "Cursor moved");
        }
        self.playback.cursor = position;
    }

    fn on_song_deleted(&mut self, id: SongId) -> ActionResult {
        if self.now_playing.as_ref().is_some_and(|s| s.id == id) {
            if let Err(e) = self.transport.stop() {
                warn!(error = %format!("{:#}", e), "Failed to stop playback");
            }
            self.now_playing = None;
            self.playback.cursor = None;
            self.playback.state = PlayerState::Stopped;
            self.playback.clear_timing();
        }

        self.notifications
            .push(Level::Success, "Song deleted successfully");
        self.refresh()
    }

    fn on_playlist_deleted(&mut self, id: PlaylistId) -> ActionResult {
        let name = self
            .playlist_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string());

        if self.browse_target == ViewTarget::Playlist(id) {
            self.browse_target = ViewTarget::All;
        }
        if self.view.target() == &ViewTarget::Playlist(id) {
            self.view.begin_switch(ViewTarget::All);
        }

        self.notifications
            .push(Level::Success, format!("Playlist \"{}\" deleted", name));
        self.refresh()
    }

    fn on_upload_finished(&mut self, summary: &UploadSummary) -> ActionResult {
        self.upload_progress = None;

        let (level, message) = notify::upload_outcome(summary);
        self.notifications.push(level, message);

        if summary.uploaded > 0 {
            self.refresh()
        } else {
            Ok(())
        }
    }

    fn on_request_failed(&mut self, operation: Operation, message: String) {
        if operation.is_quiet() {
            return;
        }
        error!(?operation, %message, "Request failed");
        self.notifications.push(Level::Error, message);
    }

    // Reports from the transport

    pub(crate) fn on_player_state(&mut self, state: PlayerState) {
        // MPV goes idle between unloading one file and starting the next.
        if self.playback.state == PlayerState::Loading && state == PlayerState::Stopped {
            return;
        }
        self.playback.state = state;
    }

    pub(crate) fn on_duration(&mut self, seconds: f64) {
        self.playback.duration = Some(seconds).filter(|d| d.is_finite() && *d > 0.0);
    }

    pub(crate) fn on_time(&mut self, seconds: f64) {
        self.playback.position = Some(seconds);
    }

    pub(crate) fn on_track_finished(&mut self) -> anyhow::Result<()> {
        let result = self.on_transport_ended();
        self.report(result)
    }

    pub(crate) fn on_transport_error(&mut self, message: &str) {
        error!(%message, "Playback error");
        self.playback.state = PlayerState::Stopped;
        self.notifications
            .push(Level::Error, "Error playing audio file");
    }

    pub(crate) fn on_tick(&mut self, now: Instant) {
        self.notifications.expire(now);
    }

    /// Shows a message that did not come from a controller operation, such as
    /// a command line that failed to parse.
    pub(crate) fn notify(&mut self, level: Level, message: impl Into<String>) {
        self.notifications.push(level, message);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        rc::Rc,
        sync::mpsc::{self, Receiver},
    };

    use super::*;
    use crate::tasks::tests::song;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load(String),
        Pause,
        Resume,
        Restart,
        Stop,
        SeekTo(f64),
        SetVolume(u8),
    }

    #[derive(Default, Clone)]
    struct FakeTransport {
        calls: Rc<RefCell<Vec<Call>>>,
        fail_loads: Rc<RefCell<bool>>,
    }

    impl FakeTransport {
        fn record(&self, call: Call) -> anyhow::Result<()> {
            self.calls.borrow_mut().push(call);
            Ok(())
        }
    }

    impl Transport for FakeTransport {
        fn load(&self, url: &str) -> anyhow::Result<()> {
            if *self.fail_loads.borrow() {
                anyhow::bail!("no audio output");
            }
            self.record(Call::Load(url.to_string()))
        }

        fn pause(&self) -> anyhow::Result<()> {
            self.record(Call::Pause)
        }

        fn resume(&self) -> anyhow::Result<()> {
            self.record(Call::Resume)
        }

        fn restart(&self) -> anyhow::Result<()> {
            self.record(Call::Restart)
        }

        fn stop(&self) -> anyhow::Result<()> {
            self.record(Call::Stop)
        }

        fn seek_to(&self, seconds: f64) -> anyhow::Result<()> {
            self.record(Call::SeekTo(seconds))
        }

        fn set_volume(&self, level: u8) -> anyhow::Result<()> {
            self.record(Call::SetVolume(level))
        }
    }

    struct Harness {
        controller: LibraryController<FakeTransport>,
        transport: FakeTransport,
        task_rx: Receiver<AppTask>,
    }

    impl Harness {
        fn new() -> Self {
            let transport = FakeTransport::default();
            let (task_tx, task_rx) = mpsc::channel();
            let endpoints = Endpoints::new("http://music.local:5000").unwrap();
            let controller = LibraryController::new(
                transport.clone(),
                task_tx,
                endpoints,
                80,
                SortField::Title,
            );

            Self {
                controller,
                transport,
                task_rx,
            }
        }

        /// A harness whose All Songs view holds `count` songs, ids `1..=count`.
        fn with_songs(count: i64) -> Self {
            let mut harness = Self::new();
            let songs = (1..=count).map(|i| song(i, &format!("Song {}", i))).collect();
            harness.deliver_view(songs);
            harness
        }

        fn deliver_view(&mut self, songs: Vec<Song>) {
            let event = LibraryEvent::ViewLoaded {
                target: self.controller.view().target().clone(),
                generation: self.controller.view().generation(),
                songs,
            };
            self.controller.on_library_event(event).unwrap();
        }

        fn dispatch(&mut self, action: Action) {
            self.controller.dispatch(action).unwrap();
        }

        fn calls(&self) -> Vec<Call> {
            self.transport.calls.borrow_mut().drain(..).collect()
        }

        fn tasks(&self) -> Vec<AppTask> {
            self.task_rx.try_iter().collect()
        }

        fn notification(&self) -> Option<(Level, String)> {
            self.controller
                .notification()
                .map(|n| (n.level, n.message.clone()))
        }

        fn loaded_song(&self) -> Option<i64> {
            self.transport
                .calls
                .borrow()
                .iter()
                .rev()
                .find_map(|c| match c {
                    Call::Load(url) => url
                        .trim_end_matches("/play")
                        .rsplit('/')
                        .next()
                        .and_then(|id| id.parse().ok()),
                    _ => None,
                })
        }
    }

    #[test]
    fn play_loads_stream_and_counts_play() {
        let mut h = Harness::with_songs(3);

        h.dispatch(Action::Play(1));

        assert_eq!(
            h.calls(),
            vec![Call::Load("http://music.local:5000/api/songs/2/play".into())]
        );
        assert_eq!(h.tasks(), vec![AppTask::IncrementPlayCount(SongId(2))]);
        assert_eq!(h.controller.playback().cursor, Some(1));
        assert_eq!(h.controller.playback().state, PlayerState::Loading);
        assert!(!h.controller.playback().is_playing());

        h.controller.on_player_state(PlayerState::Playing);
        assert!(h.controller.playback().is_playing());
        assert_eq!(h.controller.now_playing().map(|s| s.id), Some(SongId(2)));
    }

    #[test]
    fn play_rejects_out_of_range_index() {
        let mut h = Harness::with_songs(2);

        h.dispatch(Action::Play(2));

        assert!(h.calls().is_empty());
        assert!(h.tasks().is_empty());
        assert_eq!(h.controller.playback().cursor, None);
        assert_eq!(
            h.notification().map(|n| n.0),
            Some(Level::Error),
        );
    }

    #[test]
    fn play_on_empty_view_is_an_error() {
        let mut h = Harness::new();

        h.dispatch(Action::Play(0));

        assert_eq!(
            h.notification(),
            Some((Level::Error, "No songs to play".to_string()))
        );
    }

    #[test]
    fn failed_load_returns_to_stopped() {
        let mut h = Harness::with_songs(1);
        *h.transport.fail_loads.borrow_mut() = true;

        h.dispatch(Action::Play(0));

        assert_eq!(h.controller.playback().state, PlayerState::Stopped);
        assert!(h.tasks().is_empty());
        let (level, message) = h.notification().unwrap();
        assert_eq!(level, Level::Error);
        assert!(message.contains("no audio output"));
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut h = Harness::with_songs(3);

        h.dispatch(Action::Play(2));
        h.dispatch(Action::Next);
        assert_eq!(h.controller.playback().cursor, Some(0));

        h.dispatch(Action::Previous);
        assert_eq!(h.controller.playback().cursor, Some(2));
        assert_eq!(h.loaded_song(), Some(3));
    }

    #[test]
    fn next_and_previous_without_cursor() {
        let mut h = Harness::with_songs(4);
        h.dispatch(Action::Next);
        assert_eq!(h.controller.playback().cursor, Some(0));

        let mut h = Harness::with_songs(4);
        h.dispatch(Action::Previous);
        assert_eq!(h.controller.playback().cursor, Some(3));
    }

    #[test]
    fn navigation_on_empty_view_does_nothing() {
        let mut h = Harness::new();

        h.dispatch(Action::Next);
        h.dispatch(Action::Previous);
        h.dispatch(Action::TogglePlayPause);

        assert!(h.calls().is_empty());
        assert!(h.controller.notification().is_none());
    }

    #[test]
    fn shuffle_picks_within_view() {
        let mut h = Harness::with_songs(5);
        h.dispatch(Action::ToggleShuffle);
        assert_eq!(
            h.notification(),
            Some((Level::Success, "Shuffle enabled".to_string()))
        );

        for _ in 0..50 {
            h.dispatch(Action::Next);
            let cursor = h.controller.playback().cursor.unwrap();
            assert!(cursor < 5);
        }

        h.dispatch(Action::ToggleShuffle);
        assert_eq!(
            h.notification(),
            Some((Level::Success, "Shuffle disabled".to_string()))
        );
    }

    #[test]
    fn end_of_song_advances_without_repeat() {
        let mut h = Harness::with_songs(3);
        h.dispatch(Action::Play(0));
        h.controller.on_player_state(PlayerState::Playing);
        h.calls();
        h.tasks();

        h.controller.on_track_finished().unwrap();

        assert_eq!(h.controller.playback().cursor, Some(1));
        assert_eq!(h.loaded_song(), Some(2));
        assert_eq!(h.tasks(), vec![AppTask::IncrementPlayCount(SongId(2))]);
    }

    #[test]
    fn end_of_song_restarts_with_repeat() {
        let mut h = Harness::with_songs(3);
        h.dispatch(Action::ToggleRepeat);
        h.dispatch(Action::Play(1));
        h.controller.on_time(200.0);
        h.calls();
        h.tasks();

        h.controller.on_track_finished().unwrap();

        assert_eq!(h.calls(), vec![Call::Restart]);
        assert!(h.tasks().is_empty());
        assert_eq!(h.controller.playback().cursor, Some(1));
        assert_eq!(h.controller.playback().position, Some(0.0));
    }

    #[test]
    fn loading_ignores_idle_report() {
        let mut h = Harness::with_songs(2);
        h.dispatch(Action::Play(0));

        h.controller.on_player_state(PlayerState::Stopped);
        assert_eq!(h.controller.playback().state, PlayerState::Loading);

        h.controller.on_player_state(PlayerState::Playing);
        h.controller.on_player_state(PlayerState::Paused);
        assert_eq!(h.controller.playback().state, PlayerState::Paused);
    }

    #[test]
    fn transport_error_stops_playback() {
        let mut h = Harness::with_songs(1);
        h.dispatch(Action::Play(0));
        h.controller.on_player_state(PlayerState::Playing);

        h.controller.on_transport_error("loading failed");

        assert_eq!(h.controller.playback().state, PlayerState::Stopped);
        assert_eq!(
            h.notification(),
            Some((Level::Error, "Error playing audio file".to_string()))
        );
    }

    #[test]
    fn toggle_play_pause_cycle() {
        let mut h = Harness::with_songs(2);

        h.dispatch(Action::TogglePlayPause);
        assert_eq!(h.loaded_song(), Some(1));
        h.controller.on_player_state(PlayerState::Playing);
        h.calls();

        h.dispatch(Action::TogglePlayPause);
        assert_eq!(h.controller.playback().state, PlayerState::Paused);

        h.dispatch(Action::TogglePlayPause);
        assert_eq!(h.controller.playback().state, PlayerState::Playing);
        assert_eq!(h.calls(), vec![Call::Pause, Call::Resume]);
    }

    #[test]
    fn seek_requires_duration() {
        let mut h = Harness::with_songs(1);
        h.dispatch(Action::Play(0));
        h.calls();

        h.dispatch(Action::Seek(0.5));
        assert!(h.calls().is_empty());

        h.controller.on_duration(200.0);
        h.dispatch(Action::Seek(0.25));
        assert_eq!(h.calls(), vec![Call::SeekTo(50.0)]);
        assert_eq!(h.controller.playback().position, Some(50.0));

        h.dispatch(Action::Seek(3.0));
        assert_eq!(h.calls(), vec![Call::SeekTo(200.0)]);
    }

    #[test]
    fn volume_is_clamped() {
        let mut h = Harness::new();

        h.dispatch(Action::AdjustVolume(30));
        assert_eq!(h.controller.playback().volume, 100);

        h.dispatch(Action::AdjustVolume(-150));
        assert_eq!(h.controller.playback().volume, 0);

        h.dispatch(Action::SetVolume(150));
        assert_eq!(h.controller.playback().volume, 100);
        assert_eq!(
            h.calls(),
            vec![Call::SetVolume(100), Call::SetVolume(0), Call::SetVolume(100)]
        );
    }

    #[test]
    fn start_applies_volume_and_refreshes() {
        let mut h = Harness::new();

        h.controller.start().unwrap();

        assert_eq!(h.calls(), vec![Call::SetVolume(80)]);
        assert_eq!(
            h.tasks(),
            vec![AppTask::Refresh {
                target: ViewTarget::All,
                generation: 0,
                sort: SortField::Title,
            }]
        );
    }

    #[test]
    fn stale_view_response_is_discarded() {
        let mut h = Harness::with_songs(2);

        h.dispatch(Action::SwitchView(ViewTarget::Playlist(PlaylistId(4))));
        h.dispatch(Action::SwitchView(ViewTarget::All));
        let tasks = h.tasks();
        assert_eq!(tasks.len(), 2);
        let stale_generation = match &tasks[0] {
            AppTask::LoadView { generation, .. } => *generation,
            other => panic!("Expected LoadView, got {:?}", other),
        };

        h.controller
            .on_library_event(LibraryEvent::ViewLoaded {
                target: ViewTarget::Playlist(PlaylistId(4)),
                generation: stale_generation,
                songs: vec![song(9, "Stale")],
            })
            .unwrap();

        assert_eq!(h.controller.view().target(), &ViewTarget::All);
        assert!(h.controller.view().position_of(SongId(9)).is_none());
    }

    #[test]
    fn switching_back_to_all_restores_library() {
        let mut h = Harness::with_songs(3);
        let library: Vec<Song> = h.controller.view().songs().to_vec();

        h.dispatch(Action::SwitchView(ViewTarget::Playlist(PlaylistId(4))));
        h.deliver_view(vec![song(2, "Song 2")]);
        assert_eq!(
            h.controller.view().target(),
            &ViewTarget::Playlist(PlaylistId(4))
        );
        assert_eq!(h.controller.view().len(), 1);

        h.dispatch(Action::SwitchView(ViewTarget::All));
        h.deliver_view(library.clone());

        assert_eq!(h.controller.view().target(), &ViewTarget::All);
        assert_eq!(h.controller.view().songs(), library.as_slice());
        assert!(h.controller.view().is_loaded());
    }

    #[test]
    fn cursor_follows_now_playing_song() {
        let mut h = Harness::with_songs(3);
        h.dispatch(Action::Play(1));

        h.dispatch(Action::SwitchView(ViewTarget::Playlist(PlaylistId(1))));
        h.deliver_view(vec![song(2, "Song 2"), song(7, "Other")]);
        assert_eq!(h.controller.playback().cursor, Some(0));

        h.dispatch(Action::Next);
        assert_eq!(h.loaded_song(), Some(7));
    }

    #[test]
    fn cursor_cleared_when_song_leaves_view() {
        let mut h = Harness::with_songs(3);
        h.dispatch(Action::Play(2));

        h.dispatch(Action::Search("zzz".into()));
        h.deliver_view(vec![song(1, "Song 1")]);

        assert_eq!(h.controller.playback().cursor, None);
        assert_eq!(h.controller.now_playing().map(|s| s.id), Some(SongId(3)));
    }

    #[test]
    fn blank_search_returns_to_browse_target() {
        let mut h = Harness::new();
        h.dispatch(Action::SwitchView(ViewTarget::Playlist(PlaylistId(2))));
        h.dispatch(Action::Search("  rock ".into()));
        h.dispatch(Action::Search("   ".into()));

        let targets: Vec<ViewTarget> = h
            .tasks()
            .into_iter()
            .filter_map(|t| match t {
                AppTask::LoadView { target, .. } => Some(target),
                _ => None,
            })
            .collect();

        assert_eq!(
            targets,
            vec![
                ViewTarget::Playlist(PlaylistId(2)),
                ViewTarget::Search("rock".into()),
                ViewTarget::Playlist(PlaylistId(2)),
            ]
        );
    }

    #[test]
    fn delete_song_waits_for_confirmation() {
        let mut h = Harness::with_songs(2);

        h.dispatch(Action::DeleteSong(SongId(1)));
        assert!(h.tasks().is_empty());
        assert_eq!(
            h.controller.pending().map(|p| p.prompt()),
            Some(
                "Are you sure you want to delete this song? This action cannot be undone."
                    .to_string()
            )
        );

        h.dispatch(Action::Play(0));
        assert!(h.calls().is_empty());

        h.dispatch(Action::Confirm);
        assert_eq!(h.tasks(), vec![AppTask::DeleteSong(SongId(1))]);
        assert!(h.controller.pending().is_none());
    }

    #[test]
    fn cancelled_confirmation_sends_nothing() {
        let mut h = Harness::with_songs(1);

        h.dispatch(Action::RemoveSongFromPlaylist {
            playlist: PlaylistId(1),
            song: SongId(1),
        });
        h.dispatch(Action::Cancel);
        h.dispatch(Action::Confirm);

        assert!(h.tasks().is_empty());
    }

    #[test]
    fn deleting_now_playing_song_stops_transport() {
        let mut h = Harness::with_songs(2);
        h.dispatch(Action::Play(0));
        h.controller.on_player_state(PlayerState::Playing);
        h.calls();
        h.tasks();

        h.controller
            .on_library_event(LibraryEvent::SongDeleted(SongId(1)))
            .unwrap();

        assert_eq!(h.calls(), vec![Call::Stop]);
        assert!(h.controller.now_playing().is_none());
        assert_eq!(h.controller.playback().cursor, None);
        assert_eq!(h.controller.playback().state, PlayerState::Stopped);
        assert!(matches!(h.tasks()[..], [AppTask::Refresh { .. }]));
    }

    #[test]
    fn deleting_other_song_leaves_playback_alone() {
        let mut h = Harness::with_songs(2);
        h.dispatch(Action::Play(0));
        h.controller.on_player_state(PlayerState::Playing);
        h.calls();

        h.controller
            .on_library_event(LibraryEvent::SongDeleted(SongId(2)))
            .unwrap();

        assert!(h.calls().is_empty());
        assert!(h.controller.playback().is_playing());
        assert_eq!(
            h.notification(),
            Some((Level::Success, "Song deleted successfully".to_string()))
        );
    }

    #[test]
    fn deleting_active_playlist_switches_to_all() {
        let mut h = Harness::new();
        h.controller
            .on_library_event(LibraryEvent::PlaylistsLoaded(vec![Playlist {
                id: PlaylistId(3),
                name: "Road Trip".into(),
                description: None,
                song_count: 2,
            }]))
            .unwrap();
        h.dispatch(Action::SwitchView(ViewTarget::Playlist(PlaylistId(3))));
        h.dispatch(Action::DeletePlaylist(PlaylistId(3)));
        assert_eq!(
            h.controller.pending().map(|p| p.prompt()),
            Some(
                "Delete playlist \"Road Trip\"? Songs will not be deleted from the library."
                    .to_string()
            )
        );
        h.dispatch(Action::Confirm);
        h.tasks();

        h.controller
            .on_library_event(LibraryEvent::PlaylistDeleted(PlaylistId(3)))
            .unwrap();

        assert_eq!(h.controller.view().target(), &ViewTarget::All);
        match &h.tasks()[..] {
            [AppTask::Refresh { target, .. }] => assert_eq!(target, &ViewTarget::All),
            other => panic!("Expected a refresh, got {:?}", other),
        }
        assert_eq!(
            h.notification(),
            Some((Level::Success, "Playlist \"Road Trip\" deleted".to_string()))
        );
    }

    #[test]
    fn blank_playlist_name_is_rejected() {
        let mut h = Harness::new();

        h.dispatch(Action::CreatePlaylist {
            name: "   ".into(),
            description: String::new(),
        });

        assert!(h.tasks().is_empty());
        assert_eq!(
            h.notification(),
            Some((Level::Error, "Please enter a playlist name".to_string()))
        );
    }

    #[test]
    fn created_playlist_refreshes_and_notifies() {
        let mut h = Harness::new();
        h.dispatch(Action::CreatePlaylist {
            name: " Chill ".into(),
            description: " evenings ".into(),
        });
        assert_eq!(
            h.tasks(),
            vec![AppTask::CreatePlaylist {
                name: "Chill".into(),
                description: "evenings".into(),
            }]
        );

        h.controller
            .on_library_event(LibraryEvent::PlaylistCreated {
                id: PlaylistId(5),
                name: "Chill".into(),
            })
            .unwrap();

        assert_eq!(
            h.notification(),
            Some((
                Level::Success,
                "Playlist \"Chill\" created successfully".to_string()
            ))
        );
        assert!(matches!(h.tasks()[..], [AppTask::Refresh { .. }]));
    }

    #[test]
    fn add_to_playlist_needs_a_playlist() {
        let mut h = Harness::new();

        h.dispatch(Action::AddSongToPlaylist {
            playlist: None,
            song: SongId(1),
        });

        assert!(h.tasks().is_empty());
        assert_eq!(
            h.notification(),
            Some((Level::Error, "Please select a playlist".to_string()))
        );
    }

    #[test]
    fn empty_upload_is_rejected() {
        let mut h = Harness::new();

        h.dispatch(Action::Upload {
            files: vec![],
            playlist: None,
        });

        assert!(h.tasks().is_empty());
        assert_eq!(
            h.notification(),
            Some((Level::Error, "Please select at least one file".to_string()))
        );
    }

    #[test]
    fn upload_progress_and_summary() {
        let mut h = Harness::new();
        h.dispatch(Action::Upload {
            files: vec![PathBuf::from("a.mp3"), PathBuf::from("b.mp3")],
            playlist: None,
        });
        h.tasks();

        h.controller
            .on_library_event(LibraryEvent::UploadProgress {
                completed: 1,
                total: 2,
            })
            .unwrap();
        assert_eq!(h.controller.upload_progress(), Some((1, 2)));

        h.controller
            .on_library_event(LibraryEvent::UploadFinished(UploadSummary {
                uploaded: 1,
                total: 2,
                errors: vec!["b.mp3: Invalid file type".into()],
            }))
            .unwrap();

        assert_eq!(h.controller.upload_progress(), None);
        assert_eq!(
            h.notification(),
            Some((
                Level::Warning,
                "Uploaded 1/2 files. Errors: b.mp3: Invalid file type".to_string()
            ))
        );
        assert!(matches!(h.tasks()[..], [AppTask::Refresh { .. }]));
    }

    #[test]
    fn service_errors_are_shown_verbatim() {
        let mut h = Harness::new();

        h.controller
            .on_library_event(LibraryEvent::Failed {
                operation: Operation::AddToPlaylist,
                message: "Song already in playlist".into(),
            })
            .unwrap();
        assert_eq!(
            h.notification(),
            Some((Level::Error, "Song already in playlist".to_string()))
        );
    }

    #[test]
    fn stats_failure_is_quiet() {
        let mut h = Harness::new();

        h.controller
            .on_library_event(LibraryEvent::Failed {
                operation: Operation::LoadStats,
                message: "Failed to load library statistics".into(),
            })
            .unwrap();

        assert!(h.controller.notification().is_none());
    }

    #[test]
    fn lost_worker_is_fatal() {
        let mut h = Harness::new();
        h.task_rx = mpsc::channel().1;

        assert!(h.controller.dispatch(Action::Refresh).is_err());
    }

    #[test]
    fn find_playlist_by_name_or_id() {
        let mut h = Harness::new();
        h.controller
            .on_library_event(LibraryEvent::PlaylistsLoaded(vec![Playlist {
                id: PlaylistId(12),
                name: "Focus".into(),
                description: None,
                song_count: 0,
            }]))
            .unwrap();

        assert_eq!(h.controller.find_playlist("focus"), Some(PlaylistId(12)));
        assert_eq!(h.controller.find_playlist("12"), Some(PlaylistId(12)));
        assert_eq!(h.controller.find_playlist("Sleep"), None);
    }
}

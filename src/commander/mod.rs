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

//! Command-line input logic and state management.
//!
//! This module implements the `:` command line: a text input component that
//! parses the line when it is submitted and dispatches a corresponding
//! application [`Command`] event.
//!
//! | Command | Effect |
//! |---|---|
//! | `q` | quit |
//! | `find <text>` | search the library; `find` alone clears the search |
//! | `all` | show all songs |
//! | `pl <playlist>` | open a playlist by name or id |
//! | `new <name> [| description]` | create a playlist |
//! | `add <playlist>` | add the selected song to a playlist |
//! | `up <path>...` | upload files or directories |
//! | `upto <playlist> \| <path> [\| <path>...]` | upload, then add to a playlist |
//!
//! `up` also accepts `|`-separated paths, for paths containing spaces.
//! | `sort [field]` | set, or cycle, the sort field |
//! | `vol <0-100>` | set the volume |
//! | `refresh` | reload everything |
//! | `rmpl <playlist>` | delete a playlist |

use std::{path::PathBuf, sync::mpsc::Sender};

use crossterm::event::{Event, KeyCode};
use tracing::debug;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{events::AppEvent, model::SortField};

/// A parsed command line. Playlists are still named as the user typed them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Quit,
    Find(String),
    All,
    OpenPlaylist(String),
    New { name: String, description: String },
    Add(String),
    Upload(Vec<PathBuf>),
    UploadTo { playlist: String, files: Vec<PathBuf> },
    Sort(Option<SortField>),
    Volume(u8),
    Refresh,
    DeletePlaylist(String),
}

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Opens the command line with `prefix` already typed.
    pub(crate) fn open_with(&mut self, prefix: &str) {
        self.input = Input::new(prefix.to_string());
        self.active = true;
    }

    /// Offers a terminal event to the command line, returning `true` if it
    /// was consumed.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> bool {
        let Event::Key(key_event) = event else {
            return false;
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.open_with("");
                return true;
            }
            return false;
        }

        match key_event.code {
            KeyCode::Esc => {
                self.close();
            }
            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                self.close();
                if !buffer.is_empty() {
                    debug!(%buffer, "Command submitted");
                    let event = match parse_command(&buffer) {
                        Ok(command) => AppEvent::Command(command),
                        Err(message) => AppEvent::Error(message),
                    };
                    event_tx.send(event).ok();
                }
            }
            _ => {
                // Delegate everything else to the managed input component.
                self.input.handle_event(event);
            }
        }

        true
    }

    fn close(&mut self) {
        self.active = false;
        self.input.reset();
    }
}

/// Parses one submitted command line.
pub(crate) fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let rest = |n: usize| parts[n..].join(" ");

    let command = match parts.as_slice() {
        ["q"] | ["quit"] => Command::Quit,

        ["find" | "f", ..] => Command::Find(rest(1)),
        ["all"] => Command::All,
        ["pl", _, ..] => Command::OpenPlaylist(rest(1)),

        ["new", ..] => {
            let text = rest(1);
            let (name, description) = match text.split_once('|') {
                Some((name, description)) => (name.trim(), description.trim()),
                None => (text.trim(), ""),
            };
            Command::New {
                name: name.to_string(),
                description: description.to_string(),
            }
        }

        ["add", _, ..] => Command::Add(rest(1)),

        ["up", ..] => Command::Upload(split_paths(arguments(line))),
        ["upto", _, ..] => {
            let Some((playlist, files)) = arguments(line).split_once('|') else {
                return Err("Usage: upto <playlist> | <path>".to_string());
            };
            let playlist = playlist.trim();
            if playlist.is_empty() {
                return Err("Missing playlist name: upto".to_string());
            }
            Command::UploadTo {
                playlist: playlist.to_string(),
                files: files
                    .split('|')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(PathBuf::from)
                    .collect(),
            }
        }

        ["sort"] => Command::Sort(None),
        ["sort", field] => match SortField::parse(field) {
            Some(field) => Command::Sort(Some(field)),
            None => return Err(format!("Unknown sort field: {}", field)),
        },

        ["vol", level] => match level.parse::<u8>() {
            Ok(level) => Command::Volume(level.min(100)),
            Err(_) => return Err(format!("Invalid volume: {}", level)),
        },

        ["refresh"] => Command::Refresh,
        ["rmpl", _, ..] => Command::DeletePlaylist(rest(1)),

        [cmd @ ("pl" | "add" | "upto" | "rmpl")] => {
            return Err(format!("Missing playlist name: {}", cmd));
        }
        [cmd, ..] => return Err(format!("Unknown command: {}", cmd)),
        [] => return Err("Empty command".to_string()),
    };

    Ok(command)
}

/// Everything after the command word, as typed.
fn arguments(line: &str) -> &str {
    line.trim()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or("")
}

/// Paths separated by `|`, or by whitespace when there is no `|`.
fn split_paths(text: &str) -> Vec<PathBuf> {
    if text.contains('|') {
        text.split('|')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect()
    } else {
        text.split_whitespace().map(PathBuf::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn parses_playlist_commands() {
        assert_eq!(
            parse_command("new Road Trip | summer 2025"),
            Ok(Command::New {
                name: "Road Trip".into(),
                description: "summer 2025".into()
            })
        );
        assert_eq!(
            parse_command("new Focus"),
            Ok(Command::New {
                name: "Focus".into(),
                description: String::new()
            })
        );
        assert_eq!(
            parse_command("pl Road Trip"),
            Ok(Command::OpenPlaylist("Road Trip".into()))
        );
        assert_eq!(parse_command("add 7"), Ok(Command::Add("7".into())));
    }

    #[test]
    fn blank_name_still_parses() {
        // The controller owns the "Please enter a playlist name" check.
        assert_eq!(
            parse_command("new"),
            Ok(Command::New {
                name: String::new(),
                description: String::new()
            })
        );
    }

    #[test]
    fn parses_uploads() {
        assert_eq!(
            parse_command("up a.mp3 music/"),
            Ok(Command::Upload(vec!["a.mp3".into(), "music/".into()]))
        );
        assert_eq!(parse_command("up"), Ok(Command::Upload(Vec::new())));
        assert_eq!(
            parse_command("upto Focus | b.flac"),
            Ok(Command::UploadTo {
                playlist: "Focus".into(),
                files: vec!["b.flac".into()]
            })
        );
    }

    #[test]
    fn upload_to_accepts_spaced_names_and_paths() {
        assert_eq!(
            parse_command("upto Road Trip | ~/Music/Summer  Mix | b.flac"),
            Ok(Command::UploadTo {
                playlist: "Road Trip".into(),
                files: vec!["~/Music/Summer  Mix".into(), "b.flac".into()]
            })
        );
        assert_eq!(
            parse_command("up ~/Music/Old Songs | c.mp3"),
            Ok(Command::Upload(vec!["~/Music/Old Songs".into(), "c.mp3".into()]))
        );
        assert_eq!(
            parse_command("upto Focus b.flac"),
            Err("Usage: upto <playlist> | <path>".into())
        );
        assert_eq!(
            parse_command("upto | b.flac"),
            Err("Missing playlist name: upto".into())
        );
    }

    #[test]
    fn search_joins_words() {
        assert_eq!(
            parse_command("find  daft   punk"),
            Ok(Command::Find("daft punk".into()))
        );
        assert_eq!(parse_command("find"), Ok(Command::Find(String::new())));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(
            parse_command("sort colour"),
            Err("Unknown sort field: colour".into())
        );
        assert_eq!(parse_command("vol loud"), Err("Invalid volume: loud".into()));
        assert_eq!(parse_command("vol 300"), Err("Invalid volume: 300".into()));
        assert_eq!(parse_command("vol 120"), Ok(Command::Volume(100)));
        assert_eq!(parse_command("dance"), Err("Unknown command: dance".into()));
        assert_eq!(parse_command("pl"), Err("Missing playlist name: pl".into()));
    }

    #[test]
    fn submitted_line_becomes_command_event() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        assert!(!commander.handle_event(&key(KeyCode::Char('q')), &tx));
        assert!(commander.handle_event(&key(KeyCode::Char(':')), &tx));
        assert!(commander.active());

        commander.handle_event(&key(KeyCode::Char('q')), &tx);
        commander.handle_event(&key(KeyCode::Enter), &tx);

        assert!(!commander.active());
        assert!(matches!(rx.try_recv(), Ok(AppEvent::Command(Command::Quit))));
    }

    #[test]
    fn escape_discards_line() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();
        commander.open_with("find ");

        commander.handle_event(&key(KeyCode::Esc), &tx);

        assert!(!commander.active());
        assert_eq!(commander.input.value(), "");
        assert!(rx.try_recv().is_err());
    }
}

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

//! # tunedeck
//!
//! A terminal client for a self-hosted music library.
//!
//! The library itself lives in a separate REST service; this application
//! browses it, manages playlists and uploads, and plays songs by streaming
//! them into an embedded mpv instance.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** owns the [`LibraryController`], manages the terminal
//!   lifecycle and renders the UI.
//! * A **Task Worker** performs the blocking service requests, one at a time,
//!   and reports the results back as events.
//! * The **Audio Worker** drives mpv and reports what it is doing.
//! * **Input and Tick Threads** capture user input and periodic ticks to
//!   drive the UI state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod actions;
mod cli;
mod commander;
mod components;
mod config;
mod controller;
mod events;
mod logging;
mod model;
mod player;
mod render;
mod service;
mod tasks;
mod theme;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::{
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};
use tracing::{error, info};

use crate::{
    cli::Args,
    commander::Commander,
    components::{SidebarState, SongTableState},
    config::AppConfig,
    controller::{Level, LibraryController},
    events::{AppEvent, process_events},
    player::AudioPlayer,
    service::{Endpoints, HttpLibraryService},
    tasks::AppTask,
    theme::Theme,
};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

const WELCOME: &str = "Music Library Ready! Upload songs to get started.";

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Sidebar,
    Songs,
}

impl Focus {
    fn toggle(self) -> Self {
        match self {
            Focus::Sidebar => Focus::Songs,
            Focus::Songs => Focus::Sidebar,
        }
    }
}

/// Application state.
struct App {
    pub theme: Theme,
    pub focus: Focus,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub controller: LibraryController<AudioPlayer>,

    pub commander: Commander,
    pub song_table: SongTableState,
    pub sidebar: SidebarState,

    /// Where the progress gauge was last drawn, for click-to-seek.
    pub progress_area: Option<Rect>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: &AppConfig, endpoints: Endpoints, task_tx: Sender<AppTask>) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let audio_player = AudioPlayer::new(event_tx.clone())?;
        let controller = LibraryController::new(
            audio_player,
            task_tx,
            endpoints,
            config.initial_volume,
            config.sort_field(),
        );

        Ok(Self {
            theme: Theme::default(),
            focus: Focus::Songs,
            event_tx,
            event_rx,
            controller,
            commander: Commander::new(),
            song_table: SongTableState::new(),
            sidebar: SidebarState::new(),
            progress_area: None,
        })
    }
}

/// The entry point of the application.
///
/// Loads the configuration, sets up logging and the communication channels,
/// initializes the application state, manages the terminal lifecycle, and
/// returns an error if any part of the execution fails.
fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = config::load_config()?;
    args.apply(&mut config);

    if args.print_config {
        let text = toml::to_string(&config).context("Failed to serialise configuration")?;
        print!("{}", text);
        return Ok(());
    }

    let log_dir = match &args.log_dir {
        Some(dir) => dir.clone(),
        None => config::config_dir()?.join("logs"),
    };
    let _log_guard = logging::init_logging(&log_dir)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        server = %config.server_url,
        "Starting"
    );

    let endpoints = Endpoints::new(&config.server_url).context("Invalid server URL")?;
    let service = HttpLibraryService::new(endpoints.clone(), config.request_timeout())
        .context("Failed to create library service client")?;

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(&config, endpoints, task_tx).context("Failed to initialise application")?;

    tasks::spawn_task_worker(Box::new(service), task_rx, app.event_tx.clone());

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    if let Err(e) = &res {
        error!(error = %format!("{:#}", e), "Application error");
    }
    info!("Finished");

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer and captures the
///   mouse.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    if let Some(hex) = Theme::to_hex(app.theme.background_colour) {
        util::term::set_terminal_bg(&hex).ok();
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`]. It is best-effort
/// and does not return a result, as it is called during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    util::term::reset_terminal_bg().ok();
    terminal.show_cursor().ok();
}

/// Starts the input and tick threads, requests the first library load and
/// enters the main event loop.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Spawn a thread to translate raw terminal events to application events.
    let tx_input = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            let event = match event::read() {
                Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    AppEvent::Key(key)
                }
                Ok(event::Event::Mouse(mouse)) => AppEvent::Mouse(mouse),
                Ok(_) => continue,
                Err(e) => AppEvent::FatalError(format!("Failed to read terminal input: {}", e)),
            };
            if tx_input.send(event).is_err() {
                break;
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    app.controller.start()?;
    app.controller.notify(Level::Success, WELCOME);

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}

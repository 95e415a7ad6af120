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

//! Terminal emulator colour control.
//!
//! The TUI paints its own background, but that leaves a thin border of the
//! emulator's colour around the frame. OSC 11 sets the emulator background to
//! match and OSC 111 puts the user's colour back. Most modern terminals
//! (XTerm, iTerm2, Alacritty, Kitty) understand both; others ignore them.

use std::io::{self, Write};

/// Sets the terminal background colour, `hex_colour` being e.g. `"#1e1e1e"`.
pub(crate) fn set_terminal_bg(hex_colour: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]11;{}\x07", hex_colour)?;
    stdout.flush()
}

/// Restores the background colour from the user's terminal configuration.
pub(crate) fn reset_terminal_bg() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]111\x07")?;
    stdout.flush()
}

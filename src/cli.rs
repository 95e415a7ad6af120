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

//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// A terminal client for a self-hosted music library.
#[derive(Parser, Debug)]
#[command(name = "tunedeck", version, about)]
pub(crate) struct Args {
    /// Library service URL, overriding the configured one
    #[arg(long, value_name = "URL")]
    pub(crate) server: Option<String>,

    /// Start-up volume, overriding the configured one
    #[arg(long, value_name = "0-100", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) volume: Option<u8>,

    /// Directory for log files (default: the configuration directory)
    #[arg(long, value_name = "DIR")]
    pub(crate) log_dir: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub(crate) print_config: bool,
}

impl Args {
    /// Applies the per-run overrides to the loaded configuration.
    pub(crate) fn apply(&self, config: &mut AppConfig) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(volume) = self.volume {
            config.initial_volume = volume;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_configuration() {
        let args = Args::try_parse_from(["tunedeck", "--server", "http://nas:9000", "--volume", "35"])
            .unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.server_url, "http://nas:9000");
        assert_eq!(config.initial_volume, 35);
        assert_eq!(config.sort_by, "title");
    }

    #[test]
    fn volume_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["tunedeck", "--volume", "101"]).is_err());
    }
}

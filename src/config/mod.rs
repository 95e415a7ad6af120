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

//! Application configuration.
//!
//! This module manages the application configuration file. The file is
//! created with default values on first run; command line flags override it
//! for a single run and are never written back.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::SortField;

const CONFIG_NAME: &str = "tunedeck";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,
    /// Base URL of the library service.
    pub(crate) server_url: String,
    /// Volume applied at start-up, `0..=100`.
    pub(crate) initial_volume: u8,
    /// Sort field for the library listing.
    pub(crate) sort_by: String,
    pub(crate) request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server_url: "http://localhost:5000".into(),
            initial_volume: 80,
            sort_by: SortField::Title.as_param().into(),
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// The configured sort field; an unknown name falls back to title.
    pub(crate) fn sort_field(&self) -> SortField {
        SortField::parse(&self.sort_by).unwrap_or_else(|| {
            warn!(sort_by = %self.sort_by, "Unknown sort field in configuration");
            SortField::Title
        })
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Loads the configuration, writing the defaults out if there is no file yet.
pub(crate) fn load_config() -> Result<AppConfig> {
    confy::load(CONFIG_NAME, None).context("Failed to load configuration")
}

/// The directory holding the configuration file.
pub(crate) fn config_dir() -> Result<PathBuf> {
    let path = confy::get_configuration_file_path(CONFIG_NAME, None)
        .context("Failed to locate configuration directory")?;
    path.parent()
        .map(|dir| dir.to_path_buf())
        .context("Configuration file has no parent directory")
}

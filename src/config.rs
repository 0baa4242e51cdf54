// File: ./src/config.rs
// Handles configuration loading and defaults. The tool never writes the
// config back; a missing file simply means defaults.
use crate::model::record::Status;
use crate::paths::AppPaths;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_export_path() -> String {
    "animelist.xml".to_string()
}

fn default_limit() -> usize {
    20
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// Where the XML export lives. A relative value resolves against the
    /// data directory.
    #[serde(default = "default_export_path")]
    pub export_path: String,

    /// Count Plan-to-Watch entries toward the completion-rate denominator.
    #[serde(default)]
    pub count_planned_in_rate: bool,

    /// How many rows `list` prints unless told otherwise. 0 means no cap.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Match the serde defaults
            export_path: default_export_path(),
            count_planned_in_rate: false,
            default_limit: default_limit(),
        }
    }
}

impl Config {
    /// Load the configuration from disk, falling back to defaults when no
    /// config file exists. Returns a contextualized error if a present file
    /// cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = AppPaths::get_config_file_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        // Read the file with contextualized error (covers permission/IO issues).
        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        // Parse TOML with contextualized error (covers syntax issues).
        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Resolves which export file to read: an explicit CLI path wins, then
    /// the configured one (made absolute against the data dir if needed).
    pub fn resolve_export_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        let configured = PathBuf::from(&self.export_path);
        if configured.is_absolute() {
            Ok(configured)
        } else {
            Ok(AppPaths::get_data_dir()?.join(configured))
        }
    }

    /// Statuses that make up the completion-rate denominator. Everything the
    /// user has actually engaged with counts; Plan-to-Watch only joins in
    /// when asked for (flag or config).
    pub fn denominator_statuses(&self, include_planned: bool) -> Vec<Status> {
        let mut statuses = vec![
            Status::Watching,
            Status::Completed,
            Status::OnHold,
            Status::Dropped,
        ];
        if include_planned || self.count_planned_in_rate {
            statuses.push(Status::PlanToWatch);
        }
        statuses
    }
}

//! Persistent profile configuration.
//!
//! The active [`RepoSettings`] plus the auto-sync interval, stored as
//! pretty JSON in the user config directory. Loaded at startup, mutated
//! only through an explicit [`Profile::save`].

use crate::core::error::{Result, SyncError};
use crate::core::settings::RepoSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_AUTO_SYNC_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub settings: RepoSettings,
    pub auto_sync_interval_secs: u64,
}

impl Profile {
    pub fn new(settings: RepoSettings) -> Self {
        Self {
            settings,
            auto_sync_interval_secs: DEFAULT_AUTO_SYNC_SECS,
        }
    }

    fn config_file() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SyncError::sync_failure("Could not find config directory"))?
            .join("notesync");
        Ok(config_dir.join("profile.json"))
    }

    /// Load the saved profile, or `None` if no profile has been saved yet.
    pub fn load() -> Result<Option<Self>> {
        let config_file = Self::config_file()?;
        if !config_file.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_file)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self) -> Result<()> {
        let config_file = Self::config_file()?;
        if let Some(parent) = config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_file, content)?;

        Ok(())
    }
}

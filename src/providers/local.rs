//! Local filesystem provider.
//!
//! The simplest variant: notes live in a plain directory with no remote.
//! Status is always clean and never contacts anything; the sync operations
//! are unsupported by definition and fail with validation errors.

use crate::core::{
    error::{Result, SyncError},
    settings::{ProviderKind, RepoSettings},
    status::{OpenedRepo, RepoStatus, SyncOutcome},
};
use std::time::Duration;

use super::RepositoryProvider;

#[derive(Default)]
pub struct LocalProvider {
    settings: Option<RepoSettings>,
}

impl LocalProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn settings(&self) -> Result<&RepoSettings> {
        self.settings.as_ref().ok_or(SyncError::NotConfigured)
    }
}

impl RepositoryProvider for LocalProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Local
    }

    fn configure(&mut self, settings: RepoSettings) -> Result<()> {
        if settings.kind() != ProviderKind::Local {
            return Err(SyncError::provider_mismatch(
                ProviderKind::Local,
                settings.kind(),
            ));
        }
        self.settings = Some(settings);
        Ok(())
    }

    fn open(&mut self, settings: RepoSettings) -> Result<OpenedRepo> {
        self.configure(settings)?;
        let local_path = self.settings()?.local_path().clone();

        if local_path.exists() {
            if !local_path.is_dir() {
                return Err(SyncError::not_a_directory(local_path));
            }
        } else {
            std::fs::create_dir_all(&local_path)?;
        }

        log::debug!("opened local repository at {}", local_path.display());
        Ok(OpenedRepo { local_path })
    }

    // Local recovers from a skipped open: configured settings are enough,
    // the status never looks at the filesystem.
    fn status(&mut self) -> Result<RepoStatus> {
        self.settings()?;
        Ok(RepoStatus::clean(ProviderKind::Local, "-none-"))
    }

    fn fetch(&mut self) -> Result<()> {
        Err(SyncError::unsupported_operation("fetch", ProviderKind::Local))
    }

    fn pull(&mut self) -> Result<SyncOutcome> {
        Err(SyncError::unsupported_operation("pull", ProviderKind::Local))
    }

    fn push(&mut self) -> Result<SyncOutcome> {
        Err(SyncError::unsupported_operation("push", ProviderKind::Local))
    }

    fn start_auto_sync(&mut self, _interval: Duration) -> Result<()> {
        Ok(())
    }

    fn stop_auto_sync(&mut self) {}
}

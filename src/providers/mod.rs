//! Polymorphic provider abstraction over the repository backends.
//!
//! Each backend is a sibling implementation of [`RepositoryProvider`] (and,
//! for git and s3, [`HistoryProvider`]), selected through
//! [`ProviderFactory`] keyed on the settings tag. There is no inheritance
//! hierarchy; variants share nothing but the trait.
//!
//! # Public API
//! - [`RepositoryProvider`]: configure/open/status/fetch/pull/push lifecycle
//! - [`HistoryProvider`]: per-file history, content at revision, diff
//! - [`ProviderFactory`]: constructs the right variant for a provider tag
//!
//! # Contract
//! - `configure` fails with a provider-mismatch error when the settings tag
//!   disagrees with the variant
//! - every other method fails with a validation error until `configure`
//!   (and, where noted, `open`) has run
//! - at most one in-flight operation per provider instance; callers
//!   serialize

pub mod git;
pub mod local;
pub mod s3;

use crate::core::{
    diff::DiffHunk,
    error::{Result, SyncError},
    history::NoteHistoryEntry,
    object_store::ObjectStore,
    settings::{ProviderKind, RepoSettings},
    status::{OpenedRepo, RepoStatus, SyncOutcome},
};
use std::sync::Arc;
use std::time::Duration;

pub use git::{GitHistoryProvider, GitProvider};
pub use local::LocalProvider;
pub use s3::{S3HistoryProvider, S3Provider};

/// Uniform lifecycle over the {local, git, s3} repository backends.
pub trait RepositoryProvider {
    /// The variant's own tag.
    fn kind(&self) -> ProviderKind;

    /// Validate and store settings; resets any cached local path.
    fn configure(&mut self, settings: RepoSettings) -> Result<()>;

    /// Configure, then establish the working directory.
    fn open(&mut self, settings: RepoSettings) -> Result<OpenedRepo>;

    /// Point-in-time snapshot, re-derived from the backend on every call.
    fn status(&mut self) -> Result<RepoStatus>;

    fn fetch(&mut self) -> Result<()>;
    fn pull(&mut self) -> Result<SyncOutcome>;
    fn push(&mut self) -> Result<SyncOutcome>;

    /// Schedule a periodic sync tick. No-op for local.
    fn start_auto_sync(&mut self, interval: Duration) -> Result<()>;

    /// Cancel the periodic tick. Idempotent; no tick fires after return.
    fn stop_auto_sync(&mut self);
}

/// Per-file history over the {git, s3} backends.
pub trait HistoryProvider {
    /// Must be called before any other method.
    fn configure(&mut self, settings: RepoSettings) -> Result<()>;

    /// History entries for one file, newest first.
    fn history_for_file(&self, file_path: &str) -> Result<Vec<NoteHistoryEntry>>;

    /// Textual content of the file at the given revision.
    fn version_content(&self, hash: &str, file_path: &str) -> Result<String>;

    /// Structured diff between two revisions of the file. Fails with a
    /// sync-failure error on backends without a diff primitive (s3).
    fn diff(&self, hash_a: &str, hash_b: &str, file_path: &str) -> Result<Vec<DiffHunk>>;
}

/// Constructs provider variants, keyed on the provider tag.
///
/// The object store collaborator is injected once and shared by every s3
/// variant the factory hands out.
pub struct ProviderFactory {
    object_store: Arc<dyn ObjectStore>,
}

impl ProviderFactory {
    pub fn new(object_store: Arc<dyn ObjectStore>) -> Self {
        Self { object_store }
    }

    pub fn repository(&self, kind: ProviderKind) -> Box<dyn RepositoryProvider> {
        match kind {
            ProviderKind::Local => Box::new(LocalProvider::new()),
            ProviderKind::Git => Box::new(GitProvider::new()),
            ProviderKind::S3 => Box::new(S3Provider::new(Arc::clone(&self.object_store))),
        }
    }

    /// History is only defined for git and s3.
    pub fn history(&self, kind: ProviderKind) -> Result<Box<dyn HistoryProvider>> {
        match kind {
            ProviderKind::Git => Ok(Box::new(GitHistoryProvider::new())),
            ProviderKind::S3 => Ok(Box::new(S3HistoryProvider::new(Arc::clone(
                &self.object_store,
            )))),
            ProviderKind::Local => Err(SyncError::unsupported_operation(
                "history",
                ProviderKind::Local,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorCode;
    use crate::core::object_store::MemoryStore;

    fn factory() -> ProviderFactory {
        ProviderFactory::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_factory_selects_variant_by_tag() {
        let factory = factory();
        assert_eq!(
            factory.repository(ProviderKind::Local).kind(),
            ProviderKind::Local
        );
        assert_eq!(
            factory.repository(ProviderKind::Git).kind(),
            ProviderKind::Git
        );
        assert_eq!(factory.repository(ProviderKind::S3).kind(), ProviderKind::S3);
    }

    #[test]
    fn test_no_local_history_provider() {
        let err = factory().history(ProviderKind::Local).err().unwrap();
        assert_eq!(err.code(), ErrorCode::Validation);
    }
}

//! Repository status snapshot data structures.
//!
//! [`RepoStatus`] is a point-in-time snapshot of a repository's sync state.
//! It is re-derived from the backend on every query and never cached beyond
//! the call that produced it.
//!
//! # Public API
//! - [`RepoStatus`]: Snapshot of branch, ahead/behind and pending sync work
//! - [`SyncOutcome`]: Counts reported by pull/push
//! - [`OpenedRepo`]: Result of opening a repository (the working directory)

use crate::core::settings::ProviderKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoStatus {
    pub provider: ProviderKind,
    pub branch: String,
    pub ahead: usize,
    pub behind: usize,
    pub has_uncommitted: bool,
    pub pending_push_count: usize,
    pub needs_pull: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_connected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_time: Option<DateTime<Utc>>,
}

impl RepoStatus {
    /// The status a local repository always reports: clean, nothing pending.
    pub fn clean(provider: ProviderKind, branch: impl Into<String>) -> Self {
        Self {
            provider,
            branch: branch.into(),
            ahead: 0,
            behind: 0,
            has_uncommitted: false,
            pending_push_count: 0,
            needs_pull: false,
            is_connected: None,
            last_sync_time: None,
        }
    }
}

/// Files moved by a pull or push.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub pulled: usize,
    pub pushed: usize,
}

/// Returned by a successful `open`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenedRepo {
    pub local_path: PathBuf,
}

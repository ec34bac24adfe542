//! Core functionality for notesync.
//!
//! This module provides the fundamental building blocks for repository
//! synchronization: settings, status snapshots, history entries, the diff
//! parser, backend wrappers and error handling.

pub mod autosync;
pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod history;
pub mod object_store;
pub mod output;
pub mod settings;
pub mod status;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{ErrorCode, Result, SyncError};

// === Settings ===
// Tagged-union repository settings and the provider discriminant
pub use settings::{AuthMethod, ProviderKind, RepoSettings};

// === Status and history data ===
pub use history::{CommitEntry, NoteHistoryEntry};
pub use status::{OpenedRepo, RepoStatus, SyncOutcome};

// === Diff parsing ===
// Unified-diff text -> structured hunks
pub use diff::{parse_unified_diff, DiffHunk, DiffLine, DiffLineKind};

// === Backend wrappers ===
pub use git::GitWorkspace;
pub use object_store::{MemoryStore, ObjectStore, ObjectVersion};

// === Scheduling ===
pub use autosync::AutoSync;

// === Profile configuration ===
pub use config::Profile;

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{print_error, print_history, print_hunks, print_info, print_status, print_success};

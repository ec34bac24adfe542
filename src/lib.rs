//! Notesync - provider-based synchronization core for note repositories.
//!
//! This library normalizes repository operations (status, history, diff,
//! pull/push) across three backends: local filesystem, git, and an
//! s3-style versioned object store. The git backends delegate to a git
//! wrapper and parse its textual output; the s3 backends reconstruct a
//! synthetic history from object versions.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] and
//! [`providers`] modules:
//! - Repository and history provider traits with their factory
//! - Tagged-union repository settings
//! - The unified-diff parser and its hunk/line types
//! - Error handling and result types

pub mod commands;
pub mod core;
pub mod providers;

// Re-export the core public API for external users
pub use core::{
    parse_unified_diff,
    print_error,
    print_history,
    print_hunks,
    print_status,
    print_success,

    AuthMethod,
    AutoSync,

    CommitEntry,
    DiffHunk,
    DiffLine,
    DiffLineKind,
    // Error handling
    ErrorCode,
    GitWorkspace,
    MemoryStore,
    NoteHistoryEntry,
    ObjectStore,
    ObjectVersion,
    OpenedRepo,
    Profile,
    // Settings
    ProviderKind,
    RepoSettings,
    RepoStatus,
    Result,
    SyncError,
    SyncOutcome,
};

pub use providers::{
    GitHistoryProvider, GitProvider, HistoryProvider, LocalProvider, ProviderFactory,
    RepositoryProvider, S3HistoryProvider, S3Provider,
};

//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`SyncError`] which covers every failure mode of the
//! provider layer. It uses `thiserror` for ergonomic error definitions and
//! exposes a stable [`ErrorCode`] so callers can branch on error category
//! without matching message strings.
//!
//! # Public API
//! - [`SyncError`]: Main error enum covering all failure modes
//! - [`ErrorCode`]: Coarse taxonomy (`ProviderMismatch`, `Validation`,
//!   `SyncFailure`, `Backend`)
//! - [`Result<T>`]: Type alias for `std::result::Result<T, SyncError>`
//!
//! # Error Categories
//! - **Provider mismatch**: settings tag disagrees with the provider variant
//! - **Validation**: missing configuration, invalid paths, unsupported operations
//! - **Sync failures**: operations the backend cannot express (e.g. S3 diff)
//! - **Backend failures**: git2/IO/object-store errors passed through unchanged

use std::path::PathBuf;
use thiserror::Error;

use crate::core::settings::ProviderKind;

/// Coarse error category, stable across message changes.
///
/// Callers branch on this instead of matching `Display` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ProviderMismatch,
    Validation,
    SyncFailure,
    Backend,
}

/// Domain-specific error types for notesync
#[derive(Error, Debug)]
pub enum SyncError {
    // Contract violations
    #[error("Provider mismatch: {provider} provider received {got} settings")]
    ProviderMismatch {
        provider: ProviderKind,
        got: ProviderKind,
    },

    // Validation errors
    #[error("Provider is not configured. Call configure() first.")]
    NotConfigured,

    #[error("Operation '{operation}' is not supported for {provider} repositories")]
    UnsupportedOperation {
        operation: &'static str,
        provider: ProviderKind,
    },

    #[error("Path exists but is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Missing required setting: {field}")]
    MissingSetting { field: &'static str },

    // Sync failures
    #[error("Sync failure: {message}")]
    SyncFailure { message: String },

    #[error("Malformed diff hunk header: '{line}'")]
    MalformedHunkHeader { line: String },

    // Backend errors, passed through unchanged
    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("git command failed: {message}")]
    GitCommandFailed { message: String },

    #[error("Object store error: {message}")]
    ObjectStore { message: String },

    #[error("Object not found: {key}")]
    ObjectNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 in file content: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using SyncError
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Map this error onto the coarse taxonomy callers branch on.
    pub fn code(&self) -> ErrorCode {
        match self {
            SyncError::ProviderMismatch { .. } => ErrorCode::ProviderMismatch,
            SyncError::NotConfigured
            | SyncError::UnsupportedOperation { .. }
            | SyncError::NotADirectory { .. }
            | SyncError::MissingSetting { .. } => ErrorCode::Validation,
            SyncError::SyncFailure { .. } | SyncError::MalformedHunkHeader { .. } => {
                ErrorCode::SyncFailure
            }
            SyncError::GitRepo(_)
            | SyncError::GitCommandFailed { .. }
            | SyncError::ObjectStore { .. }
            | SyncError::ObjectNotFound { .. }
            | SyncError::Io(_)
            | SyncError::Utf8(_)
            | SyncError::Json(_) => ErrorCode::Backend,
        }
    }

    /// Create a provider mismatch error
    pub fn provider_mismatch(provider: ProviderKind, got: ProviderKind) -> Self {
        Self::ProviderMismatch { provider, got }
    }

    /// Create an unsupported operation error
    pub fn unsupported_operation(operation: &'static str, provider: ProviderKind) -> Self {
        Self::UnsupportedOperation {
            operation,
            provider,
        }
    }

    /// Create a sync failure error with a specific message
    pub fn sync_failure(message: impl Into<String>) -> Self {
        Self::SyncFailure {
            message: message.into(),
        }
    }

    /// Create a malformed hunk header error
    pub fn malformed_hunk_header(line: impl Into<String>) -> Self {
        Self::MalformedHunkHeader { line: line.into() }
    }

    /// Create a git command failed error
    pub fn git_command_failed(message: impl Into<String>) -> Self {
        Self::GitCommandFailed {
            message: message.into(),
        }
    }

    /// Create an object store error
    pub fn object_store(message: impl Into<String>) -> Self {
        Self::ObjectStore {
            message: message.into(),
        }
    }

    /// Create an object not found error
    pub fn object_not_found(key: impl Into<String>) -> Self {
        Self::ObjectNotFound { key: key.into() }
    }

    /// Create a not-a-directory error
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    /// Create a missing setting error
    pub fn missing_setting(field: &'static str) -> Self {
        Self::MissingSetting { field }
    }
}

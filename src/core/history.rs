//! History entry data structures.
//!
//! A history entry identifies one revision of a note. `hash` is the stable
//! identity: the commit SHA for git-backed history, the object version id
//! for s3-backed history. Per-file history is always returned newest-first.
//!
//! # Public API
//! - [`CommitEntry`]: One commit/upload with author metadata
//! - [`NoteHistoryEntry`]: A [`CommitEntry`] scoped to a single file

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitEntry {
    pub hash: String,
    pub author: String,
    pub email: String,
    pub date: DateTime<Utc>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteHistoryEntry {
    pub hash: String,
    pub author: String,
    pub email: String,
    pub date: DateTime<Utc>,
    pub message: String,
    pub file_path: String,
}

impl NoteHistoryEntry {
    /// Scope a commit entry to a single file.
    pub fn from_commit(entry: CommitEntry, file_path: impl Into<String>) -> Self {
        Self {
            hash: entry.hash,
            author: entry.author,
            email: entry.email,
            date: entry.date,
            message: entry.message,
            file_path: file_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_commit_keeps_metadata() {
        let commit = CommitEntry {
            hash: "abc123".to_string(),
            author: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            message: "Update note".to_string(),
            files: None,
        };

        let entry = NoteHistoryEntry::from_commit(commit, "daily/2024-05-01.md");
        assert_eq!(entry.hash, "abc123");
        assert_eq!(entry.author, "Ada");
        assert_eq!(entry.file_path, "daily/2024-05-01.md");
    }
}

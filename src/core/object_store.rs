//! Object-store boundary for the s3-backed providers.
//!
//! The s3 providers never talk to a cloud SDK directly; they go through the
//! [`ObjectStore`] trait, which models the small slice of a versioned
//! bucket the sync core needs. A production binding injects its own
//! implementation; [`MemoryStore`] is the in-tree implementation used by
//! tests and offline profiles.
//!
//! # Public API
//! - [`ObjectStore`]: Versioned bucket operations (list, get, put, delete)
//! - [`ObjectVersion`]: One version of one key
//! - [`MemoryStore`]: In-memory multi-version store with delete markers
//!
//! # Version Model
//! - Every put appends a new version; versions are never rewritten
//! - Delete writes a delete marker version rather than removing data
//! - `is_latest` marks the most recently written version per key
//! - List order is insertion order, deliberately not time-sorted; consumers
//!   that need newest-first must sort on `last_modified`

use crate::core::error::{Result, SyncError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// One version of one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectVersion {
    pub key: String,
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
    pub is_latest: bool,
    pub size: usize,
    pub is_delete_marker: bool,
}

/// Versioned bucket operations the s3 providers depend on.
pub trait ObjectStore: Send + Sync {
    /// Cheap reachability check, used by `open`.
    fn head_bucket(&self) -> Result<()>;

    /// All keys under `prefix` that currently have a non-deleted latest
    /// version.
    fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Every stored version of `key`, delete markers included.
    fn list_object_versions(&self, key: &str) -> Result<Vec<ObjectVersion>>;

    /// Object body, at `version_id` if given, at the latest version
    /// otherwise. Fails if the latest version is a delete marker.
    fn get_object(&self, key: &str, version_id: Option<&str>) -> Result<Vec<u8>>;

    /// Append a new version of `key`.
    fn put_object(&self, key: &str, body: &[u8]) -> Result<ObjectVersion>;

    /// Append a delete marker for `key`.
    fn delete_object(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
struct StoredVersion {
    version_id: String,
    last_modified: DateTime<Utc>,
    body: Vec<u8>,
    is_delete_marker: bool,
}

#[derive(Default)]
struct StoreState {
    objects: BTreeMap<String, Vec<StoredVersion>>,
    next_version: u64,
}

/// In-memory multi-version object store with delete markers.
///
/// Mirrors the behavior of a versioned bucket closely enough for the
/// provider tests: versions accumulate per key, deletes are markers, and
/// only the newest version of a key reports `is_latest`.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a version with an explicit timestamp. Test hook for
    /// exercising the newest-first sort against out-of-order listings.
    pub fn put_object_at(
        &self,
        key: &str,
        body: &[u8],
        last_modified: DateTime<Utc>,
    ) -> Result<ObjectVersion> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        Ok(append_version(&mut state, key, body.to_vec(), false, last_modified))
    }
}

fn poisoned() -> SyncError {
    SyncError::object_store("memory store lock poisoned")
}

fn append_version(
    state: &mut StoreState,
    key: &str,
    body: Vec<u8>,
    is_delete_marker: bool,
    last_modified: DateTime<Utc>,
) -> ObjectVersion {
    state.next_version += 1;
    let size = body.len();
    let version = StoredVersion {
        version_id: format!("v{:08}", state.next_version),
        last_modified,
        body,
        is_delete_marker,
    };
    let version_id = version.version_id.clone();
    state.objects.entry(key.to_string()).or_default().push(version);

    ObjectVersion {
        key: key.to_string(),
        version_id,
        last_modified,
        is_latest: true,
        size,
        is_delete_marker,
    }
}

impl ObjectStore for MemoryStore {
    fn head_bucket(&self) -> Result<()> {
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        let keys = state
            .objects
            .iter()
            .filter(|(key, versions)| {
                key.starts_with(prefix)
                    && versions
                        .last()
                        .is_some_and(|latest| !latest.is_delete_marker)
            })
            .map(|(key, _)| key.clone())
            .collect();
        Ok(keys)
    }

    fn list_object_versions(&self, key: &str) -> Result<Vec<ObjectVersion>> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        let versions = match state.objects.get(key) {
            Some(versions) => versions,
            None => return Ok(Vec::new()),
        };

        let last_index = versions.len().saturating_sub(1);
        Ok(versions
            .iter()
            .enumerate()
            .map(|(i, v)| ObjectVersion {
                key: key.to_string(),
                version_id: v.version_id.clone(),
                last_modified: v.last_modified,
                is_latest: i == last_index,
                size: v.body.len(),
                is_delete_marker: v.is_delete_marker,
            })
            .collect())
    }

    fn get_object(&self, key: &str, version_id: Option<&str>) -> Result<Vec<u8>> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        let versions = state
            .objects
            .get(key)
            .ok_or_else(|| SyncError::object_not_found(key))?;

        let version = match version_id {
            Some(id) => versions
                .iter()
                .find(|v| v.version_id == id)
                .ok_or_else(|| SyncError::object_not_found(format!("{key}@{id}")))?,
            None => versions
                .last()
                .ok_or_else(|| SyncError::object_not_found(key))?,
        };

        if version.is_delete_marker {
            return Err(SyncError::object_not_found(key));
        }

        Ok(version.body.clone())
    }

    fn put_object(&self, key: &str, body: &[u8]) -> Result<ObjectVersion> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        Ok(append_version(
            &mut state,
            key,
            body.to_vec(),
            false,
            Utc::now(),
        ))
    }

    fn delete_object(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        append_version(&mut state, key, Vec::new(), true, Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_puts_accumulate_versions() -> Result<()> {
        let store = MemoryStore::new();
        store.put_object("notes/a.md", b"v1")?;
        store.put_object("notes/a.md", b"v2")?;

        let versions = store.list_object_versions("notes/a.md")?;
        assert_eq!(versions.len(), 2);
        assert_ne!(versions[0].version_id, versions[1].version_id);
        Ok(())
    }

    #[test]
    fn test_only_last_version_is_latest() -> Result<()> {
        let store = MemoryStore::new();
        store.put_object("a.md", b"v1")?;
        store.put_object("a.md", b"v2")?;
        store.put_object("a.md", b"v3")?;

        let versions = store.list_object_versions("a.md")?;
        let latest: Vec<bool> = versions.iter().map(|v| v.is_latest).collect();
        assert_eq!(latest, vec![false, false, true]);
        Ok(())
    }

    #[test]
    fn test_delete_writes_marker() -> Result<()> {
        let store = MemoryStore::new();
        store.put_object("a.md", b"v1")?;
        store.delete_object("a.md")?;

        let versions = store.list_object_versions("a.md")?;
        assert_eq!(versions.len(), 2);
        assert!(versions[1].is_delete_marker);
        assert!(versions[1].is_latest);

        // Latest is a delete marker, so a plain get fails
        assert!(store.get_object("a.md", None).is_err());
        // The old version stays retrievable by id
        let body = store.get_object("a.md", Some(&versions[0].version_id))?;
        assert_eq!(body, b"v1");
        Ok(())
    }

    #[test]
    fn test_deleted_keys_drop_out_of_list_keys() -> Result<()> {
        let store = MemoryStore::new();
        store.put_object("notes/a.md", b"a")?;
        store.put_object("notes/b.md", b"b")?;
        store.delete_object("notes/a.md")?;

        assert_eq!(store.list_keys("notes/")?, vec!["notes/b.md".to_string()]);
        Ok(())
    }

    #[test]
    fn test_get_object_by_version_id() -> Result<()> {
        let store = MemoryStore::new();
        let v1 = store.put_object("a.md", b"first")?;
        store.put_object("a.md", b"second")?;

        assert_eq!(store.get_object("a.md", Some(&v1.version_id))?, b"first");
        assert_eq!(store.get_object("a.md", None)?, b"second");
        Ok(())
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_object("nope.md", None).unwrap_err();
        assert!(err.to_string().contains("nope.md"));
    }

    #[test]
    fn test_put_object_at_keeps_explicit_timestamp() -> Result<()> {
        let store = MemoryStore::new();
        let ts = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        store.put_object_at("a.md", b"old", ts)?;

        let versions = store.list_object_versions("a.md")?;
        assert_eq!(versions[0].last_modified, ts);
        Ok(())
    }
}

//! S3-backed repository and history providers.
//!
//! Notes map to objects under `prefix/<relative path>` in a versioned
//! bucket reached through the [`ObjectStore`] trait. History is synthetic:
//! each object version becomes one entry with the version id standing in
//! for a commit hash. The store gives no author or message, so those
//! fields stay empty in history entries.
//!
//! Version listings from an object store carry no ordering guarantee, so
//! history is explicitly sorted by `last_modified` descending; the
//! `is_latest` flag is informational only.

use crate::core::{
    autosync::AutoSync,
    diff::DiffHunk,
    error::{Result, SyncError},
    history::NoteHistoryEntry,
    object_store::ObjectStore,
    settings::{ProviderKind, RepoSettings},
    status::{OpenedRepo, RepoStatus, SyncOutcome},
};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::{HistoryProvider, RepositoryProvider};

/// Borrowed view of the s3 settings payload.
struct S3Settings<'a> {
    bucket: &'a str,
    prefix: Option<&'a str>,
    local_path: &'a PathBuf,
}

fn s3_settings(settings: Option<&RepoSettings>) -> Result<S3Settings<'_>> {
    match settings {
        Some(RepoSettings::S3 {
            bucket,
            prefix,
            local_path,
            ..
        }) => Ok(S3Settings {
            bucket,
            prefix: prefix.as_deref(),
            local_path,
        }),
        Some(_) | None => Err(SyncError::NotConfigured),
    }
}

fn check_tag(settings: &RepoSettings) -> Result<()> {
    if settings.kind() != ProviderKind::S3 {
        return Err(SyncError::provider_mismatch(
            ProviderKind::S3,
            settings.kind(),
        ));
    }
    Ok(())
}

/// Backend key for a note: bare `prefix/path` join, no slash
/// normalization beyond it. An empty prefix behaves like no prefix.
fn object_key(prefix: Option<&str>, file_path: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}/{file_path}"),
        _ => file_path.to_string(),
    }
}

/// The listing prefix matching [`object_key`].
fn listing_prefix(prefix: Option<&str>) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}/"),
        _ => String::new(),
    }
}

pub struct S3Provider {
    store: Arc<dyn ObjectStore>,
    settings: Option<RepoSettings>,
    opened: bool,
    auto_sync: Option<AutoSync>,
    last_sync_time: Option<DateTime<Utc>>,
}

impl S3Provider {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            settings: None,
            opened: false,
            auto_sync: None,
            last_sync_time: None,
        }
    }

    fn require_opened(&self) -> Result<S3Settings<'_>> {
        if !self.opened {
            return Err(SyncError::NotConfigured);
        }
        s3_settings(self.settings.as_ref())
    }
}

impl RepositoryProvider for S3Provider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::S3
    }

    fn configure(&mut self, settings: RepoSettings) -> Result<()> {
        check_tag(&settings)?;
        self.settings = Some(settings);
        self.opened = false;
        Ok(())
    }

    fn open(&mut self, settings: RepoSettings) -> Result<OpenedRepo> {
        self.configure(settings)?;
        let conf = s3_settings(self.settings.as_ref())?;
        let local_path = conf.local_path.clone();

        self.store.head_bucket()?;

        if local_path.exists() {
            if !local_path.is_dir() {
                return Err(SyncError::not_a_directory(local_path));
            }
        } else {
            std::fs::create_dir_all(&local_path)?;
        }

        self.opened = true;
        log::info!(
            "opened s3 repository (bucket {}) at {}",
            conf.bucket,
            local_path.display()
        );
        Ok(OpenedRepo { local_path })
    }

    fn status(&mut self) -> Result<RepoStatus> {
        let conf = self.require_opened()?;
        let bucket = conf.bucket.to_string();
        let prefix = conf.prefix.map(str::to_string);
        let local_path = conf.local_path.clone();

        let is_connected = self.store.head_bucket().is_ok();
        let (pending_push, needs_pull) =
            pending_counts(self.store.as_ref(), prefix.as_deref(), &local_path)?;

        Ok(RepoStatus {
            provider: ProviderKind::S3,
            branch: bucket,
            ahead: 0,
            behind: 0,
            has_uncommitted: pending_push > 0,
            pending_push_count: pending_push,
            needs_pull,
            is_connected: Some(is_connected),
            last_sync_time: self.last_sync_time,
        })
    }

    fn fetch(&mut self) -> Result<()> {
        self.require_opened()?;
        self.store.head_bucket()
    }

    fn pull(&mut self) -> Result<SyncOutcome> {
        let conf = self.require_opened()?;
        let prefix = conf.prefix.map(str::to_string);
        let local_path = conf.local_path.clone();

        let pulled = pull_from_store(self.store.as_ref(), prefix.as_deref(), &local_path)?;
        self.last_sync_time = Some(Utc::now());
        Ok(SyncOutcome { pulled, pushed: 0 })
    }

    fn push(&mut self) -> Result<SyncOutcome> {
        let conf = self.require_opened()?;
        let prefix = conf.prefix.map(str::to_string);
        let local_path = conf.local_path.clone();

        let pushed = push_to_store(self.store.as_ref(), prefix.as_deref(), &local_path)?;
        self.last_sync_time = Some(Utc::now());
        Ok(SyncOutcome { pulled: 0, pushed })
    }

    fn start_auto_sync(&mut self, interval: Duration) -> Result<()> {
        let conf = self.require_opened()?;
        let prefix = conf.prefix.map(str::to_string);
        let local_path = conf.local_path.clone();
        let store = Arc::clone(&self.store);

        self.stop_auto_sync();
        self.auto_sync = Some(AutoSync::start(interval, move || {
            let tick = pull_from_store(store.as_ref(), prefix.as_deref(), &local_path)
                .and_then(|_| push_to_store(store.as_ref(), prefix.as_deref(), &local_path));
            if let Err(e) = tick {
                log::warn!("auto-sync tick failed: {e}");
            }
        }));
        Ok(())
    }

    fn stop_auto_sync(&mut self) {
        if let Some(mut auto_sync) = self.auto_sync.take() {
            auto_sync.stop();
        }
    }
}

/// Relative '/'-joined paths of every file under `root`.
fn list_local_files(root: &Path) -> Result<Vec<String>> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                walk(root, &path, out)?;
            } else if let Ok(rel) = path.strip_prefix(root) {
                let rel = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                out.push(rel);
            }
        }
        Ok(())
    }

    let mut files = Vec::new();
    if root.exists() {
        walk(root, root, &mut files)?;
    }
    files.sort();
    Ok(files)
}

/// Download every latest non-deleted object whose content differs from the
/// local copy. Returns the number of files written.
fn pull_from_store(store: &dyn ObjectStore, prefix: Option<&str>, root: &Path) -> Result<usize> {
    let listing = listing_prefix(prefix);
    let mut pulled = 0;

    for key in store.list_keys(&listing)? {
        let rel = key.strip_prefix(&listing).unwrap_or(&key);
        let body = store.get_object(&key, None)?;
        let local = root.join(rel);

        let up_to_date = std::fs::read(&local).map(|c| c == body).unwrap_or(false);
        if up_to_date {
            continue;
        }

        if let Some(parent) = local.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&local, &body)?;
        pulled += 1;
    }

    Ok(pulled)
}

/// Upload every local file whose content differs from the store's latest
/// version. Returns the number of objects written.
fn push_to_store(store: &dyn ObjectStore, prefix: Option<&str>, root: &Path) -> Result<usize> {
    let mut pushed = 0;

    for rel in list_local_files(root)? {
        let key = object_key(prefix, &rel);
        let body = std::fs::read(root.join(&rel))?;

        let up_to_date = store
            .get_object(&key, None)
            .map(|remote| remote == body)
            .unwrap_or(false);
        if up_to_date {
            continue;
        }

        store.put_object(&key, &body)?;
        pushed += 1;
    }

    Ok(pushed)
}

/// (files pending upload, whether any remote object needs downloading).
fn pending_counts(
    store: &dyn ObjectStore,
    prefix: Option<&str>,
    root: &Path,
) -> Result<(usize, bool)> {
    let listing = listing_prefix(prefix);

    let mut pending_push = 0;
    for rel in list_local_files(root)? {
        let key = object_key(prefix, &rel);
        let body = std::fs::read(root.join(&rel))?;
        let up_to_date = store
            .get_object(&key, None)
            .map(|remote| remote == body)
            .unwrap_or(false);
        if !up_to_date {
            pending_push += 1;
        }
    }

    let mut needs_pull = false;
    for key in store.list_keys(&listing)? {
        let rel = key.strip_prefix(&listing).unwrap_or(&key);
        let body = store.get_object(&key, None)?;
        let up_to_date = std::fs::read(root.join(rel))
            .map(|c| c == body)
            .unwrap_or(false);
        if !up_to_date {
            needs_pull = true;
            break;
        }
    }

    Ok((pending_push, needs_pull))
}

pub struct S3HistoryProvider {
    store: Arc<dyn ObjectStore>,
    settings: Option<RepoSettings>,
}

impl S3HistoryProvider {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            settings: None,
        }
    }

    fn prefix(&self) -> Result<Option<String>> {
        Ok(s3_settings(self.settings.as_ref())?
            .prefix
            .map(str::to_string))
    }
}

impl HistoryProvider for S3HistoryProvider {
    fn configure(&mut self, settings: RepoSettings) -> Result<()> {
        check_tag(&settings)?;
        self.settings = Some(settings);
        Ok(())
    }

    fn history_for_file(&self, file_path: &str) -> Result<Vec<NoteHistoryEntry>> {
        let key = object_key(self.prefix()?.as_deref(), file_path);

        let mut entries: Vec<NoteHistoryEntry> = self
            .store
            .list_object_versions(&key)?
            .into_iter()
            .filter(|version| !version.is_delete_marker)
            .map(|version| NoteHistoryEntry {
                hash: version.version_id,
                author: String::new(),
                email: String::new(),
                date: version.last_modified,
                message: String::new(),
                file_path: file_path.to_string(),
            })
            .collect();

        // Stores do not guarantee version-list ordering
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    fn version_content(&self, hash: &str, file_path: &str) -> Result<String> {
        let key = object_key(self.prefix()?.as_deref(), file_path);
        let body = self.store.get_object(&key, Some(hash))?;
        Ok(String::from_utf8(body)?)
    }

    fn diff(&self, _hash_a: &str, _hash_b: &str, _file_path: &str) -> Result<Vec<DiffHunk>> {
        self.prefix()?;
        Err(SyncError::sync_failure(
            "diff is not available for s3 history; compute it from two versions instead",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorCode;
    use crate::core::object_store::MemoryStore;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn s3_repo_settings(local_path: PathBuf, prefix: Option<&str>) -> RepoSettings {
        RepoSettings::S3 {
            bucket: "notes-bucket".to_string(),
            region: "us-east-1".to_string(),
            prefix: prefix.map(str::to_string),
            local_path,
            access_key_id: "AKIA".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
        }
    }

    fn provider_with_store() -> (S3Provider, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (S3Provider::new(store.clone()), store)
    }

    #[test]
    fn test_object_key_join() {
        assert_eq!(object_key(None, "note.md"), "note.md");
        assert_eq!(object_key(Some(""), "note.md"), "note.md");
        assert_eq!(object_key(Some("notes"), "a/b.md"), "notes/a/b.md");
    }

    #[test]
    fn test_configure_rejects_wrong_tag() {
        let (mut provider, _store) = provider_with_store();
        let err = provider
            .configure(RepoSettings::Local {
                local_path: PathBuf::from("/notes"),
            })
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProviderMismatch);
    }

    #[test]
    fn test_status_before_open_fails() {
        let (mut provider, _store) = provider_with_store();
        provider
            .configure(s3_repo_settings(PathBuf::from("/notes"), None))
            .unwrap();
        let err = provider.status().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[test]
    fn test_open_then_push_and_pull_roundtrip() -> Result<()> {
        let temp_dir = TempDir::new().map_err(SyncError::Io)?;
        let local_path = temp_dir.path().join("notes");
        let (mut provider, store) = provider_with_store();

        provider.open(s3_repo_settings(local_path.clone(), Some("vault")))?;
        std::fs::write(local_path.join("a.md"), "hello").map_err(SyncError::Io)?;

        let outcome = provider.push()?;
        assert_eq!(outcome.pushed, 1);
        assert_eq!(store.get_object("vault/a.md", None)?, b"hello");

        // A second push with unchanged content uploads nothing
        assert_eq!(provider.push()?.pushed, 0);

        // Remote-only changes flow back on pull
        store.put_object("vault/b.md", b"from elsewhere")?;
        let outcome = provider.pull()?;
        assert_eq!(outcome.pulled, 1);
        assert_eq!(
            std::fs::read_to_string(local_path.join("b.md")).map_err(SyncError::Io)?,
            "from elsewhere"
        );
        Ok(())
    }

    #[test]
    fn test_status_reports_pending_work() -> Result<()> {
        let temp_dir = TempDir::new().map_err(SyncError::Io)?;
        let local_path = temp_dir.path().join("notes");
        let (mut provider, store) = provider_with_store();

        provider.open(s3_repo_settings(local_path.clone(), None))?;
        std::fs::write(local_path.join("local.md"), "only here").map_err(SyncError::Io)?;
        store.put_object("remote.md", b"only there")?;

        let status = provider.status()?;
        assert_eq!(status.provider, ProviderKind::S3);
        assert_eq!(status.branch, "notes-bucket");
        assert_eq!(status.pending_push_count, 1);
        assert!(status.has_uncommitted);
        assert!(status.needs_pull);
        assert_eq!(status.is_connected, Some(true));
        Ok(())
    }

    #[test]
    fn test_history_sorted_by_last_modified_desc() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        // Insert out of chronological order to prove the explicit sort
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        store.put_object_at("notes/a.md", b"jan", t1)?;
        store.put_object_at("notes/a.md", b"jun", t2)?;
        store.put_object_at("notes/a.md", b"mar", t3)?;

        let mut provider = S3HistoryProvider::new(store);
        provider.configure(s3_repo_settings(PathBuf::from("/notes"), Some("notes")))?;

        let entries = provider.history_for_file("a.md")?;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].date, t2);
        assert_eq!(entries[1].date, t3);
        assert_eq!(entries[2].date, t1);
        Ok(())
    }

    #[test]
    fn test_history_skips_delete_markers() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        store.put_object("a.md", b"v1")?;
        store.delete_object("a.md")?;

        let mut provider = S3HistoryProvider::new(store);
        provider.configure(s3_repo_settings(PathBuf::from("/notes"), None))?;

        let entries = provider.history_for_file("a.md")?;
        assert_eq!(entries.len(), 1);
        Ok(())
    }

    #[test]
    fn test_version_content_by_hash() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let v1 = store.put_object("a.md", b"first")?;
        store.put_object("a.md", b"second")?;

        let mut provider = S3HistoryProvider::new(store);
        provider.configure(s3_repo_settings(PathBuf::from("/notes"), None))?;

        assert_eq!(provider.version_content(&v1.version_id, "a.md")?, "first");
        Ok(())
    }

    #[test]
    fn test_diff_always_fails_with_sync_failure() {
        let store = Arc::new(MemoryStore::new());
        let mut provider = S3HistoryProvider::new(store);
        provider
            .configure(s3_repo_settings(PathBuf::from("/notes"), None))
            .unwrap();

        let err = provider.diff("v1", "v2", "a.md").unwrap_err();
        assert_eq!(err.code(), ErrorCode::SyncFailure);
    }

    #[test]
    fn test_history_provider_requires_configuration() {
        let provider = S3HistoryProvider::new(Arc::new(MemoryStore::new()));
        let err = provider.history_for_file("a.md").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
    }
}

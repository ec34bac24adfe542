//! Git-backed repository and history providers.
//!
//! Both providers delegate to [`GitWorkspace`]; they hold settings and
//! reshape the wrapper's output into the common provider types. The
//! repository provider owns the working directory lifecycle (clone or init
//! on open, checkout of the configured branch) and the auto-sync tick; the
//! history provider is stateless beyond its settings and re-opens the
//! workspace per query.

use crate::core::{
    autosync::AutoSync,
    diff::DiffHunk,
    error::{Result, SyncError},
    git::GitWorkspace,
    history::NoteHistoryEntry,
    settings::{ProviderKind, RepoSettings},
    status::{OpenedRepo, RepoStatus, SyncOutcome},
};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{HistoryProvider, RepositoryProvider};

const REMOTE: &str = "origin";

/// Borrowed view of the git settings payload.
struct GitSettings<'a> {
    remote_url: &'a str,
    branch: &'a str,
    local_path: &'a PathBuf,
}

fn git_settings(settings: Option<&RepoSettings>) -> Result<GitSettings<'_>> {
    match settings {
        Some(RepoSettings::Git {
            remote_url,
            branch,
            local_path,
            ..
        }) => Ok(GitSettings {
            remote_url,
            branch,
            local_path,
        }),
        Some(_) | None => Err(SyncError::NotConfigured),
    }
}

fn check_tag(settings: &RepoSettings) -> Result<()> {
    if settings.kind() != ProviderKind::Git {
        return Err(SyncError::provider_mismatch(
            ProviderKind::Git,
            settings.kind(),
        ));
    }
    Ok(())
}

#[derive(Default)]
pub struct GitProvider {
    settings: Option<RepoSettings>,
    workspace: Option<GitWorkspace>,
    auto_sync: Option<AutoSync>,
    last_sync_time: Option<DateTime<Utc>>,
}

impl GitProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn workspace(&self) -> Result<&GitWorkspace> {
        self.workspace.as_ref().ok_or(SyncError::NotConfigured)
    }
}

impl RepositoryProvider for GitProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Git
    }

    fn configure(&mut self, settings: RepoSettings) -> Result<()> {
        check_tag(&settings)?;
        self.settings = Some(settings);
        self.workspace = None;
        Ok(())
    }

    fn open(&mut self, settings: RepoSettings) -> Result<OpenedRepo> {
        self.configure(settings)?;
        let conf = git_settings(self.settings.as_ref())?;
        let local_path = conf.local_path.clone();
        let branch = conf.branch.to_string();
        let remote_url = conf.remote_url.to_string();

        let workspace = if local_path.join(".git").exists() {
            GitWorkspace::open(&local_path)?
        } else {
            std::fs::create_dir_all(&local_path)?;
            match GitWorkspace::clone_from(&remote_url, &local_path) {
                Ok(workspace) => workspace,
                Err(e) => {
                    // Remote unreachable or empty: start a fresh repository
                    // wired to the remote for later pushes
                    log::debug!("clone failed ({e}), initializing instead");
                    let workspace = GitWorkspace::init(&local_path)?;
                    workspace.add_remote(REMOTE, &remote_url)?;
                    workspace
                }
            }
        };

        workspace.checkout_branch(&branch)?;
        self.workspace = Some(workspace);

        log::info!("opened git repository at {}", local_path.display());
        Ok(OpenedRepo { local_path })
    }

    fn status(&mut self) -> Result<RepoStatus> {
        let conf = git_settings(self.settings.as_ref())?;
        let configured_branch = conf.branch.to_string();
        let workspace = self.workspace()?;

        let branch = workspace
            .current_branch()
            .unwrap_or(configured_branch);
        let (ahead, behind) = workspace.ahead_behind()?;
        let has_uncommitted = workspace.has_uncommitted_changes()?;

        Ok(RepoStatus {
            provider: ProviderKind::Git,
            branch,
            ahead,
            behind,
            has_uncommitted,
            pending_push_count: ahead,
            needs_pull: behind > 0,
            is_connected: None,
            last_sync_time: self.last_sync_time,
        })
    }

    fn fetch(&mut self) -> Result<()> {
        self.workspace()?.fetch(REMOTE)
    }

    fn pull(&mut self) -> Result<SyncOutcome> {
        let branch = git_settings(self.settings.as_ref())?.branch.to_string();
        let workspace = self.workspace()?;

        workspace.fetch(REMOTE)?;
        let (_, behind) = workspace.ahead_behind()?;
        workspace.pull(REMOTE, &branch)?;

        self.last_sync_time = Some(Utc::now());
        Ok(SyncOutcome {
            pulled: behind,
            pushed: 0,
        })
    }

    fn push(&mut self) -> Result<SyncOutcome> {
        let branch = git_settings(self.settings.as_ref())?.branch.to_string();
        let workspace = self.workspace()?;

        let (ahead, _) = workspace.ahead_behind()?;
        workspace.push(REMOTE, &branch)?;

        self.last_sync_time = Some(Utc::now());
        Ok(SyncOutcome {
            pulled: 0,
            pushed: ahead,
        })
    }

    fn start_auto_sync(&mut self, interval: Duration) -> Result<()> {
        let conf = git_settings(self.settings.as_ref())?;
        self.workspace()?;

        let local_path = conf.local_path.clone();
        let branch = conf.branch.to_string();

        self.stop_auto_sync();
        self.auto_sync = Some(AutoSync::start(interval, move || {
            if let Err(e) = sync_tick(&local_path, &branch) {
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

/// One auto-sync round: pull fast-forward changes, push local commits.
fn sync_tick(local_path: &Path, branch: &str) -> Result<()> {
    let workspace = GitWorkspace::open(local_path)?;
    workspace.pull(REMOTE, branch)?;
    workspace.push(REMOTE, branch)?;
    Ok(())
}

#[derive(Default)]
pub struct GitHistoryProvider {
    settings: Option<RepoSettings>,
}

impl GitHistoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn workspace(&self) -> Result<GitWorkspace> {
        let conf = git_settings(self.settings.as_ref())?;
        GitWorkspace::open(conf.local_path)
    }
}

impl HistoryProvider for GitHistoryProvider {
    fn configure(&mut self, settings: RepoSettings) -> Result<()> {
        check_tag(&settings)?;
        self.settings = Some(settings);
        Ok(())
    }

    // Git's own log ordering (newest first) is preserved as-is.
    fn history_for_file(&self, file_path: &str) -> Result<Vec<NoteHistoryEntry>> {
        let workspace = self.workspace()?;
        let log = workspace.log_for_file(file_path)?;
        Ok(log
            .into_iter()
            .map(|commit| NoteHistoryEntry::from_commit(commit, file_path))
            .collect())
    }

    fn version_content(&self, hash: &str, file_path: &str) -> Result<String> {
        self.workspace()?.show(hash, file_path)
    }

    fn diff(&self, hash_a: &str, hash_b: &str, file_path: &str) -> Result<Vec<DiffHunk>> {
        let text = self.workspace()?.diff_text(hash_a, hash_b, file_path)?;
        crate::core::diff::parse_unified_diff(&text)
    }
}

//! Git repository operations for the git-backed providers.
//!
//! This module provides [`GitWorkspace`], a high-level interface over a
//! note repository's git working directory. It wraps the `git2` library for
//! repository reads (branch, ahead/behind, dirtiness) and shells out to the
//! `git` CLI for the operations that need it (clone, checkout, log, show,
//! diff, fetch, pull, push), capturing stdout and stderr.
//!
//! # Public API
//! - [`GitWorkspace`]: Main interface for git repository operations
//!
//! # Key Features
//! - **Status reading**: branch name, ahead/behind counts, uncommitted check
//! - **History**: per-file commit log mapped to typed [`CommitEntry`] records
//! - **Content retrieval**: file content at an arbitrary revision
//! - **Diff text**: unified diff between two revisions for one file

use crate::core::{
    error::{Result, SyncError},
    history::CommitEntry,
};
use chrono::{DateTime, Utc};
use git2::{Repository, StatusOptions};
use std::path::{Path, PathBuf};

// Field separator for --pretty=format log records; never appears in
// author names or subjects.
const LOG_FIELD_SEP: char = '\x1f';
const LOG_FORMAT: &str = "%H\x1f%an\x1f%ae\x1f%aI\x1f%s";

pub struct GitWorkspace {
    repo: Repository,
}

impl GitWorkspace {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path)?;
        Ok(GitWorkspace { repo })
    }

    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::init(path)?;
        Ok(GitWorkspace { repo })
    }

    /// Clone `remote_url` into `path` and open the result.
    pub fn clone_from(remote_url: &str, path: &Path) -> Result<Self> {
        let path_str = path.to_string_lossy();
        run_git(None, &["clone", remote_url, path_str.as_ref()])?;
        Self::open(path)
    }

    pub fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| SyncError::sync_failure("Repository has no working directory"))
    }

    /// Execute a git command in the working directory, returning stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let workdir = self.workdir()?;
        run_git(Some(&workdir), args)
    }

    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if let Some(branch_name) = head.shorthand() {
            if head.is_branch() {
                Ok(branch_name.to_string())
            } else if let Some(oid) = head.target() {
                // Detached HEAD
                Ok(format!("detached at {}", &oid.to_string()[..7]))
            } else {
                Ok("-none-".to_string())
            }
        } else {
            Ok("-none-".to_string())
        }
    }

    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.repo.remote(name, url)?;
        Ok(())
    }

    pub fn checkout_branch(&self, branch: &str) -> Result<()> {
        // Already on the branch, possibly unborn after init or an
        // empty-remote clone
        if let Ok(head) = self.repo.find_reference("HEAD") {
            if head.symbolic_target() == Some(format!("refs/heads/{branch}").as_str()) {
                return Ok(());
            }
        }
        if self.run(&["checkout", branch]).is_ok() {
            return Ok(());
        }
        // Branch does not exist yet locally
        self.run(&["checkout", "-b", branch]).map(|_| ())
    }

    /// True if the working tree or index differs from HEAD, untracked
    /// files included.
    pub fn has_uncommitted_changes(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true);
        opts.include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(!statuses.is_empty())
    }

    /// Ahead/behind counts for the current branch relative to its upstream.
    /// Returns (0, 0) when no upstream is configured.
    pub fn ahead_behind(&self) -> Result<(usize, usize)> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(_) => return Ok((0, 0)),
        };

        let local_oid = match head.target() {
            Some(oid) => oid,
            None => return Ok((0, 0)),
        };

        let branch_name = match head.shorthand() {
            Some(name) => name,
            None => return Ok((0, 0)),
        };

        let local_branch = match self.repo.find_branch(branch_name, git2::BranchType::Local) {
            Ok(branch) => branch,
            Err(_) => return Ok((0, 0)),
        };

        let upstream_branch = match local_branch.upstream() {
            Ok(upstream) => upstream,
            Err(_) => return Ok((0, 0)), // No upstream configured
        };

        let upstream_oid = match upstream_branch.get().target() {
            Some(oid) => oid,
            None => return Ok((0, 0)),
        };

        match self.repo.graph_ahead_behind(local_oid, upstream_oid) {
            Ok((ahead, behind)) => Ok((ahead, behind)),
            Err(_) => Ok((0, 0)),
        }
    }

    /// Commit log filtered to one file, in git's own order (newest first).
    pub fn log_for_file(&self, file_path: &str) -> Result<Vec<CommitEntry>> {
        let format = format!("--pretty=format:{LOG_FORMAT}");
        let output = self.run(&["log", &format, "--", file_path])?;

        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_log_record)
            .collect()
    }

    /// Content of `file_path` at revision `hash`.
    pub fn show(&self, hash: &str, file_path: &str) -> Result<String> {
        self.run(&["show", &format!("{hash}:{file_path}")])
    }

    /// Unified diff text between two revisions for one file.
    pub fn diff_text(&self, hash_a: &str, hash_b: &str, file_path: &str) -> Result<String> {
        self.run(&["diff", hash_a, hash_b, "--", file_path])
    }

    pub fn fetch(&self, remote: &str) -> Result<()> {
        self.run(&["fetch", remote]).map(|_| ())
    }

    pub fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["pull", "--ff-only", remote, branch]).map(|_| ())
    }

    pub fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).map(|_| ())
    }
}

/// Run a git command, returning stdout on success and a
/// [`SyncError::GitCommandFailed`] carrying stderr otherwise.
fn run_git(workdir: Option<&Path>, args: &[&str]) -> Result<String> {
    let mut cmd = std::process::Command::new("git");
    cmd.args(args);
    if let Some(dir) = workdir {
        cmd.current_dir(dir);
    }

    log::debug!("running git {}", args.join(" "));
    let output = cmd.output().map_err(SyncError::Io)?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(SyncError::git_command_failed(error_msg.trim()));
    }

    Ok(String::from_utf8(output.stdout)?)
}

/// Parse one `--pretty=format` record into a [`CommitEntry`].
fn parse_log_record(line: &str) -> Result<CommitEntry> {
    let fields: Vec<&str> = line.split(LOG_FIELD_SEP).collect();
    if fields.len() != 5 {
        return Err(SyncError::git_command_failed(format!(
            "unexpected log record: {line}"
        )));
    }

    let date = DateTime::parse_from_rfc3339(fields[3])
        .map_err(|e| SyncError::git_command_failed(format!("bad commit date '{}': {e}", fields[3])))?
        .with_timezone(&Utc);

    Ok(CommitEntry {
        hash: fields[0].to_string(),
        author: fields[1].to_string(),
        email: fields[2].to_string(),
        date,
        message: fields[4].to_string(),
        files: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> Result<(TempDir, GitWorkspace)> {
        let temp_dir = TempDir::new().map_err(SyncError::Io)?;
        let repo_path = temp_dir.path();

        std::process::Command::new("git")
            .args(["init"])
            .current_dir(repo_path)
            .output()
            .map_err(SyncError::Io)?;

        std::process::Command::new("git")
            .args(["config", "user.name", "Test User"])
            .current_dir(repo_path)
            .output()
            .map_err(SyncError::Io)?;

        std::process::Command::new("git")
            .args(["config", "user.email", "test@example.com"])
            .current_dir(repo_path)
            .output()
            .map_err(SyncError::Io)?;

        let workspace = GitWorkspace::open(repo_path)?;
        Ok((temp_dir, workspace))
    }

    fn commit_file(workspace: &GitWorkspace, name: &str, content: &str, message: &str) -> Result<()> {
        let workdir = workspace.workdir()?;
        std::fs::write(workdir.join(name), content).map_err(SyncError::Io)?;

        std::process::Command::new("git")
            .args(["add", name])
            .current_dir(&workdir)
            .output()
            .map_err(SyncError::Io)?;

        std::process::Command::new("git")
            .args(["commit", "-m", message])
            .current_dir(&workdir)
            .output()
            .map_err(SyncError::Io)?;

        Ok(())
    }

    #[test]
    fn test_open_non_git_directory_fails() {
        let result = GitWorkspace::open("/tmp/definitely/not/a/git/repo");
        assert!(result.is_err());
    }

    #[test]
    fn test_clean_repo_has_no_uncommitted_changes() -> Result<()> {
        let (_temp_dir, workspace) = setup_test_repo()?;
        assert!(!workspace.has_uncommitted_changes()?);
        Ok(())
    }

    #[test]
    fn test_untracked_file_counts_as_uncommitted() -> Result<()> {
        let (_temp_dir, workspace) = setup_test_repo()?;
        std::fs::write(workspace.workdir()?.join("note.md"), "hello").map_err(SyncError::Io)?;
        assert!(workspace.has_uncommitted_changes()?);
        Ok(())
    }

    #[test]
    fn test_ahead_behind_without_upstream() -> Result<()> {
        let (_temp_dir, workspace) = setup_test_repo()?;
        commit_file(&workspace, "note.md", "v1\n", "v1")?;
        assert_eq!(workspace.ahead_behind()?, (0, 0));
        Ok(())
    }

    #[test]
    fn test_log_for_file_newest_first() -> Result<()> {
        let (_temp_dir, workspace) = setup_test_repo()?;
        commit_file(&workspace, "note.md", "v1\n", "v1")?;
        commit_file(&workspace, "note.md", "v2\n", "v2")?;
        commit_file(&workspace, "other.md", "x\n", "unrelated")?;

        let log = workspace.log_for_file("note.md")?;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].message, "v2");
        assert_eq!(log[1].message, "v1");
        assert_eq!(log[0].author, "Test User");
        assert_eq!(log[0].email, "test@example.com");
        Ok(())
    }

    #[test]
    fn test_show_returns_content_at_revision() -> Result<()> {
        let (_temp_dir, workspace) = setup_test_repo()?;
        commit_file(&workspace, "note.md", "v1\n", "v1")?;
        commit_file(&workspace, "note.md", "v2\n", "v2")?;

        let log = workspace.log_for_file("note.md")?;
        assert_eq!(workspace.show(&log[0].hash, "note.md")?, "v2\n");
        assert_eq!(workspace.show(&log[1].hash, "note.md")?, "v1\n");
        Ok(())
    }

    #[test]
    fn test_diff_text_between_revisions() -> Result<()> {
        let (_temp_dir, workspace) = setup_test_repo()?;
        commit_file(&workspace, "note.md", "v1\n", "v1")?;
        commit_file(&workspace, "note.md", "v2\n", "v2")?;

        let log = workspace.log_for_file("note.md")?;
        let diff = workspace.diff_text(&log[1].hash, &log[0].hash, "note.md")?;
        assert!(diff.contains("-v1"));
        assert!(diff.contains("+v2"));
        Ok(())
    }

    #[test]
    fn test_parse_log_record_rejects_short_lines() {
        let result = parse_log_record("abc\x1fonly-two");
        assert!(result.is_err());
    }
}

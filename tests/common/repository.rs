//! Git repository management and setup utilities
//!
//! Provides functions for creating and managing test repositories with
//! various states for provider and history tests.

#![allow(dead_code)]

use notesync::core::error::{Result, SyncError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test repository setup result containing both the temporary directory
/// and the repository path. The TempDir must be kept alive for the
/// duration of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn git(repo_path: &Path, args: &[&str]) -> Result<()> {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .map_err(SyncError::Io)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SyncError::git_command_failed(stderr.trim()));
    }
    Ok(())
}

/// Sets up a fresh git repository with basic config to avoid user prompts.
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new().map_err(SyncError::Io)?;
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "--initial-branch=main"])?;
    git(&repo_path, &["config", "user.name", "Test User"])?;
    git(&repo_path, &["config", "user.email", "test@example.com"])?;

    Ok(TestRepo {
        temp_dir,
        path: repo_path,
    })
}

/// Sets up a bare repository usable as a clone/push target.
pub fn setup_bare_remote() -> Result<TestRepo> {
    let temp_dir = TempDir::new().map_err(SyncError::Io)?;
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "--bare", "--initial-branch=main"])?;

    Ok(TestRepo {
        temp_dir,
        path: repo_path,
    })
}

/// Creates a file with specified content in the repository.
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    fs::write(repo_path.join(filename), content).map_err(SyncError::Io)?;
    Ok(())
}

/// Stages and commits a single file.
pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) -> Result<()> {
    create_file(repo_path, filename, content)?;
    git(repo_path, &["add", filename])?;
    git(repo_path, &["commit", "-m", message])?;
    Ok(())
}

/// Sets identity config inside a working copy created by a provider open.
pub fn set_git_identity(repo_path: &Path) -> Result<()> {
    git(repo_path, &["config", "user.name", "Test User"])?;
    git(repo_path, &["config", "user.email", "test@example.com"])?;
    Ok(())
}

use crate::core::{
    error::{Result, SyncError},
    print_success,
    settings::{AuthMethod, ProviderKind, RepoSettings},
    Profile,
};
use std::path::PathBuf;

/// Build settings from the CLI flags and persist them as the active
/// profile.
pub fn execute_configure(
    provider: ProviderKind,
    path: PathBuf,
    remote: Option<String>,
    branch: Option<String>,
) -> Result<()> {
    let settings = match provider {
        ProviderKind::Local => RepoSettings::Local { local_path: path },
        ProviderKind::Git => RepoSettings::Git {
            remote_url: remote.ok_or_else(|| SyncError::missing_setting("remote"))?,
            branch: branch.unwrap_or_else(|| "main".to_string()),
            local_path: path,
            credential: String::new(),
            auth_method: AuthMethod::Ssh,
        },
        ProviderKind::S3 => {
            return Err(SyncError::sync_failure(
                "s3 profiles are only reachable through the library API with an object-store binding",
            ))
        }
    };

    let profile = Profile::new(settings);
    profile.save()?;

    print_success(&format!("Saved {provider} profile"));
    Ok(())
}

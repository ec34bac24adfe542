//! Repository settings as a tagged union over the three backends.
//!
//! [`RepoSettings`] carries exactly one active variant per configured
//! provider instance. A provider that receives settings with the wrong tag
//! fails with a provider-mismatch error; there is no silent coercion.
//!
//! # Public API
//! - [`RepoSettings`]: Sum type over local/git/s3 settings payloads
//! - [`ProviderKind`]: The discriminant tag, also used by the factories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Discriminant for the three repository backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Local,
    Git,
    S3,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Local => "local",
            ProviderKind::Git => "git",
            ProviderKind::S3 => "s3",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the git variant authenticates against its remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Token,
    Ssh,
}

/// Repository settings, tagged by provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum RepoSettings {
    Local {
        local_path: PathBuf,
    },
    Git {
        remote_url: String,
        branch: String,
        local_path: PathBuf,
        credential: String,
        auth_method: AuthMethod,
    },
    S3 {
        bucket: String,
        region: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        local_path: PathBuf,
        access_key_id: String,
        secret_access_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_token: Option<String>,
    },
}

impl RepoSettings {
    /// The provider tag of this settings variant.
    pub fn kind(&self) -> ProviderKind {
        match self {
            RepoSettings::Local { .. } => ProviderKind::Local,
            RepoSettings::Git { .. } => ProviderKind::Git,
            RepoSettings::S3 { .. } => ProviderKind::S3,
        }
    }

    /// The working directory every variant carries.
    pub fn local_path(&self) -> &PathBuf {
        match self {
            RepoSettings::Local { local_path } => local_path,
            RepoSettings::Git { local_path, .. } => local_path,
            RepoSettings::S3 { local_path, .. } => local_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let local = RepoSettings::Local {
            local_path: PathBuf::from("/notes"),
        };
        assert_eq!(local.kind(), ProviderKind::Local);

        let s3 = RepoSettings::S3 {
            bucket: "notes".to_string(),
            region: "us-east-1".to_string(),
            prefix: None,
            local_path: PathBuf::from("/notes"),
            access_key_id: "AKIA".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
        };
        assert_eq!(s3.kind(), ProviderKind::S3);
    }

    #[test]
    fn test_serde_tag_roundtrip() {
        let settings = RepoSettings::Git {
            remote_url: "git@example.com:me/notes.git".to_string(),
            branch: "main".to_string(),
            local_path: PathBuf::from("/notes"),
            credential: "token".to_string(),
            auth_method: AuthMethod::Ssh,
        };

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"provider\":\"git\""));

        let back: RepoSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::Local.to_string(), "local");
        assert_eq!(ProviderKind::Git.to_string(), "git");
        assert_eq!(ProviderKind::S3.to_string(), "s3");
    }

    #[test]
    fn test_local_path_accessor() {
        let settings = RepoSettings::Local {
            local_path: PathBuf::from("/tmp/notes"),
        };
        assert_eq!(settings.local_path(), &PathBuf::from("/tmp/notes"));
    }
}

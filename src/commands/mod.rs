//! CLI command implementations.
//!
//! Each command loads the saved profile, builds the matching provider
//! through the factory, and renders the result with the shared output
//! helpers.

pub mod configure;
pub mod diff;
pub mod history;
pub mod open;
pub mod show;
pub mod status;
pub mod sync;

use crate::core::{
    error::{Result, SyncError},
    object_store::MemoryStore,
    settings::ProviderKind,
    Profile,
};
use crate::providers::ProviderFactory;
use std::sync::Arc;

pub use configure::execute_configure;
pub use diff::execute_diff;
pub use history::execute_history;
pub use open::execute_open;
pub use show::execute_show;
pub use status::execute_status;
pub use sync::{execute_fetch, execute_pull, execute_push};

/// Load the saved profile or fail with a validation error telling the user
/// to configure first.
fn load_profile() -> Result<Profile> {
    Profile::load()?.ok_or(SyncError::NotConfigured)
}

/// The s3 backend needs an injected object-store binding; the CLI only
/// drives local and git profiles.
fn ensure_cli_supported(kind: ProviderKind) -> Result<()> {
    if kind == ProviderKind::S3 {
        return Err(SyncError::sync_failure(
            "s3 profiles are only reachable through the library API with an object-store binding",
        ));
    }
    Ok(())
}

fn factory() -> ProviderFactory {
    ProviderFactory::new(Arc::new(MemoryStore::new()))
}

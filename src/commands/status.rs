use crate::core::{error::Result, print_status};

use super::{ensure_cli_supported, factory, load_profile};

/// Print a point-in-time status snapshot for the active profile.
pub fn execute_status() -> Result<()> {
    let profile = load_profile()?;
    let kind = profile.settings.kind();
    ensure_cli_supported(kind)?;

    let mut provider = factory().repository(kind);
    provider.open(profile.settings)?;
    let status = provider.status()?;

    print_status(&status);
    Ok(())
}

use crate::core::{error::Result, print_success};

use super::{ensure_cli_supported, factory, load_profile};

/// Open the repository described by the saved profile, creating or cloning
/// the working directory as needed.
pub fn execute_open() -> Result<()> {
    let profile = load_profile()?;
    let kind = profile.settings.kind();
    ensure_cli_supported(kind)?;

    let mut provider = factory().repository(kind);
    let opened = provider.open(profile.settings)?;

    print_success(&format!(
        "Opened {} repository at {}",
        kind,
        opened.local_path.display()
    ));
    Ok(())
}

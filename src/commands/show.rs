use crate::core::error::Result;

use super::{ensure_cli_supported, factory, load_profile};

/// Print the file's content at one revision.
pub fn execute_show(hash: String, file: String) -> Result<()> {
    let profile = load_profile()?;
    let kind = profile.settings.kind();
    ensure_cli_supported(kind)?;

    let mut provider = factory().history(kind)?;
    provider.configure(profile.settings)?;
    let content = provider.version_content(&hash, &file)?;

    print!("{content}");
    Ok(())
}

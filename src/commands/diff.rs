use crate::core::{error::Result, print_hunks, print_info};

use super::{ensure_cli_supported, factory, load_profile};

/// Print the structured diff between two revisions of one file.
pub fn execute_diff(hash_a: String, hash_b: String, file: String) -> Result<()> {
    let profile = load_profile()?;
    let kind = profile.settings.kind();
    ensure_cli_supported(kind)?;

    let mut provider = factory().history(kind)?;
    provider.configure(profile.settings)?;
    let hunks = provider.diff(&hash_a, &hash_b, &file)?;

    if hunks.is_empty() {
        print_info(&format!("No changes in {file} between the two revisions"));
    } else {
        print_hunks(&hunks);
    }
    Ok(())
}

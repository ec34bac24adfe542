use crate::core::{error::Result, print_history, print_info};

use super::{ensure_cli_supported, factory, load_profile};

/// Print the per-file history, newest first.
pub fn execute_history(file: String) -> Result<()> {
    let profile = load_profile()?;
    let kind = profile.settings.kind();
    ensure_cli_supported(kind)?;

    let mut provider = factory().history(kind)?;
    provider.configure(profile.settings)?;
    let entries = provider.history_for_file(&file)?;

    if entries.is_empty() {
        print_info(&format!("No history for {file}"));
    } else {
        print_history(&entries);
    }
    Ok(())
}

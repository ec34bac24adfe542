use crate::core::{error::Result, print_success};
use crate::providers::RepositoryProvider;

use super::{ensure_cli_supported, factory, load_profile};

fn opened_provider() -> Result<Box<dyn RepositoryProvider>> {
    let profile = load_profile()?;
    let kind = profile.settings.kind();
    ensure_cli_supported(kind)?;

    let mut provider = factory().repository(kind);
    provider.open(profile.settings)?;
    Ok(provider)
}

pub fn execute_fetch() -> Result<()> {
    opened_provider()?.fetch()?;
    print_success("Fetched remote state");
    Ok(())
}

pub fn execute_pull() -> Result<()> {
    let outcome = opened_provider()?.pull()?;
    print_success(&format!("Pulled {} change(s)", outcome.pulled));
    Ok(())
}

pub fn execute_push() -> Result<()> {
    let outcome = opened_provider()?.push()?;
    print_success(&format!("Pushed {} change(s)", outcome.pushed));
    Ok(())
}

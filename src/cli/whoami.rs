use super::load_config;
use hubsync::core::HubsyncResult;
use hubsync::di::ServiceContainer;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, token: Option<String>) -> HubsyncResult<()> {
    let config = load_config(config_path)?;
    let container = ServiceContainer::from_config(config, token.as_deref())?;

    let identity = container.hub().whoami().await?;
    match identity.fullname {
        Some(fullname) => println!("✓ Logged in as {} ({})", identity.name, fullname),
        None => println!("✓ Logged in as {}", identity.name),
    }
    Ok(())
}

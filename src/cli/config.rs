use super::load_config;
use hubsync::core::path::config_file;
use hubsync::core::{HubsyncError, HubsyncResult};
use std::path::Path;

/// Print the effective configuration as YAML
///
/// The token is masked.
pub fn show(config_path: Option<&Path>) -> HubsyncResult<()> {
    let mut config = load_config(config_path)?;
    config.endpoint = config.effective_endpoint();
    if config.token.is_some() {
        config.token = Some("<redacted>".to_string());
    }

    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| HubsyncError::Config(format!("Failed to serialize config: {}", e)))?;
    print!("{}", yaml);
    Ok(())
}

pub fn path(config_path: Option<&Path>) -> HubsyncResult<()> {
    match config_path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", config_file()?.display()),
    }
    Ok(())
}

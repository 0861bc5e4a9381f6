pub mod config;
pub mod hash;
pub mod plan;
pub mod sync;
pub mod whoami;

use clap::Args;
use hubsync::config::{Config, SyncOptions};
use hubsync::core::HubsyncResult;
use hubsync::sync::FilterRules;
use std::path::{Path, PathBuf};

/// Repository and file selection shared by `sync` and `plan`
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Repository ID on Hugging Face Hub
    #[arg(long, default_value = "zai-org/CogVideoX1.5-5B")]
    pub repo_id: String,

    /// Local directory to save files
    #[arg(long, default_value = "./CogVideoX1.5-5B")]
    pub local_dir: PathBuf,

    /// File patterns to include (e.g. "*.safetensors" or "vae/")
    /// [default: default_include from config]
    #[arg(long, num_args = 1..)]
    pub include: Option<Vec<String>>,

    /// File patterns to exclude [default: default_exclude from config]
    #[arg(long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,

    /// Hugging Face token (optional, for private or gated repos)
    #[arg(long)]
    pub token: Option<String>,

    /// Branch, tag or commit to sync from [default: revision from config]
    #[arg(long)]
    pub revision: Option<String>,
}

impl SelectionArgs {
    /// Load the config and apply command-line overrides to it
    pub fn load_config(&self, config_path: Option<&Path>) -> HubsyncResult<Config> {
        let mut config = load_config(config_path)?;
        if let Some(revision) = &self.revision {
            config.revision = revision.clone();
        }
        Ok(config)
    }

    /// Build the per-run options; patterns fall back to the config defaults
    pub fn sync_options(&self, config: &Config) -> HubsyncResult<SyncOptions> {
        let include = self.include.as_ref().unwrap_or(&config.default_include);
        let exclude = self.exclude.as_ref().unwrap_or(&config.default_exclude);

        Ok(SyncOptions::new(self.repo_id.clone(), self.local_dir.clone())?
            .with_rules(FilterRules::new(include, exclude)))
    }
}

pub fn load_config(config_path: Option<&Path>) -> HubsyncResult<Config> {
    match config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

//! Per-run synchronization settings

use crate::core::{HubsyncError, HubsyncResult};
use crate::sync::filter::FilterRules;
use std::path::{Path, PathBuf};

/// Immutable settings for one sync session
///
/// Built once at startup from command-line arguments and [`Config`](super::Config),
/// then handed to the session. Nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    repo_id: String,
    local_dir: PathBuf,
    rules: FilterRules,
    skip_auth: bool,
    jobs: usize,
    quiet: bool,
}

impl SyncOptions {
    /// Create options for a repository and local directory
    ///
    /// Defaults: no filter rules, auth probe enabled, one fetch at a time.
    pub fn new(repo_id: impl Into<String>, local_dir: impl Into<PathBuf>) -> HubsyncResult<Self> {
        let repo_id = repo_id.into();
        validate_repo_id(&repo_id)?;

        Ok(Self {
            repo_id,
            local_dir: local_dir.into(),
            rules: FilterRules::default(),
            skip_auth: false,
            jobs: 1,
            quiet: false,
        })
    }

    pub fn with_rules(mut self, rules: FilterRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_skip_auth(mut self, skip_auth: bool) -> Self {
        self.skip_auth = skip_auth;
        self
    }

    /// Maximum number of files fetched at once (values below 1 become 1)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    pub fn rules(&self) -> &FilterRules {
        &self.rules
    }

    pub fn skip_auth(&self) -> bool {
        self.skip_auth
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }
}

/// Check a repository id has the `name` or `namespace/name` shape
pub fn validate_repo_id(repo_id: &str) -> HubsyncResult<()> {
    let parts: Vec<&str> = repo_id.split('/').collect();
    let well_formed = !repo_id.trim().is_empty()
        && parts.len() <= 2
        && parts
            .iter()
            .all(|p| !p.is_empty() && !p.starts_with('.') && !p.contains(char::is_whitespace));

    if well_formed {
        Ok(())
    } else {
        Err(HubsyncError::Config(format!(
            "Invalid repository id '{}': expected 'name' or 'namespace/name'",
            repo_id
        )))
    }
}

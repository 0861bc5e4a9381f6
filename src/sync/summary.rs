//! Outcome of a sync session

use crate::sync::fetcher::FetchError;
use crate::sync::planner::DownloadPlan;
use std::fmt;
use std::path::{Path, PathBuf};

/// Counts and per-item outcomes of one session
///
/// Built by the session while fetching and handed out read-only once the
/// session is done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    total_remote: usize,
    filtered_in: usize,
    already_valid: usize,
    planned: usize,
    succeeded: Vec<(String, PathBuf)>,
    failed: Vec<FetchError>,
    cancelled: bool,
}

impl SessionSummary {
    pub(crate) fn from_plan(plan: &DownloadPlan) -> Self {
        Self {
            total_remote: plan.total_remote(),
            filtered_in: plan.filtered_in(),
            already_valid: plan.already_valid(),
            planned: plan.len(),
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, remote_path: &str, outcome: Result<PathBuf, FetchError>) {
        match outcome {
            Ok(path) => self.succeeded.push((remote_path.to_string(), path)),
            Err(e) => self.failed.push(e),
        }
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn total_remote(&self) -> usize {
        self.total_remote
    }

    pub fn filtered_in(&self) -> usize {
        self.filtered_in
    }

    pub fn already_valid(&self) -> usize {
        self.already_valid
    }

    pub fn planned(&self) -> usize {
        self.planned
    }

    pub fn succeeded(&self) -> &[(String, PathBuf)] {
        &self.succeeded
    }

    pub fn failed(&self) -> &[FetchError] {
        &self.failed
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Whether the session stopped early on an abort request
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// True when every planned file was fetched
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Local path a remote file was written to, if it succeeded
    pub fn local_path_of(&self, remote_path: &str) -> Option<&Path> {
        self.succeeded
            .iter()
            .find(|(remote, _)| remote == remote_path)
            .map(|(_, path)| path.as_path())
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Remote files:   {}", self.total_remote)?;
        writeln!(f, "  After filter:   {}", self.filtered_in)?;
        writeln!(f, "  Already valid:  {}", self.already_valid)?;
        writeln!(f, "  Planned:        {}", self.planned)?;
        writeln!(f, "  Downloaded:     {}", self.succeeded.len())?;
        write!(f, "  Failed:         {}", self.failed.len())?;

        if self.cancelled {
            write!(f, "\n  Interrupted before all files were fetched")?;
        }
        for failure in &self.failed {
            write!(f, "\n    ✗ {}: {}", failure.remote_path, failure.message)?;
        }
        Ok(())
    }
}
